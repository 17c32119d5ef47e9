use std::ops::Range;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::history::{HistoryEntry, HistoryStore};

pub const MIN_PAGE_SIZE: usize = 1;
pub const MAX_PAGE_SIZE: usize = 10;
pub const DEFAULT_PAGE_SIZE: usize = 5;

pub fn clamp_page_size(page_size: usize) -> usize {
    page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(clamp_page_size(page_size))
}

/// Index range of `page` within the full list; the last page may be short
pub fn page_range(len: usize, page_size: usize, page: usize) -> Range<usize> {
    let page_size = clamp_page_size(page_size);
    let start = (page * page_size).min(len);
    let end = (start + page_size).min(len);
    start..end
}

/// Rounded percentage of correct answers, 0 when nothing was attempted
pub fn success_rate(correct: u32, errors: u32) -> u32 {
    let attempts = correct + errors;
    if attempts == 0 {
        return 0;
    }
    ((correct as f64 / attempts as f64) * 100.0).round() as u32
}

/// Settings copied into a session when it starts
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Always within `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`
    page_size: usize,
    /// Label written to the history log
    pub name: Option<String>,
    pub history: Option<HistoryStore>,
}

impl SessionConfig {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: clamp_page_size(page_size),
            name: None,
            history: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_history(mut self, history: Option<HistoryStore>) -> Self {
        self.history = history;
        self
    }

    pub(crate) fn record(&self, summary: &GameSummary) {
        if let Some(ref history) = self.history {
            history.append(&HistoryEntry::from_summary(self.name.clone(), summary));
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Whole-game counters, one instance per game id
#[derive(Debug, Clone)]
pub struct GameStats {
    pub attempts: u32,
    pub errors: u32,
    pub started_at: DateTime<Local>,
    pub ended_at: Option<DateTime<Local>>,
}

impl GameStats {
    pub fn new() -> Self {
        Self {
            attempts: 0,
            errors: 0,
            started_at: Local::now(),
            ended_at: None,
        }
    }

    pub fn finish(&mut self) {
        if self.ended_at.is_none() {
            self.ended_at = Some(Local::now());
        }
    }

    /// None until finished, or when the clock went backwards
    pub fn elapsed(&self) -> Option<Duration> {
        self.ended_at
            .and_then(|ended| (ended - self.started_at).to_std().ok())
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Frozen result of a completed game
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub correct: u32,
    pub errors: u32,
    pub success_rate: u32,
    pub elapsed: Option<Duration>,
}

impl GameSummary {
    pub fn new(correct: u32, errors: u32, elapsed: Option<Duration>) -> Self {
        Self {
            correct,
            errors,
            success_rate: success_rate(correct, errors),
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_rounds() {
        assert_eq!(success_rate(8, 2), 80);
        assert_eq!(success_rate(0, 0), 0);
        assert_eq!(success_rate(2, 1), 67);
        assert_eq!(success_rate(1, 2), 33);
        assert_eq!(success_rate(5, 0), 100);
    }

    #[test]
    fn paging_covers_the_list() {
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(page_range(12, 5, 0), 0..5);
        assert_eq!(page_range(12, 5, 2), 10..12);
        assert_eq!(page_range(12, 5, 3), 12..12);
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(42), 10);
        assert_eq!(SessionConfig::new(0).page_size(), 1);
        assert_eq!(SessionConfig::new(99).page_size(), MAX_PAGE_SIZE);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn elapsed_is_frozen_on_finish() {
        let mut stats = GameStats::new();
        assert_eq!(stats.elapsed(), None);

        stats.started_at = Local::now() - chrono::Duration::seconds(75);
        stats.finish();
        let first = stats.elapsed().unwrap();
        assert!(first.as_secs() >= 75);

        stats.finish();
        assert_eq!(stats.elapsed(), Some(first));
    }

    #[test]
    fn clock_going_backwards_gives_no_elapsed() {
        let mut stats = GameStats::new();
        stats.started_at = Local::now() + chrono::Duration::seconds(60);
        stats.finish();
        assert_eq!(stats.elapsed(), None);
    }
}
