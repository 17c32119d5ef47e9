use std::collections::HashSet;

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::session::{page_range, total_pages, GameStats, GameSummary, SessionConfig};
use crate::word_pairs::WordPair;

pub const MAX_DISTRACTORS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    Ignored,
    Correct,
    Wrong,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectorState {
    Asking,
    Completed(GameSummary),
}

/// The correct translation plus up to four distinct distractors taken from
/// the whole list, shuffled.
pub fn build_options(pairs: &[WordPair], correct: &str, rng: &mut StdRng) -> Vec<String> {
    let pool: Vec<&str> = pairs
        .iter()
        .map(|p| p.translation.as_str())
        .filter(|t| *t != correct)
        .unique()
        .collect();

    let mut options: Vec<String> = pool
        .choose_multiple(rng, MAX_DISTRACTORS)
        .map(|t| t.to_string())
        .collect();
    options.push(correct.to_string());
    options.shuffle(rng);
    options
}

/// Multiple choice: one original at a time, pick its translation
#[derive(Debug)]
pub struct SelectorSession {
    pairs: Vec<WordPair>,
    config: SessionConfig,
    game_id: u64,
    page: usize,
    question_index: usize,
    options: Vec<String>,
    disabled: HashSet<usize>,
    pub correct: u32,
    pub stats: GameStats,
    state: SelectorState,
    rng: StdRng,
}

impl SelectorSession {
    pub fn new(pairs: Vec<WordPair>, config: SessionConfig, game_id: u64, rng: StdRng) -> Self {
        let mut session = Self {
            pairs: Vec::new(),
            config,
            game_id,
            page: 0,
            question_index: 0,
            options: Vec::new(),
            disabled: HashSet::new(),
            correct: 0,
            stats: GameStats::new(),
            state: SelectorState::Asking,
            rng,
        };
        session.restart(pairs, game_id);
        session
    }

    /// Fresh epoch over a re-read word list
    pub fn restart(&mut self, pairs: Vec<WordPair>, game_id: u64) {
        self.pairs = pairs;
        self.game_id = game_id;
        self.page = 0;
        self.question_index = 0;
        self.correct = 0;
        self.stats = GameStats::new();
        if self.pairs.is_empty() {
            self.options.clear();
            self.disabled.clear();
            self.state = SelectorState::Completed(GameSummary::new(0, 0, None));
        } else {
            self.state = SelectorState::Asking;
            self.prepare_question();
        }
    }

    fn prepare_question(&mut self) {
        self.disabled.clear();
        let correct = self.pairs[self.current_index()].translation.clone();
        self.options = build_options(&self.pairs, &correct, &mut self.rng);
    }

    fn current_index(&self) -> usize {
        page_range(self.pairs.len(), self.config.page_size(), self.page).start + self.question_index
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.pairs.len(), self.config.page_size())
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn questions_on_page(&self) -> usize {
        page_range(self.pairs.len(), self.config.page_size(), self.page).len()
    }

    pub fn current_pair(&self) -> Option<&WordPair> {
        match self.state {
            SelectorState::Asking => self.pairs.get(self.current_index()),
            SelectorState::Completed(_) => None,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_disabled(&self, option: usize) -> bool {
        self.disabled.contains(&option)
    }

    pub fn disabled(&self) -> &HashSet<usize> {
        &self.disabled
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, SelectorState::Completed(_))
    }

    pub fn summary(&self) -> Option<&GameSummary> {
        match self.state {
            SelectorState::Completed(ref summary) => Some(summary),
            SelectorState::Asking => None,
        }
    }

    pub fn answer(&mut self, option: usize) -> Answer {
        if self.is_completed() || option >= self.options.len() || self.disabled.contains(&option) {
            return Answer::Ignored;
        }
        self.stats.attempts += 1;

        let expected = &self.pairs[self.current_index()].translation;
        if self.options[option] != *expected {
            self.stats.errors += 1;
            self.disabled.insert(option);
            return Answer::Wrong;
        }

        self.correct += 1;
        self.advance();
        Answer::Correct
    }

    fn advance(&mut self) {
        if self.question_index + 1 < self.questions_on_page() {
            self.question_index += 1;
        } else if self.page + 1 < self.total_pages() {
            self.page += 1;
            self.question_index = 0;
            tracing::debug!(game_id = self.game_id, page = self.page, "selector page advanced");
        } else {
            self.finish();
            return;
        }
        self.prepare_question();
    }

    fn finish(&mut self) {
        self.stats.finish();
        let summary = GameSummary::new(self.correct, self.stats.errors, self.stats.elapsed());
        tracing::info!(
            game_id = self.game_id,
            correct = summary.correct,
            errors = summary.errors,
            success_rate = summary.success_rate,
            "selector game completed"
        );
        self.config.record(&summary);
        self.options.clear();
        self.disabled.clear();
        self.state = SelectorState::Completed(summary);
    }
}
