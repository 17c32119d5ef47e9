use std::cmp::Ordering;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::session::GameSummary;

/// One line of the results log. Every field is optional on read so that
/// partially broken lines still show up in the history view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    pub name: Option<String>,
    pub correct: Option<u32>,
    pub errors: Option<u32>,
    pub success_rate: Option<u32>,
    /// Raw `M:SS` text, or `-` when the duration was unknown
    pub time: Option<String>,
    pub time_seconds: Option<u64>,
}

impl HistoryEntry {
    pub fn from_summary(name: Option<String>, summary: &GameSummary) -> Self {
        Self {
            name: name.map(|n| sanitize_name(&n)).filter(|n| !n.is_empty()),
            correct: Some(summary.correct),
            errors: Some(summary.errors),
            success_rate: Some(summary.success_rate),
            time: Some(format_elapsed(summary.elapsed)),
            time_seconds: summary.elapsed.map(|d| d.as_secs()),
        }
    }

    /// `name=..;correct=..;errors=..;successRate=..%;time=M:SS`, name only when known
    pub fn to_line(&self) -> String {
        let mut tokens = Vec::with_capacity(5);
        if let Some(ref name) = self.name {
            tokens.push(format!("name={}", name));
        }
        if let Some(correct) = self.correct {
            tokens.push(format!("correct={}", correct));
        }
        if let Some(errors) = self.errors {
            tokens.push(format!("errors={}", errors));
        }
        if let Some(rate) = self.success_rate {
            tokens.push(format!("successRate={}%", rate));
        }
        tokens.push(format!("time={}", self.time.as_deref().unwrap_or("-")));
        tokens.join(";")
    }

    /// Parse one log line; None only for blank lines
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut entry = HistoryEntry::default();
        for token in trimmed.split(';') {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "name" => entry.name = Some(value.to_string()).filter(|v| !v.is_empty()),
                "correct" => entry.correct = value.parse().ok(),
                "errors" => entry.errors = value.parse().ok(),
                "successRate" => {
                    entry.success_rate = value.strip_suffix('%').unwrap_or(value).parse().ok()
                }
                "time" => {
                    entry.time = Some(value.to_string());
                    entry.time_seconds = parse_time(value);
                }
                _ => {}
            }
        }

        Some(entry)
    }
}

/// `M:SS`, minutes unpadded; `-` when unknown
pub fn format_elapsed(elapsed: Option<Duration>) -> String {
    match elapsed {
        Some(d) => {
            let secs = d.as_secs();
            format!("{}:{:02}", secs / 60, secs % 60)
        }
        None => "-".to_string(),
    }
}

pub fn parse_time(value: &str) -> Option<u64> {
    let (minutes, seconds) = value.split_once(':')?;
    let minutes: u64 = minutes.trim().parse().ok()?;
    let seconds: u64 = seconds.trim().parse().ok()?;
    Some(minutes * 60 + seconds)
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ';' | '=' | '\n' | '\r' => ' ',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// By name (missing first), then by time (missing last)
pub fn display_order(a: &HistoryEntry, b: &HistoryEntry) -> Ordering {
    let name_a = a.name.as_deref().unwrap_or("");
    let name_b = b.name.as_deref().unwrap_or("");
    name_a.cmp(name_b).then_with(|| {
        a.time_seconds
            .unwrap_or(u64::MAX)
            .cmp(&b.time_seconds.unwrap_or(u64::MAX))
    })
}

pub fn sort_for_display(entries: &mut [HistoryEntry]) {
    entries.sort_by(display_order);
}

/// Append-only results log
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::history_path().unwrap_or_else(|| PathBuf::from("sova_results.txt"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Failures only cost the persisted record, never the game
    pub fn append(&self, entry: &HistoryEntry) {
        match self.try_append(entry) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "history entry appended"),
            Err(err) => tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "could not append history entry"
            ),
        }
    }

    fn try_append(&self, entry: &HistoryEntry) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        // single write so concurrent readers never see half a line
        log_file.write_all(format!("{}\n", entry.to_line()).as_bytes())
    }

    pub fn load_all(&self) -> Vec<HistoryEntry> {
        match fs::read(&self.path) {
            // a stray non-UTF-8 byte only garbles its own line
            Ok(bytes) => String::from_utf8_lossy(&bytes)
                .lines()
                .filter_map(HistoryEntry::parse)
                .collect(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "could not read history");
                Vec::new()
            }
        }
    }

    pub fn load_sorted(&self) -> Vec<HistoryEntry> {
        let mut entries = self.load_all();
        sort_for_display(&mut entries);
        entries
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
