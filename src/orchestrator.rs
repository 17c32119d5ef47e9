use std::fmt;
use std::io;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::history::HistoryStore;
use crate::matching::MatchingSession;
use crate::selector::SelectorSession;
use crate::session::{clamp_page_size, total_pages, SessionConfig, DEFAULT_PAGE_SIZE};
use crate::word_pairs::{invert_pairs, PairSource, WordPair};

#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameKind {
    #[default]
    Matching,
    Selector,
}

impl GameKind {
    pub fn toggled(self) -> Self {
        match self {
            GameKind::Matching => GameKind::Selector,
            GameKind::Selector => GameKind::Matching,
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    /// Retry requested without a word list
    NoSource,
    Unreadable(io::Error),
    NoPairs,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NoSource => write!(f, "No word list selected"),
            LoadError::Unreadable(err) => write!(f, "Could not read the file: {}", err),
            LoadError::NoPairs => write!(f, "Could not find any word pairs in the file"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Unreadable(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ActiveSession {
    Idle,
    Matching(MatchingSession),
    Selector(SelectorSession),
}

impl ActiveSession {
    pub fn is_completed(&self) -> bool {
        match self {
            ActiveSession::Idle => false,
            ActiveSession::Matching(s) => s.is_completed(),
            ActiveSession::Selector(s) => s.is_completed(),
        }
    }
}

/// Owns the loaded word list and whichever game is being played
#[derive(Debug)]
pub struct SessionOrchestrator {
    source: Option<Box<dyn PairSource>>,
    pairs: Vec<WordPair>,
    invert: bool,
    page_size: usize,
    kind: GameKind,
    game_id: u64,
    active: ActiveSession,
    history: Option<HistoryStore>,
    rng: StdRng,
}

impl SessionOrchestrator {
    pub fn new(history: Option<HistoryStore>) -> Self {
        Self::with_rng(history, StdRng::from_entropy())
    }

    pub fn with_seed(history: Option<HistoryStore>, seed: u64) -> Self {
        Self::with_rng(history, StdRng::seed_from_u64(seed))
    }

    fn with_rng(history: Option<HistoryStore>, rng: StdRng) -> Self {
        Self {
            source: None,
            pairs: Vec::new(),
            invert: false,
            page_size: DEFAULT_PAGE_SIZE,
            kind: GameKind::default(),
            game_id: 0,
            active: ActiveSession::Idle,
            history,
            rng,
        }
    }

    pub fn history(&self) -> Option<&HistoryStore> {
        self.history.as_ref()
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Applies from the next start or retry
    pub fn set_invert(&mut self, invert: bool) {
        self.invert = invert;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Only honoured while idle; returns whether the value was applied
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.page_size = clamp_page_size(page_size);
        true
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn active(&self) -> &ActiveSession {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveSession {
        &mut self.active
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.active, ActiveSession::Idle)
    }

    fn load(&self, source: &dyn PairSource) -> Result<Vec<WordPair>, LoadError> {
        let pairs = source.load().map_err(LoadError::Unreadable)?;
        if pairs.is_empty() {
            return Err(LoadError::NoPairs);
        }
        Ok(if self.invert {
            invert_pairs(&pairs)
        } else {
            pairs
        })
    }

    /// Load `source` and begin a game of `kind`. On failure nothing is started.
    pub fn start(&mut self, source: Box<dyn PairSource>, kind: GameKind) -> Result<(), LoadError> {
        let pairs = match self.load(source.as_ref()) {
            Ok(pairs) => pairs,
            Err(err) => {
                tracing::warn!(source = ?source, error = %err, "could not start game");
                return Err(err);
            }
        };

        self.game_id += 1;
        let config = SessionConfig::new(self.page_size)
            .with_name(source.name())
            .with_history(self.history.clone());
        let rng = StdRng::seed_from_u64(self.rng.gen());

        tracing::info!(
            game_id = self.game_id,
            %kind,
            pairs = pairs.len(),
            pages = total_pages(pairs.len(), self.page_size),
            invert = self.invert,
            "game started"
        );
        self.active = match kind {
            GameKind::Matching => {
                ActiveSession::Matching(MatchingSession::new(pairs.clone(), config, self.game_id, rng))
            }
            GameKind::Selector => {
                ActiveSession::Selector(SelectorSession::new(pairs.clone(), config, self.game_id, rng))
            }
        };
        self.pairs = pairs;
        self.kind = kind;
        self.source = Some(source);
        Ok(())
    }

    /// Re-read the source and play the same game again. If the file is gone
    /// or empty we fall back to idle.
    pub fn retry(&mut self) -> Result<(), LoadError> {
        if self.is_idle() {
            return Err(LoadError::NoSource);
        }
        let loaded = match self.source {
            Some(ref source) => self.load(source.as_ref()),
            None => Err(LoadError::NoSource),
        };

        let pairs = match loaded {
            Ok(pairs) => pairs,
            Err(err) => {
                tracing::warn!(error = %err, "retry failed, back to menu");
                self.source = None;
                self.back_to_menu();
                return Err(err);
            }
        };

        self.game_id += 1;
        tracing::info!(game_id = self.game_id, kind = %self.kind, pairs = pairs.len(), "game retried");
        match self.active {
            ActiveSession::Matching(ref mut s) => s.restart(pairs.clone(), self.game_id),
            ActiveSession::Selector(ref mut s) => s.restart(pairs.clone(), self.game_id),
            ActiveSession::Idle => {}
        }
        self.pairs = pairs;
        Ok(())
    }

    pub fn back_to_menu(&mut self) {
        self.active = ActiveSession::Idle;
        self.pairs.clear();
    }
}
