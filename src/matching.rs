use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::session::{page_range, total_pages, GameStats, GameSummary, SessionConfig};
use crate::word_pairs::WordPair;

/// What a single click or digit press did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Ignored,
    Selected,
    Deselected,
    Matched,
    Mismatched,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatchingState {
    Playing,
    Completed(GameSummary),
}

/// Per-page bookkeeping. Indices are pair identities within the page; the
/// two orders are only what the player sees.
#[derive(Clone, Debug, Default)]
pub struct PageBoard {
    pub left_selected: Option<usize>,
    pub right_selected: Option<usize>,
    pub matched_left: HashSet<usize>,
    pub matched_right: HashSet<usize>,
    pub left_order: Vec<usize>,
    pub right_order: Vec<usize>,
}

impl PageBoard {
    fn new(len: usize, rng: &mut StdRng) -> Self {
        let mut right_order: Vec<usize> = (0..len).collect();
        right_order.shuffle(rng);
        Self {
            left_order: (0..len).collect(),
            right_order,
            ..Default::default()
        }
    }

    fn clear_selection(&mut self) {
        self.left_selected = None;
        self.right_selected = None;
    }
}

fn move_to_front(order: &mut Vec<usize>, id: usize) {
    if let Some(pos) = order.iter().position(|&i| i == id) {
        order.remove(pos);
        order.insert(0, id);
    }
}

/// Read-only view of one button
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemView<'a> {
    pub index: usize,
    pub text: &'a str,
    pub matched: bool,
    pub selected: bool,
}

/// Pairing game: originals on the left, shuffled translations on the right
#[derive(Debug)]
pub struct MatchingSession {
    pairs: Vec<WordPair>,
    config: SessionConfig,
    game_id: u64,
    page: usize,
    pub board: PageBoard,
    pub stats: GameStats,
    state: MatchingState,
    rng: StdRng,
}

impl MatchingSession {
    pub fn new(pairs: Vec<WordPair>, config: SessionConfig, game_id: u64, mut rng: StdRng) -> Self {
        let first_page = page_range(pairs.len(), config.page_size(), 0).len();
        let board = PageBoard::new(first_page, &mut rng);
        let state = if pairs.is_empty() {
            MatchingState::Completed(GameSummary::new(0, 0, None))
        } else {
            MatchingState::Playing
        };

        Self {
            pairs,
            config,
            game_id,
            page: 0,
            board,
            stats: GameStats::new(),
            state,
            rng,
        }
    }

    /// Fresh epoch over a re-read word list
    pub fn restart(&mut self, pairs: Vec<WordPair>, game_id: u64) {
        let first_page = page_range(pairs.len(), self.config.page_size(), 0).len();
        self.board = PageBoard::new(first_page, &mut self.rng);
        self.state = if pairs.is_empty() {
            MatchingState::Completed(GameSummary::new(0, 0, None))
        } else {
            MatchingState::Playing
        };
        self.pairs = pairs;
        self.game_id = game_id;
        self.page = 0;
        self.stats = GameStats::new();
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

    pub fn page_size(&self) -> usize {
        self.config.page_size()
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn page_pairs(&self) -> &[WordPair] {
        &self.pairs[page_range(self.pairs.len(), self.config.page_size(), self.page)]
    }

    pub fn state(&self) -> &MatchingState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, MatchingState::Completed(_))
    }

    pub fn summary(&self) -> Option<&GameSummary> {
        match self.state {
            MatchingState::Completed(ref summary) => Some(summary),
            MatchingState::Playing => None,
        }
    }

    pub fn left_items(&self) -> Vec<ItemView<'_>> {
        let page = self.page_pairs();
        self.board
            .left_order
            .iter()
            .map(|&index| ItemView {
                index,
                text: &page[index].original,
                matched: self.board.matched_left.contains(&index),
                selected: self.board.left_selected == Some(index),
            })
            .collect()
    }

    pub fn right_items(&self) -> Vec<ItemView<'_>> {
        let page = self.page_pairs();
        self.board
            .right_order
            .iter()
            .map(|&index| ItemView {
                index,
                text: &page[index].translation,
                matched: self.board.matched_right.contains(&index),
                selected: self.board.right_selected == Some(index),
            })
            .collect()
    }

    fn selectable(&self, index: usize, matched: &HashSet<usize>) -> bool {
        !self.is_completed() && index < self.page_pairs().len() && !matched.contains(&index)
    }

    pub fn select_left(&mut self, index: usize) -> Selection {
        if !self.selectable(index, &self.board.matched_left) {
            return Selection::Ignored;
        }
        if self.board.left_selected == Some(index) {
            self.board.left_selected = None;
            return Selection::Deselected;
        }

        self.board.left_selected = Some(index);
        match self.board.right_selected {
            Some(right) => self.attempt_match(index, right),
            None => Selection::Selected,
        }
    }

    pub fn select_right(&mut self, index: usize) -> Selection {
        if !self.selectable(index, &self.board.matched_right) {
            return Selection::Ignored;
        }
        if self.board.right_selected == Some(index) {
            self.board.right_selected = None;
            return Selection::Deselected;
        }

        self.board.right_selected = Some(index);
        match self.board.left_selected {
            Some(left) => self.attempt_match(left, index),
            None => Selection::Selected,
        }
    }

    /// Digit keys: the first press picks a left item by what the player sees
    /// at that row, the second one picks a right item the same way.
    pub fn select_by_position(&mut self, position: usize) -> Selection {
        if self.board.left_selected.is_none() {
            match self.board.left_order.get(position) {
                Some(&index) => self.select_left(index),
                None => Selection::Ignored,
            }
        } else {
            match self.board.right_order.get(position) {
                Some(&index) => self.select_right(index),
                None => Selection::Ignored,
            }
        }
    }

    pub fn attempt_match(&mut self, left: usize, right: usize) -> Selection {
        if self.is_completed() {
            return Selection::Ignored;
        }
        self.stats.attempts += 1;

        let page = self.page_pairs();
        let is_match = match (page.get(left), page.get(right)) {
            (Some(l), Some(r)) => {
                !self.board.matched_left.contains(&left)
                    && !self.board.matched_right.contains(&right)
                    && l.translation == r.translation
            }
            _ => false,
        };

        self.board.clear_selection();
        if !is_match {
            self.stats.errors += 1;
            return Selection::Mismatched;
        }

        self.board.matched_left.insert(left);
        self.board.matched_right.insert(right);
        move_to_front(&mut self.board.left_order, left);
        move_to_front(&mut self.board.right_order, right);
        self.check_page_complete();
        Selection::Matched
    }

    fn check_page_complete(&mut self) {
        if self.board.matched_left.len() < self.page_pairs().len() {
            return;
        }

        if self.page + 1 < self.total_pages() {
            self.page += 1;
            let len = self.page_pairs().len();
            self.board = PageBoard::new(len, &mut self.rng);
            tracing::debug!(game_id = self.game_id, page = self.page, "matching page advanced");
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.stats.finish();
        let summary = GameSummary::new(
            self.pairs.len() as u32,
            self.stats.errors,
            self.stats.elapsed(),
        );
        tracing::info!(
            game_id = self.game_id,
            correct = summary.correct,
            errors = summary.errors,
            success_rate = summary.success_rate,
            "matching game completed"
        );
        self.config.record(&summary);
        self.state = MatchingState::Completed(summary);
    }
}
