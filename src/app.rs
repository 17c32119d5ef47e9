use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::history::HistoryEntry;
use crate::matching::Selection;
use crate::orchestrator::{ActiveSession, GameKind, SessionOrchestrator};
use crate::selector::Answer;
use crate::session::clamp_page_size;
use crate::word_pairs::FilePairSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Playing,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Start screen inputs
#[derive(Debug, Default)]
pub struct MenuState {
    pub path: String,
    pub game: GameKind,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct HistoryView {
    pub entries: Vec<HistoryEntry>,
    pub scroll_offset: usize,
}

/// Last thing the player did, shown as a one-line hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Match(Selection),
    Answer(Answer),
}

#[derive(Debug)]
pub struct App {
    pub orchestrator: SessionOrchestrator,
    pub state: AppState,
    pub menu: MenuState,
    pub history_view: HistoryView,
    pub feedback: Option<Feedback>,
}

/// `1`..`9` pick rows one to nine, `0` the tenth
fn digit_index(c: char) -> Option<usize> {
    match c.to_digit(10)? {
        0 => Some(9),
        d => Some(d as usize - 1),
    }
}

/// Key shown next to a row; rows past the tenth have none
pub fn position_key(position: usize) -> Option<char> {
    match position {
        0..=8 => char::from_digit(position as u32 + 1, 10),
        9 => Some('0'),
        _ => None,
    }
}

impl App {
    pub fn new(orchestrator: SessionOrchestrator) -> Self {
        Self {
            orchestrator,
            state: AppState::Menu,
            menu: MenuState::default(),
            history_view: HistoryView::default(),
            feedback: None,
        }
    }

    pub fn with_config(mut orchestrator: SessionOrchestrator, config: &Config) -> Self {
        orchestrator.set_invert(config.invert);
        orchestrator.set_page_size(config.page_size);
        let mut app = Self::new(orchestrator);
        app.menu.game = config.game;
        if let Some(ref last) = config.last_file {
            app.menu.path = last.display().to_string();
        }
        app
    }

    pub fn to_config(&self) -> Config {
        let path = self.menu.path.trim();
        Config {
            page_size: self.orchestrator.page_size(),
            invert: self.orchestrator.invert(),
            game: self.menu.game,
            last_file: (!path.is_empty()).then(|| PathBuf::from(path)),
        }
    }

    /// Load the file typed into the menu and begin the selected game
    pub fn start_game(&mut self) {
        let path = self.menu.path.trim().to_string();
        if path.is_empty() {
            self.menu.error = Some("Choose a file first".to_string());
            return;
        }

        let source = Box::new(FilePairSource::new(&path));
        match self.orchestrator.start(source, self.menu.game) {
            Ok(()) => {
                self.menu.error = None;
                self.feedback = None;
                self.state = AppState::Playing;
            }
            Err(err) => self.menu.error = Some(err.to_string()),
        }
    }

    pub fn retry(&mut self) {
        self.feedback = None;
        match self.orchestrator.retry() {
            Ok(()) => self.state = AppState::Playing,
            Err(err) => {
                self.menu.error = Some(err.to_string());
                self.state = AppState::Menu;
            }
        }
    }

    pub fn back_to_menu(&mut self) {
        self.orchestrator.back_to_menu();
        self.feedback = None;
        self.state = AppState::Menu;
    }

    pub fn open_history(&mut self) {
        let entries = self
            .orchestrator
            .history()
            .map(|store| store.load_sorted())
            .unwrap_or_default();
        self.history_view = HistoryView {
            entries,
            scroll_offset: 0,
        };
        self.state = AppState::History;
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.state {
            AppState::Menu => return self.on_menu_key(key),
            AppState::Playing => self.on_playing_key(key),
            AppState::History => self.on_history_key(key),
        }
        Flow::Continue
    }

    fn on_menu_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Enter => self.start_game(),
            KeyCode::Tab => self.menu.game = self.menu.game.toggled(),
            KeyCode::F(2) => {
                let invert = !self.orchestrator.invert();
                self.orchestrator.set_invert(invert);
            }
            KeyCode::F(3) => self.open_history(),
            KeyCode::Up => {
                let size = clamp_page_size(self.orchestrator.page_size() + 1);
                self.orchestrator.set_page_size(size);
            }
            KeyCode::Down => {
                let size = self.orchestrator.page_size().saturating_sub(1);
                self.orchestrator.set_page_size(size);
            }
            KeyCode::Backspace => {
                self.menu.path.pop();
            }
            KeyCode::Char(c) => self.menu.path.push(c),
            _ => {}
        }
        Flow::Continue
    }

    fn on_playing_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.back_to_menu();
            return;
        }

        if self.orchestrator.active().is_completed() {
            match key.code {
                KeyCode::Char('r') => self.retry(),
                KeyCode::Char('m') | KeyCode::Enter => self.back_to_menu(),
                KeyCode::Char('i') => {
                    let invert = !self.orchestrator.invert();
                    self.orchestrator.set_invert(invert);
                }
                _ => {}
            }
            return;
        }

        let KeyCode::Char(c) = key.code else {
            return;
        };
        let Some(position) = digit_index(c) else {
            return;
        };

        self.feedback = match self.orchestrator.active_mut() {
            ActiveSession::Matching(session) => match session.select_by_position(position) {
                Selection::Ignored => self.feedback,
                selection => Some(Feedback::Match(selection)),
            },
            ActiveSession::Selector(session) => match session.answer(position) {
                Answer::Ignored => self.feedback,
                answer => Some(Feedback::Answer(answer)),
            },
            ActiveSession::Idle => None,
        };
    }

    fn on_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => self.state = AppState::Menu,
            KeyCode::Char('r') => self.open_history(),
            KeyCode::Up => {
                self.history_view.scroll_offset = self.history_view.scroll_offset.saturating_sub(1)
            }
            KeyCode::Down => {
                let last = self.history_view.entries.len().saturating_sub(1);
                self.history_view.scroll_offset = (self.history_view.scroll_offset + 1).min(last);
            }
            KeyCode::Home => self.history_view.scroll_offset = 0,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryStore;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_path(app: &mut App, path: &str) {
        for c in path.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn digits_map_to_zero_based_positions() {
        assert_eq!(digit_index('1'), Some(0));
        assert_eq!(digit_index('9'), Some(8));
        assert_eq!(digit_index('0'), Some(9));
        assert_eq!(digit_index('x'), None);
        assert_eq!(position_key(9), Some('0'));
        assert_eq!(position_key(10), None);
    }

    #[test]
    fn full_page_of_ten_is_cleared_with_digit_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ten.txt");
        let text: String = (0..10).map(|i| format!("w{i} - t{i}\n")).collect();
        std::fs::write(&path, text).unwrap();

        let mut orchestrator = SessionOrchestrator::with_seed(None, 3);
        orchestrator.set_page_size(10);
        let mut app = App::new(orchestrator);
        app.menu.path = path.display().to_string();
        app.start_game();

        for _ in 0..10 {
            let ActiveSession::Matching(session) = app.orchestrator.active() else {
                panic!("matching expected");
            };
            if session.is_completed() {
                break;
            }
            // the last unmatched item always ends up in the bottom row
            let left_row = session
                .board
                .left_order
                .iter()
                .rposition(|i| !session.board.matched_left.contains(i))
                .unwrap();
            let left = session.board.left_order[left_row];
            let right_row = session.board.right_order.iter().position(|&r| r == left).unwrap();
            let (l, r) = (position_key(left_row).unwrap(), position_key(right_row).unwrap());

            app.on_key(key(KeyCode::Char(l)));
            assert_eq!(app.on_key(key(KeyCode::Char(r))), Flow::Continue);
            assert_eq!(app.feedback, Some(Feedback::Match(Selection::Matched)));
        }

        let ActiveSession::Matching(session) = app.orchestrator.active() else {
            panic!("matching expected");
        };
        assert!(session.is_completed());
        assert_eq!(session.summary().unwrap().correct, 10);
        assert_eq!(session.summary().unwrap().errors, 0);
    }

    #[test]
    fn menu_edits_settings() {
        let mut app = App::new(SessionOrchestrator::with_seed(None, 1));
        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.menu.game, GameKind::Selector);
        app.on_key(key(KeyCode::F(2)));
        assert!(app.orchestrator.invert());
        app.on_key(key(KeyCode::Up));
        assert_eq!(app.orchestrator.page_size(), 6);
        for _ in 0..20 {
            app.on_key(key(KeyCode::Down));
        }
        assert_eq!(app.orchestrator.page_size(), 1);

        type_path(&mut app, "abc");
        app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.menu.path, "ab");
        assert_eq!(app.on_key(key(KeyCode::Esc)), Flow::Quit);
    }

    #[test]
    fn missing_file_shows_an_error_and_stays_in_menu() {
        let dir = tempdir().unwrap();
        let mut app = App::new(SessionOrchestrator::with_seed(None, 1));
        type_path(&mut app, &dir.path().join("none.txt").display().to_string());
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Menu);
        assert!(app.menu.error.is_some());

        app.menu.path.clear();
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.menu.error.as_deref(), Some("Choose a file first"));
    }

    #[test]
    fn empty_file_reports_no_pairs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "\n   \nlonely\n").unwrap();

        let mut app = App::new(SessionOrchestrator::with_seed(None, 1));
        type_path(&mut app, &path.display().to_string());
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Menu);
        assert_eq!(
            app.menu.error.as_deref(),
            Some("Could not find any word pairs in the file")
        );
    }

    #[test]
    fn selector_game_through_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "one - uno\n").unwrap();
        let store = HistoryStore::with_path(dir.path().join("results.txt"));

        let mut app = App::new(SessionOrchestrator::with_seed(Some(store), 1));
        app.menu.game = GameKind::Selector;
        app.menu.path = path.display().to_string();
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Playing);

        // a single pair means a single option
        app.on_key(key(KeyCode::Char('1')));
        assert_eq!(app.feedback, Some(Feedback::Answer(Answer::Correct)));
        assert!(app.orchestrator.active().is_completed());

        app.on_key(key(KeyCode::Char('m')));
        assert_eq!(app.state, AppState::Menu);

        app.on_key(key(KeyCode::F(3)));
        assert_eq!(app.state, AppState::History);
        assert_eq!(app.history_view.entries.len(), 1);
        assert_eq!(app.history_view.entries[0].name.as_deref(), Some("words"));
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Menu);
    }

    #[test]
    fn retry_after_file_removed_returns_to_menu() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "one - uno\n").unwrap();

        let mut app = App::new(SessionOrchestrator::with_seed(None, 1));
        app.menu.path = path.display().to_string();
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Char('1')));
        app.on_key(key(KeyCode::Char('1')));
        assert!(app.orchestrator.active().is_completed());

        std::fs::remove_file(&path).unwrap();
        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.state, AppState::Menu);
        assert!(app.orchestrator.is_idle());
        assert!(app.menu.error.is_some());
    }

    #[test]
    fn config_round_trips_through_the_app() {
        let config = Config {
            page_size: 3,
            invert: true,
            game: GameKind::Selector,
            last_file: Some(PathBuf::from("words.txt")),
        };
        let app = App::with_config(SessionOrchestrator::with_seed(None, 1), &config);
        assert_eq!(app.menu.path, "words.txt");
        assert_eq!(app.to_config(), config);
    }
}
