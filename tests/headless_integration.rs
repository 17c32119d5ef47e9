use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::tempdir;

use sova::app::{App, AppState, Flow};
use sova::history::HistoryStore;
use sova::orchestrator::{ActiveSession, GameKind, SessionOrchestrator};
use sova::runtime::{AppEvent, ChannelEventSource, Runner};

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn digit(position: usize) -> char {
    char::from_digit(position as u32 + 1, 10).unwrap()
}

/// Digits the player would press next to match the first unmatched left item
fn next_matching_keys(app: &App) -> Option<(char, char)> {
    let ActiveSession::Matching(session) = app.orchestrator.active() else {
        return None;
    };
    if session.is_completed() {
        return None;
    }
    let page = session.page_pairs();
    let left_pos = session
        .board
        .left_order
        .iter()
        .position(|i| !session.board.matched_left.contains(i))?;
    let left = session.board.left_order[left_pos];
    let right_pos = session.board.right_order.iter().position(|&r| {
        !session.board.matched_right.contains(&r) && page[r].translation == page[left].translation
    })?;
    Some((digit(left_pos), digit(right_pos)))
}

// Headless integration using the internal runtime + App without a TTY
#[test]
fn headless_matching_flow_completes_and_records() {
    let dir = tempdir().unwrap();
    let words = dir.path().join("animals.txt");
    std::fs::write(
        &words,
        "cat - gato\ndog - perro\nbird - pajaro\nfish - pez\nhorse - caballo\nmouse - raton\nbear - oso\n",
    )
    .unwrap();
    let store = HistoryStore::with_path(dir.path().join("results.txt"));

    let mut orchestrator = SessionOrchestrator::with_seed(Some(store.clone()), 42);
    orchestrator.set_page_size(3);
    let mut app = App::new(orchestrator);
    app.menu.path = words.display().to_string();
    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert_eq!(app.state, AppState::Playing);

    let (tx, source) = ChannelEventSource::channel();
    let runner = Runner::new(source, Duration::from_millis(5));

    let mut pages_seen = vec![];
    for _ in 0..100u32 {
        if let ActiveSession::Matching(session) = app.orchestrator.active() {
            if !pages_seen.contains(&session.page()) {
                pages_seen.push(session.page());
            }
        }
        let Some((left, right)) = next_matching_keys(&app) else {
            break;
        };
        tx.send(key(left)).unwrap();
        tx.send(key(right)).unwrap();

        for _ in 0..2 {
            match runner.step() {
                Some(AppEvent::Key(k)) => assert_eq!(app.on_key(k), Flow::Continue),
                Some(AppEvent::Resize | AppEvent::Tick) => {}
                None => panic!("input closed early"),
            }
        }
    }

    assert_eq!(pages_seen, vec![0, 1, 2]);
    assert!(app.orchestrator.active().is_completed());

    let entries = store.load_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name.as_deref(), Some("animals"));
    assert_eq!(entries[0].correct, Some(7));
    assert_eq!(entries[0].errors, Some(0));
    assert_eq!(entries[0].success_rate, Some(100));
    assert!(entries[0].time_seconds.is_some());
}

#[test]
fn headless_selector_retry_and_menu() {
    let dir = tempdir().unwrap();
    let words = dir.path().join("words.txt");
    std::fs::write(&words, "one - uno\ntwo - dos\n").unwrap();

    let mut app = App::new(SessionOrchestrator::with_seed(None, 7));
    app.menu.game = GameKind::Selector;
    app.menu.path = words.display().to_string();
    app.start_game();

    let answer_correctly = |app: &mut App| {
        let ActiveSession::Selector(session) = app.orchestrator.active() else {
            panic!("selector expected");
        };
        let expected = session.current_pair().unwrap().translation.clone();
        let pos = session.options().iter().position(|o| *o == expected).unwrap();
        app.on_key(KeyEvent::new(KeyCode::Char(digit(pos)), KeyModifiers::NONE));
    };

    answer_correctly(&mut app);
    answer_correctly(&mut app);
    assert!(app.orchestrator.active().is_completed());

    // invert before retrying: the whole retried game is inverted
    app.on_key(KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE));
    app.on_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
    assert_eq!(app.state, AppState::Playing);
    let ActiveSession::Selector(session) = app.orchestrator.active() else {
        panic!("selector expected");
    };
    assert_eq!(session.current_pair().unwrap().original, "uno");
    assert_eq!(session.game_id(), 2);

    app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    assert_eq!(app.state, AppState::Menu);
    assert!(app.orchestrator.is_idle());
}
