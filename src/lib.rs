// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod history;
pub mod logging;
pub mod matching;
pub mod orchestrator;
pub mod runtime;
pub mod selector;
pub mod session;
pub mod ui;
pub mod word_pairs;

pub use orchestrator::{GameKind, LoadError, SessionOrchestrator};
pub use word_pairs::WordPair;
