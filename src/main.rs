use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use sova::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    history::HistoryStore,
    logging,
    runtime::{CrosstermEventSource, Runner},
    GameKind, SessionOrchestrator,
};

const TICK_RATE_MS: u64 = 250;

/// vocabulary trainer: match words with their translations or pick them from a list
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Load a list of word pairs (\"original - translation\" or \"original translation\", one per line) and practise them page by page. Results are appended to ~/.config/Sova/results.txt."
)]
pub struct Cli {
    /// word list to load right away
    file: Option<PathBuf>,

    /// which game to play
    #[clap(short = 'g', long, value_enum)]
    game: Option<GameKind>,

    /// number of pairs per page (1-10)
    #[clap(short = 'p', long)]
    page_size: Option<usize>,

    /// quiz translation -> original instead
    #[clap(short = 'i', long)]
    invert: bool,

    /// open the results history first
    #[clap(long)]
    history: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        // the game still runs without a log
        if let Err(err) = logging::init(&log_path) {
            eprintln!("logging disabled, could not open {}: {}", log_path.display(), err);
        }
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if let Some(game) = cli.game {
        config.game = game;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if cli.invert {
        config.invert = true;
    }
    if let Some(ref file) = cli.file {
        config.last_file = Some(file.clone());
    }

    let orchestrator = SessionOrchestrator::new(Some(HistoryStore::new()));
    let mut app = App::with_config(orchestrator, &config);
    if cli.history {
        app.open_history();
    } else if cli.file.is_some() {
        app.start_game();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(err) = config_store.save(&app.to_config()) {
        tracing::warn!(error = %err, "could not save config");
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), Duration::from_millis(TICK_RATE_MS));
    runner.run(app, |app| terminal.draw(|f| f.render_widget(app, f.area())).map(|_| ()))?;
    Ok(())
}
