//! custcache - a terminal customer table that keeps working offline.
//!
//! On start the dataset is fetched from the configured URL and saved to the
//! local cache. If the fetch fails the last saved copy is shown instead.
//! Rows are scoped to the active user code and can be searched live.

mod app;
mod print;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use custcache_core::prefs::PreferenceStore;
use custcache_core::{Config, CustomerBoard};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use print::{OutputFormat, PrintSink};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written while the TUI owns the terminal
const LOG_FILE: &str = "custcache.log";

const USAGE: &str = "\
Usage: custcache [COMMAND]

Commands:
  (none)             Open the interactive table
  --print [--html]   Load once and print the table to stdout
  --set-user CODE    Set the active user code
  --clear-user       Show records for all users
  --set-url URL      Set the dataset URL
  --clear-cache      Delete the offline copy
  --help             Show this message

Environment:
  CUSTCACHE_DATA_URL   Overrides the configured dataset URL
  CUSTCACHE_USER_CODE  Overrides the stored user code
  RUST_LOG             Log filter (default: warn)";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Interactive,
    Print(OutputFormat),
    SetUser(String),
    ClearUser,
    SetUrl(String),
    ClearCache,
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = match args.as_slice() {
        [] => Command::Interactive,
        ["--print"] => Command::Print(OutputFormat::Text),
        ["--print", "--html"] | ["--html", "--print"] => Command::Print(OutputFormat::Html),
        ["--set-user", code] => Command::SetUser(code.to_string()),
        ["--clear-user"] => Command::ClearUser,
        ["--set-url", url] => Command::SetUrl(url.to_string()),
        ["--clear-cache"] => Command::ClearCache,
        ["--help"] | ["-h"] => Command::Help,
        _ => bail!("Unrecognized arguments: {}\n\n{}", args.join(" "), USAGE),
    };
    Ok(command)
}

/// Initialize the tracing subscriber for logging to stderr
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Initialize tracing into a log file so the TUI screen stays clean.
/// The returned guard must be held until exit to flush buffered lines.
fn init_file_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Interactive => run_interactive().await,
        Command::Print(format) => print_table(format).await,
        Command::SetUser(code) => {
            PreferenceStore::open_default()?.set_active_user_code(&code)?;
            eprintln!("Active user code set to {:?}", code);
            Ok(())
        }
        Command::ClearUser => {
            PreferenceStore::open_default()?.clear_active_user_code()?;
            eprintln!("Active user code cleared; all records will be shown");
            Ok(())
        }
        Command::SetUrl(url) => {
            let mut config = Config::load_file()?;
            config.data_url = Some(url.clone());
            config.save()?;
            eprintln!("Dataset URL set to {}", url);
            Ok(())
        }
        Command::ClearCache => {
            let config = Config::load()?;
            let board = CustomerBoard::from_config(&config)?;
            if board.cache().clear()? {
                eprintln!("Offline copy deleted");
            } else {
                eprintln!("No offline copy to delete");
            }
            Ok(())
        }
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

/// Load once and write the table to stdout
async fn print_table(format: OutputFormat) -> Result<()> {
    init_tracing();

    let config = Config::load()?;
    let mut board = CustomerBoard::from_config(&config)?;
    let mut sink = PrintSink::new(format, io::stderr());

    board.load(&mut sink).await;
    sink.finish(&mut io::stdout().lock())?;
    Ok(())
}

async fn run_interactive() -> Result<()> {
    let config = Config::load()?;
    let log_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let _log_guard = init_file_tracing(&log_dir)?;
    info!("custcache starting");

    let board = CustomerBoard::from_config(&config)?;
    let mut app = App::new(board);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start_load();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("custcache shutting down");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ignore key release/repeat events reported on some platforms
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
            }
        }

        // Check for a completed fetch
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
