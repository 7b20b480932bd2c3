//! Scanlist TUI: browse a breakout scan as a two-pane table.
//!
//! Left pane: symbols, always visible. Right pane: the configured attribute
//! columns, horizontally scrollable. Both panes share selection, sort order
//! and vertical scroll. Headers can be clicked to sort, dragged to reorder
//! and right-clicked to show or hide columns.

mod app;
mod input;
mod logging;
mod persistence;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use scanlist_core::{FileConfigStore, LabelMode};

use crate::app::AppState;
use crate::logging::LoggingConfig;

#[derive(Parser)]
#[command(name = "scanlist", about = "Browse breakout scan results in a dual-pane table")]
struct Args {
    /// Scan results JSON (`{"results": [...]}`). Defaults to the last file opened.
    scan_file: Option<PathBuf>,

    /// Column config TOML (default: <config dir>/scanlist/columns.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label summary: avg, max, best_quality or latest
    #[arg(long)]
    label_mode: Option<LabelMode>,
}

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(info);
    }));

    let args = Args::parse();

    if let Err(e) = logging::init(&LoggingConfig::default()) {
        eprintln!("warning: file logging disabled: {e}");
    }

    // Paths
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scanlist");
    let state_path = config_dir.join("ui_state.json");
    let columns_path = args.config.unwrap_or_else(|| config_dir.join("columns.toml"));

    // Build app state
    let mut app = AppState::new(FileConfigStore::open(&columns_path), args.scan_file);
    persistence::apply(&mut app, persistence::load(&state_path));
    if let Some(mode) = args.label_mode {
        app.table.set_label_mode(mode);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let size = terminal.size()?;
    input::handle_resize(&mut app, size.width, size.height);
    if app.scan_path.is_some() {
        app.reload();
    }

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(path = %state_path.display(), error = %e, "failed to save ui state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        // 1. Fire due timers (tooltip) and apply table notifications.
        app.table.tick(Instant::now());
        app.drain_events();

        // 2. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Resize(width, height) => input::handle_resize(app, width, height),
                _ => {}
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
