//! `slidekiosk` - full-screen terminal slideshow presenter.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{
    io, panic,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};

use slidekiosk::app::App;
use slidekiosk::config::Config;
use slidekiosk::constants::timing::{CLOCK_CHECK_SECS, INPUT_POLL_MS};
use slidekiosk::error::Result;
use slidekiosk::ui;

// Helper function to ensure the terminal is cleaned up on exit
fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

// Log to a file; the terminal belongs to the presenter
fn init_logging(path: &Path) -> Result<()> {
    let file = fs_err::OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration problems are reported before the screen is taken over
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(2);
        }
    };

    if let Some(path) = &config.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("Logging disabled: {}", e.user_message());
        }
    }
    tracing::info!("{} {} starting", config.app_name(), config.app_version());

    let app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(2);
        }
    };

    // Setup better panic handling that cleans up terminal first
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, config.tick_interval).await;

    // Restore terminal
    if let Err(e) = cleanup_terminal(&mut terminal) {
        eprintln!("Error cleaning up terminal: {e:?}");
    }

    if let Err(err) = res {
        tracing::error!("Presenter stopped: {}", err);
        eprintln!("{}", err.user_message());
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App, tick_interval: Duration) -> Result<()> {
    let clock_check = Duration::from_secs(CLOCK_CHECK_SECS);
    let mut last_tick = Instant::now();
    let mut last_clock_check = Instant::now();

    app.load_slides();

    loop {
        app.handle_updates(); // Handle async updates first

        terminal.draw(|f| ui::draw(f, &mut app))?;

        if event::poll(Duration::from_millis(INPUT_POLL_MS))? {
            if let event::Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // Catch up on missed ticks so autoplay keeps wall-clock pace
        while last_tick.elapsed() >= tick_interval {
            last_tick += tick_interval;
            app.on_tick();
        }

        if last_clock_check.elapsed() >= clock_check {
            last_clock_check = Instant::now();
            app.on_clock_check();
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
