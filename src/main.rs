// src/main.rs

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;

mod app;
mod config;
mod core;
mod logging;
mod ui;

use crate::app::App;
use crate::config::{Args, Config};
use crate::core::api::{HttpScanApi, ScanApi};
use crate::core::events::{EventSender, ScanEvent};

fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::from(Args::parse());
    // Before the runtime exists: the local UTC offset can only be read while
    // the process is single-threaded.
    logging::initialize_logging()?;

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    info!(api_url = %config.api_url, poll_ms = config.poll_interval.as_millis() as u64, "Starting dashboard.");

    let api = Arc::new(HttpScanApi::new(&config)?);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(Arc::clone(&api), tx.clone(), &config);

    app.recent.load();
    spawn_health_check(api, tx);

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut app, &mut rx);

    // --- Restore Terminal ---
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Dashboard closed.");
    result
}

fn event_loop<B: Backend, A: ScanApi>(
    terminal: &mut Terminal<B>,
    app: &mut App<A>,
    rx: &mut mpsc::UnboundedReceiver<ScanEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        while let Ok(scan_event) = rx.try_recv() {
            app.handle_scan_event(scan_event);
        }

        app.on_tick();
    }
    Ok(())
}

fn spawn_health_check<A: ScanApi>(api: Arc<A>, events: EventSender) {
    tokio::spawn(async move {
        let result = api.health().await;
        let _ = events.send(ScanEvent::Health(result));
    });
}
