mod app;
mod handler;
mod tui;
mod ui;

use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use spotswipe_core::{
    Config, CredentialStore, FileCredentialStore, HttpBackend, MemoryCredentialStore,
    SessionController,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::App;

/// Log to a file in the config directory; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let log_dir = Config::config_dir()?;
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("spotswipe.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn credential_store() -> Arc<dyn CredentialStore> {
    match FileCredentialStore::default_location() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("falling back to in-memory credentials: {}", e);
            Arc::new(MemoryCredentialStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("spotswipe: logging disabled: {}", e);
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!("could not read config, using defaults: {}", e);
        Config::new()
    });

    let base_url = config.backend_base();
    info!(environment = config.environment().as_str(), %base_url, "starting");
    let backend = HttpBackend::with_timeout(&base_url, config.request_timeout())?;

    let mut session = SessionController::new(Arc::new(backend), credential_store());
    session.load_places();
    let mut app = App::new(session, config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = run(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    info!("shutting down");
    Ok(())
}
