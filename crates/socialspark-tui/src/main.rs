use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{prelude::*, EnvFilter};

use socialspark_core::config::BACKEND_URL_ENV;
use socialspark_core::{ChatSession, Config, HttpBackend, SessionSettings};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser, Debug)]
#[command(name = "socialspark")]
#[command(about = "Chat with an AI assistant about your social media content")]
#[command(version)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = BACKEND_URL_ENV)]
    backend_url: Option<String>,

    /// Give up on a backend call after this many seconds (0 waits forever)
    #[arg(long, value_name = "SECS")]
    request_timeout: Option<u64>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs here instead of the data directory
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Skip the landing page and open the chat view
    #[arg(long)]
    chat: bool,
}

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("socialspark")
        .join("socialspark.log")
}

/// The terminal belongs to the UI, so tracing output goes to a file.
fn init_tracing(path: &Path, level: Option<&str>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open log file {:?}", path))?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("socialspark=info,socialspark_core=info")))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Arc::new(file)),
        )
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Command-line flags win over the config file.
fn session_settings(cli: &Cli, config: &Config) -> SessionSettings {
    let mut settings = config.session_settings();
    if let Some(secs) = cli.request_timeout {
        settings.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    settings
}

fn backend_url(cli: &Cli, config: &Config) -> String {
    cli.backend_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| config.backend_url())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_tracing(&log_path, config.log_level.as_deref())?;

    let url = backend_url(&cli, &config);
    let settings = session_settings(&cli, &config);
    tracing::info!(backend = %url, ?settings, "starting socialspark");

    let backend = Arc::new(HttpBackend::new(&url));
    let (session, session_rx) = ChatSession::new(backend.clone(), backend, settings);

    let mut app = App::new(session, url);
    if cli.chat {
        app.open_chat();
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(session_rx);

    let result = run(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    tracing::info!("exiting");
    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}
