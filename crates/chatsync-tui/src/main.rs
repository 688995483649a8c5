//! chatsync entry point.

use std::{
    fs::OpenOptions,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chatsync_client::http::{HttpClient, HttpConfig};
use chatsync_tui::{App, Runtime, TerminalDriver, config};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Terminal chat client for a polling JSON-over-HTTP chat server
#[derive(Parser, Debug)]
#[command(name = "chatsync")]
#[command(about = "Terminal chat client: presence, conversations, typing and read receipts")]
#[command(version)]
struct Args {
    /// Server base URL, e.g. `http://localhost:5000`
    #[arg(short, long)]
    server: Option<String>,

    /// Local username (trimmed and lowercased)
    #[arg(short, long)]
    username: Option<String>,

    /// Session cookie sent with every request, e.g. `session=...`
    #[arg(long)]
    cookie: Option<String>,

    /// Config file (default: `<config dir>/chatsync/config.toml`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file (default: `<cache dir>/chatsync/chatsync.log`)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = config::load(args.config.as_deref())?;
    config.server = args.server.or(config.server);
    config.username = args.username.or(config.username);
    config.session_cookie = args.cookie.or(config.session_cookie);
    config.log_file = args.log_file.or(config.log_file);

    if let Some(path) = config.log_file.clone().or_else(config::default_log_path) {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&args.log_level))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let server = config.require_server()?;
    let username = config.require_username()?;

    let mut http = HttpConfig::new(server);
    http.session_cookie.clone_from(&config.session_cookie);
    http.timeout = config.request_timeout();
    let client = HttpClient::new(&http)?;
    info!(server, username, "starting chatsync");

    let app = App::new(username).with_stale_guard(config.sync.discard_stale_responses);
    let driver = TerminalDriver::new(Arc::new(client))?;
    Runtime::new(driver, app, &config.sync).run().await?;

    info!("chatsync stopped");
    Ok(())
}
