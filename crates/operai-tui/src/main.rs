//! OperAI terminal client.
//!
//! Interactive chat with the workforce assistant, plus one-shot commands for
//! scripting.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use operai_client::{execute_with_timeout, AssistantClient, ClientConfig};
use operai_core::{ChatMessage, ChatSession, HistoryEntry, SessionId};
use operai_ui::utils::{line_text, truncate, wrap_text_indented};
use operai_ui::{message_lines, Theme};

mod app;
mod backend;
mod config;
mod event;
mod state;
mod ui;

use app::App;
use config::{mode_for, ServerArgs};
use event::{BackendCommand, UiEvent};
use state::UiState;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "operai=info";

/// Width used for printed output when the terminal size is unknown.
const FALLBACK_WIDTH: usize = 100;

#[derive(Parser)]
#[command(name = "operai")]
#[command(about = "Terminal client for the OperAI workforce assistant")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    /// Log file for the interactive view (defaults to a file in the temp dir)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat {
        /// Talk to the plain chat endpoint; nothing is executed
        #[arg(long)]
        plain: bool,

        /// Continue an existing session instead of starting a new one
        #[arg(long)]
        session: Option<String>,
    },

    /// Send one command and print the reply
    Send {
        /// Command text
        message: String,

        /// Talk to the plain chat endpoint; nothing is executed
        #[arg(long)]
        plain: bool,

        /// Print the normalized reply as JSON
        #[arg(long)]
        json: bool,

        /// Session to send the command in
        #[arg(long)]
        session: Option<String>,
    },

    /// Show stored command history, oldest first
    History {
        /// Only show turns from this session
        #[arg(long)]
        session: Option<String>,

        /// Print the entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the server answers
    Health,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat {
        plain: false,
        session: None,
    });

    match command {
        Commands::Chat { plain, session } => {
            let log_file = cli
                .log_file
                .unwrap_or_else(|| std::env::temp_dir().join("operai-tui.log"));
            init_file_logging(&log_file);

            let config = cli.server.client_config(mode_for(plain))?;
            run_chat_tui(config, session.map(SessionId::new))
        }
        Commands::Send {
            message,
            plain,
            json,
            session,
        } => {
            init_stderr_logging();
            let config = cli.server.client_config(mode_for(plain))?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(send_once(config, session.map(SessionId::new), &message, json))
        }
        Commands::History { session, json } => {
            init_stderr_logging();
            let config = cli.server.client_config(mode_for(false))?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(show_history(config, session.map(SessionId::new), json))
        }
        Commands::Health => {
            init_stderr_logging();
            let config = cli.server.client_config(mode_for(false))?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(check_health(config))
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Log to a file so the terminal is left to the TUI.
fn init_file_logging(path: &Path) {
    if let Ok(file) = std::fs::File::create(path) {
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_env_filter(env_filter())
            .with_ansi(false)
            .init();
    }
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .init();
}

fn run_chat_tui(config: ClientConfig, session: Option<SessionId>) -> Result<(), Box<dyn Error>> {
    let client = Arc::new(AssistantClient::new(&config)?);
    let session = session.map(ChatSession::with_id).unwrap_or_default();
    info!(
        api_url = %config.base_url,
        mode = config.mode.name(),
        session_id = %session.session_id(),
        "Starting chat TUI"
    );

    // Create channels for UI <-> backend communication
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(100);
    let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>(100);

    // Spawn background thread with its own tokio runtime
    let timeout = config.timeout;
    let bg_handle = std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(backend::run_backend(client, timeout, ui_tx, cmd_rx));
    });

    // Initialize terminal (enters alternate screen, enables raw mode)
    let terminal = ratatui::init();

    let state = UiState::new(session, config.base_url.clone(), config.mode);
    let mut app = App::new(state, ui_rx, cmd_tx);
    let result = app.run(terminal);

    // Restore terminal (exits alternate screen, disables raw mode)
    ratatui::restore();

    // Wait for background thread to finish
    let _ = bg_handle.join();

    info!("TUI shutdown complete");

    result.map_err(|e| e.into())
}

async fn send_once(
    config: ClientConfig,
    session: Option<SessionId>,
    message: &str,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let client = AssistantClient::new(&config)?;
    let mut session = session.map(ChatSession::with_id).unwrap_or_default();
    let request = session.submit(message)?;
    info!(session_id = %request.session_id, mode = config.mode.name(), "Sending command");

    let reply = execute_with_timeout(&client, &request, config.timeout)
        .await
        .map_err(|e| {
            error!(error = %e, "Command failed");
            e
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    let width = output_width();
    let theme = Theme::default();
    for line in message_lines(&ChatMessage::from_reply(reply), width, &theme) {
        println!("{}", line_text(&line));
    }
    Ok(())
}

async fn show_history(
    config: ClientConfig,
    session: Option<SessionId>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let client = AssistantClient::new(&config)?;
    // The server answers newest first.
    let mut entries = client.history(session.as_ref()).await?;
    entries.reverse();
    info!(count = entries.len(), "Fetched history");

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    let width = output_width();
    for entry in &entries {
        for line in history_lines(entry, width) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Plain-text rendering of one stored turn.
fn history_lines(entry: &HistoryEntry, width: usize) -> Vec<String> {
    let when = entry
        .created_at()
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let kind = entry.action_type.as_deref().unwrap_or("chat");

    let mut header = format!("{}  [{}]", when, kind);
    if let Some(session) = &entry.session_id {
        header.push_str("  ");
        header.push_str(&truncate(session, 24));
    }

    let mut lines = vec![header];
    lines.extend(wrap_text_indented(&entry.message, width, "  > "));
    lines.extend(wrap_text_indented(&entry.response, width, "    "));
    lines.push(String::new());
    lines
}

async fn check_health(config: ClientConfig) -> Result<(), Box<dyn Error>> {
    let client = AssistantClient::new(&config)?;
    if client.health().await? {
        println!("{} is reachable", client.base_url());
        Ok(())
    } else {
        Err(format!("{} answered with an error status", client.base_url()).into())
    }
}

fn output_width() -> usize {
    ratatui::crossterm::terminal::size()
        .map(|(width, _)| width as usize)
        .unwrap_or(FALLBACK_WIDTH)
}
