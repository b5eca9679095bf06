//! Huddle terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local server and join straight away
//! huddle --server ws://localhost:8000 --username alice
//!
//! # Verbose logs go to the log file, never to the terminal
//! RUST_LOG=huddle_client=debug huddle --log-file /tmp/huddle.log
//! ```

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use huddle_app::{Command, Runtime, WebSocketDriver};
use huddle_client::{DEFAULT_SERVER_ADDRESS, ServerAddress, transport::TransportConfig};
use huddle_tui::{TerminalUi, View};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Huddle terminal chat client
#[derive(Parser, Debug)]
#[command(name = "huddle")]
#[command(about = "Terminal client for a Huddle chat server")]
#[command(version)]
struct Args {
    /// Chat server URL (ws:// or wss://)
    #[arg(short, long, default_value = DEFAULT_SERVER_ADDRESS)]
    server: ServerAddress,

    /// Join as this user on startup
    #[arg(short, long)]
    username: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// File that receives log output
    #[arg(long, default_value = "huddle.log")]
    log_file: PathBuf,

    /// Connection handshake timeout in milliseconds
    #[arg(long, default_value = "10000")]
    connect_timeout_ms: u64,
}

const COMMAND_CHANNEL_CAPACITY: usize = 32;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = OpenOptions::new().create(true).append(true).open(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!(server = %args.server, "huddle starting");

    let config = TransportConfig {
        connect_timeout: Duration::from_millis(args.connect_timeout_ms),
        ..TransportConfig::default()
    };
    let runtime = Runtime::new(WebSocketDriver::new(config), args.server.clone());
    let session = runtime.subscribe();

    let (commands, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let runtime_task = tokio::spawn(runtime.run(rx));

    if let Some(username) = args.username {
        commands.send(Command::Join { username }).await?;
    }

    let ui = TerminalUi::new(View::new(args.server.to_string()))?;
    let result = ui.run(commands.clone(), session).await;

    // The runtime may already be gone.
    let _ = commands.send(Command::Quit).await;
    drop(commands);
    runtime_task.await?;

    tracing::info!("huddle stopped");
    Ok(result?)
}
