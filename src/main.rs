//! Agent Notify server.
//!
//! ```text
//!     Agent / script                ┌──────────────────────────────────────────┐
//!     ──────────────── POST /notify │  http::server (body limit, request id)   │
//!                                   │      → http::handlers                    │
//!                                   │          validate → auth → rate limit    │
//!                                   │      → notification::dispatcher          │
//!                                   │          audio (say, deadline)           │
//!                                   │          visual (desktop popup)          │
//!                                   └──────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use agent_notify::config::loader::default_config_path;
use agent_notify::config::{load_or_default, save_config, validate_config, ConfigError};
use agent_notify::observability::{init_logging, metrics};
use agent_notify::{HttpServer, NotificationDispatcher, NotifyConfig, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "agent-notify", version)]
#[command(about = "Local notification bridge for automated agents", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.agent-notify/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Send one demonstration notification and exit
    #[arg(long)]
    demo: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    create_config: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.create_config {
        return create_config(cli.config);
    }

    let (mut config, source) = load_or_default(cli.config.as_deref());
    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability, cli.verbose)?;
    tracing::info!("agent-notify v{} starting", env!("CARGO_PKG_VERSION"));
    source.log();

    if cli.demo {
        return run_demo(&config).await;
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown.trigger_on_signal().await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_demo(config: &NotifyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = NotificationDispatcher::from_config(config);
    dispatcher.demo().await?;
    println!("Demo notification sent successfully!");
    Ok(())
}

fn create_config(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => p,
        None => default_config_path()?,
    };
    if path.exists() {
        println!("Configuration file already exists at {}", path.display());
        return Ok(());
    }
    save_config(&NotifyConfig::default(), &path)?;
    println!("Created default configuration at {}", path.display());
    Ok(())
}
