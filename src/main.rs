//! api-relay: forwards any request path to a single upstream host.
//!
//! ```text
//!     Client ──▶ axum router ──▶ decode ──▶ Forwarder ──▶ Upstream API
//!     Client ◀── CORS layers ◀── translate (JSON | stream | error) ◀──┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_relay::config::load_or_default;
use api_relay::lifecycle::{wait_for_shutdown_signal, Shutdown};
use api_relay::observability::init_logging;
use api_relay::HttpServer;

#[derive(Parser)]
#[command(name = "api-relay")]
#[command(about = "Relay any HTTP request to a fixed upstream API", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; defaults are used without one.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!("api-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.normalized_base(),
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
