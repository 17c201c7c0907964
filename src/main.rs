//! errorh-server: a static file server with custom error pages.
//!
//! ```text
//! errorh.toml
//!     → config::loader (parse + validate)
//!     → HttpServer (static route + error page interceptor)
//!     → axum::serve until Ctrl+C
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use errorh::config::{load_config, ServerConfig};
use errorh::observability::{logging, metrics};
use errorh::HttpServer;

#[derive(Parser)]
#[command(name = "errorh-server")]
#[command(about = "Serve a static tree with custom error pages", long_about = None)]
struct Cli {
    /// Configuration file (TOML, or JSON with a `.json` extension).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);

    tracing::info!("errorh-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        relative_to = %config.files.relative_to.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_exporter(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
