//! Structured logging.
//!
//! Uses the tracing crate; `RUST_LOG` overrides the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Call once, from `main`.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(log_level: &str) -> String {
    format!("errorh={log_level},errorh_server={log_level},tower_http={log_level}")
}
