//! Metrics collection and exposition.
//!
//! # Metrics
//! - `errorh_substitutions_total` (counter): error pages served, by source, status
//! - `errorh_substitution_failures_total` (counter): error pages that could not
//!   be served, by original status and the responder's status
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::intercept::MatchSource;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_exporter(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_substitution(source: MatchSource, status: StatusCode) {
    metrics::counter!(
        "errorh_substitutions_total",
        "source" => source.as_str(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

pub fn record_substitution_failure(status: StatusCode, served: StatusCode) {
    metrics::counter!(
        "errorh_substitution_failures_total",
        "status" => status.as_u16().to_string(),
        "served_status" => served.as_u16().to_string()
    )
    .increment(1);
}
