//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptor, registration, server:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (substitution counters)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
