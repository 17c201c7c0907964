//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → routes / static directory fallback
//!     → error.rs (structured JSON errors from handlers)
//!     → errorh interceptor (error page substitution)
//!     → Send to client
//! ```

pub mod error;
pub mod server;

pub use error::{ErrorBody, HttpError};
pub use server::HttpServer;
