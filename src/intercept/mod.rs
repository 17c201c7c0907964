//! Response interception subsystem.
//!
//! # Data Flow
//! ```text
//! Handler / fallback response
//!     → middleware.rs (read route opt-out, run inner service)
//!     → decision.rs (pure: pass-through | substitute exact | substitute default)
//!     → responder.rs (serve the error page, only on substitute)
//!     → status forced back to the original error, Content-Type: text/html
//! ```
//!
//! # Design Decisions
//! - Decision is separated from I/O so the policy is testable in isolation
//! - Responder failures surface as the responder's own response
//! - No cross-request state

pub mod decision;
pub mod middleware;
pub mod responder;

pub use decision::{decide, Decision, MatchSource};
pub use middleware::{intercept_errors, Interceptor};
pub use responder::{FileResponder, ServeFileResponder};
