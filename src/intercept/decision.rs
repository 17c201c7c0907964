//! Interception decision.
//!
//! Pure function of (route opt-out, response status, error file map).
//! No I/O and no state; calling it twice on the same inputs yields the same
//! decision.

use std::path::Path;

use axum::http::StatusCode;

use crate::config::ErrorFileMap;

/// Which `errorFiles` entry produced a substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// The status code had its own entry.
    Exact,
    /// The `default` entry was used.
    Default,
}

impl MatchSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Default => "default",
        }
    }
}

/// Outcome for one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    /// Deliver the response untouched.
    PassThrough,
    /// Replace the body with `file`, keeping `status`.
    Substitute {
        file: &'a Path,
        status: StatusCode,
        source: MatchSource,
    },
}

/// Whether a status signals a failed request.
pub fn is_error(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

/// Decide what to do with a finished response.
///
/// `interception_enabled` is `false` only when the route explicitly opted
/// out; that check wins over everything else.
pub fn decide(files: &ErrorFileMap, interception_enabled: bool, status: StatusCode) -> Decision<'_> {
    if !interception_enabled || !is_error(status) {
        return Decision::PassThrough;
    }

    if let Some(file) = files.exact(status) {
        return Decision::Substitute {
            file,
            status,
            source: MatchSource::Exact,
        };
    }

    match files.fallback() {
        Some(file) => Decision::Substitute {
            file,
            status,
            source: MatchSource::Default,
        },
        None => Decision::PassThrough,
    }
}
