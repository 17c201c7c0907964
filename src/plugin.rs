//! Plugin registration.
//!
//! Validates options, then installs whichever of the two behaviours is
//! configured: the static route and the error page interceptor. Every
//! failure is detected before anything is mounted.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::config::loader::join_errors;
use crate::config::validation::{validate_options, ValidationError};
use crate::config::PluginOptions;
use crate::intercept::{FileResponder, ServeFileResponder};
use crate::routing::static_route::{self, RouteError};
use crate::routing::Site;

/// Name under which route settings for this plugin are stored.
pub const PLUGIN_NAME: &str = "errorh";

/// Registration failure. Nothing was mounted.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("invalid errorh options: {}", join_errors(.0))]
    InvalidOptions(Vec<ValidationError>),

    #[error("errorh static route could not be registered: {0}")]
    Route(#[from] RouteError),

    #[error("errorh is already registered on this site")]
    AlreadyRegistered,
}

/// Plugin settings that are not part of the options object.
pub struct ErrorPages {
    files_root: PathBuf,
    responder: Option<Arc<dyn FileResponder>>,
}

impl Default for ErrorPages {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorPages {
    /// Files resolve against the working directory.
    pub fn new() -> Self {
        Self {
            files_root: PathBuf::from("."),
            responder: None,
        }
    }

    /// Root for error page paths and relative static paths.
    #[must_use]
    pub fn files_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.files_root = root.into();
        self
    }

    /// Replace the default [`ServeFileResponder`].
    #[must_use]
    pub fn responder(mut self, responder: impl FileResponder + 'static) -> Self {
        self.responder = Some(Arc::new(responder));
        self
    }

    fn install(self, mut site: Site, options: PluginOptions) -> Result<Site, RegisterError> {
        if site.registered {
            return Err(RegisterError::AlreadyRegistered);
        }

        let prepared = match &options.static_route {
            Some(definition) => {
                let prepared = static_route::prepare(definition, &self.files_root)?;
                site.check_mount(&prepared.mount, &prepared.path)?;
                Some(prepared)
            }
            None => None,
        };

        if let Some(prepared) = prepared {
            tracing::info!(path = %prepared.path, mount = prepared.mount.path(), "Static route registered");
            site.mount(prepared);
        }

        match options.error_files {
            Some(files) => {
                let responder: Arc<dyn FileResponder> = match self.responder {
                    Some(responder) => responder,
                    None => Arc::new(ServeFileResponder::new(self.files_root)),
                };
                tracing::info!(
                    entries = files.entries().count(),
                    has_default = files.fallback().is_some(),
                    "Error page interception enabled"
                );
                site.enable_interception(files, responder);
            }
            None => tracing::debug!("errorFiles not configured, interception disabled"),
        }

        site.registered = true;
        Ok(site)
    }
}

impl Site {
    /// Validate raw options and register the plugin.
    ///
    /// Routes may be added before or after this call.
    pub fn register(self, pages: ErrorPages, options: &Value) -> Result<Self, RegisterError> {
        let options = validate_options(options).map_err(|errors| {
            tracing::error!(errors = %join_errors(&errors), "Rejected errorh options");
            RegisterError::InvalidOptions(errors)
        })?;
        pages.install(self, options)
    }

    /// Register already-typed options.
    pub fn register_options(self, pages: ErrorPages, options: PluginOptions) -> Result<Self, RegisterError> {
        pages.install(self, options)
    }
}
