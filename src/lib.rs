//! Custom static error pages for axum routers.
//!
//! Error responses (status >= 400) are replaced with a static file chosen by
//! status code, with a `default` fallback, unless the route opted out with
//! the `errorh = false` route setting. The status code is preserved and the
//! content type is set to `text/html`. An optional static directory route can
//! be registered alongside.
//!
//! ```no_run
//! use axum::routing::get;
//! use errorh::{ErrorPages, HttpError, Site};
//!
//! let site = Site::new()
//!     .route("/boom", get(|| async { HttpError::not_implemented() }))
//!     .register(
//!         ErrorPages::new().files_root("public"),
//!         &serde_json::json!({
//!             "errorFiles": { "404": "404.html", "default": "50x.html" },
//!             "staticRoute": { "path": "/{path*}", "handler": { "directory": { "path": "." } } }
//!         }),
//!     )
//!     .expect("valid options");
//!
//! // Routes added after registration are intercepted too.
//! let router = site
//!     .route("/quiet", get(|| async { HttpError::not_found() }))
//!     .disable_interception("/quiet")
//!     .into_router();
//! # let _ = router;
//! ```

pub mod config;
pub mod http;
pub mod intercept;
pub mod observability;
pub mod plugin;
pub mod routing;

pub use config::{ErrorFileMap, PluginOptions, RouteDefinition, ServerConfig, StaticRoute};
pub use http::{HttpError, HttpServer};
pub use intercept::{FileResponder, ServeFileResponder};
pub use plugin::{ErrorPages, RegisterError, PLUGIN_NAME};
pub use routing::{RouteError, RouteSettings, Site};
