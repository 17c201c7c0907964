//! Static route registration.
//!
//! A [`RouteDefinition`] is interpreted only here, when it is mounted. Route
//! paths map onto the axum router as follows:
//!
//! | path                                  | handler     | mount                          |
//! |---------------------------------------|-------------|--------------------------------|
//! | `/`, `/{path*}`, `/{*path}`           | any         | router fallback                |
//! | `/assets/{path*}`                     | any         | `nest_service("/assets")`      |
//! | `/assets`                             | `directory` | `nest_service("/assets")`      |
//! | `/robots.txt`                         | `file`      | `route("/robots.txt")`         |
//!
//! Other path parameters have no axum counterpart for a static tree and are
//! rejected, as are handlers other than `directory` and `file`.

use std::path::{Path, PathBuf};

use axum::routing::{any_service, on_service, MethodFilter, MethodRouter};
use serde_json::Value;
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::schema::{RouteDefinition, StaticHandler, StaticRoute};

/// The static route could not be mounted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route definition must be an object")]
    NotAnObject,

    #[error("route definition is missing `{0}`")]
    MissingField(&'static str),

    #[error("handler `{0}` is not supported, expected `directory` or `file`")]
    UnsupportedHandler(String),

    #[error("path `{0}` cannot be mounted: only a trailing catch-all parameter is supported")]
    UnsupportedPath(String),

    #[error("`{0}` is not a supported HTTP method")]
    InvalidMethod(String),

    #[error("malformed route definition: {0}")]
    Malformed(String),

    #[error("path `{0}` would replace the router's existing fallback")]
    FallbackTaken(String),

    #[error("path `{path}` conflicts with existing route `{existing}`")]
    PathConflict { path: String, existing: String },
}

/// Where a static route attaches to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mount {
    /// Serves every request no other route matches.
    Fallback,
    /// Serves everything below a prefix, with the prefix stripped.
    Nest(String),
    /// Serves exactly one path.
    Route(String),
}

impl Mount {
    /// The route path this mount occupies, for conflict messages.
    pub fn path(&self) -> &str {
        match self {
            Self::Fallback => "/",
            Self::Nest(path) | Self::Route(path) => path,
        }
    }
}

/// A static route ready to be mounted.
#[derive(Debug)]
pub struct PreparedRoute {
    pub mount: Mount,
    pub service: MethodRouter,
    /// Path as given in the definition.
    pub path: String,
}

/// Interpret `definition` and build its service.
///
/// Pure apart from logging; nothing is mounted yet.
pub fn prepare(definition: &RouteDefinition, files_root: &Path) -> Result<PreparedRoute, RouteError> {
    let route = interpret(definition)?;
    let target = parse_path(&route.path)?;
    let filter = route.method.filter().map_err(RouteError::InvalidMethod)?;

    let (mount, service) = match &route.handler {
        StaticHandler::Directory(directory) => {
            let path = resolve(&directory.path, files_root);
            tracing::debug!(
                route = %route.path,
                directory = %path.display(),
                index = directory.index,
                "Building static directory service"
            );
            let serve_dir = ServeDir::new(path).append_index_html_on_directories(directory.index);
            let mount = match target {
                Target::CatchAll(prefix) | Target::Plain(prefix) => nest_or_fallback(prefix),
            };
            (mount, with_methods(filter, serve_dir))
        }
        StaticHandler::File(file) => {
            let path = resolve(file.path(), files_root);
            tracing::debug!(route = %route.path, file = %path.display(), "Building static file service");
            let mount = match target {
                Target::CatchAll(prefix) => nest_or_fallback(prefix),
                Target::Plain(path) if path.is_empty() => Mount::Route("/".to_string()),
                Target::Plain(path) => Mount::Route(path),
            };
            (mount, with_methods(filter, ServeFile::new(path)))
        }
    };

    Ok(PreparedRoute {
        mount,
        service,
        path: route.path,
    })
}

fn interpret(definition: &RouteDefinition) -> Result<StaticRoute, RouteError> {
    let Value::Object(fields) = definition.as_value() else {
        return Err(RouteError::NotAnObject);
    };
    if !fields.contains_key("path") {
        return Err(RouteError::MissingField("path"));
    }
    match fields.get("handler") {
        None => return Err(RouteError::MissingField("handler")),
        Some(Value::Object(handler)) if handler.contains_key("directory") || handler.contains_key("file") => {}
        Some(Value::Object(handler)) => {
            let names = handler.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
            return Err(RouteError::UnsupportedHandler(names));
        }
        Some(other) => return Err(RouteError::UnsupportedHandler(other.to_string())),
    }

    serde_json::from_value(definition.as_value().clone()).map_err(|e| RouteError::Malformed(e.to_string()))
}

/// Route path with the trailing slash and any catch-all segment removed.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    CatchAll(String),
    Plain(String),
}

fn parse_path(path: &str) -> Result<Target, RouteError> {
    let unsupported = || RouteError::UnsupportedPath(path.to_string());
    if !path.starts_with('/') {
        return Err(unsupported());
    }

    let (head, last) = path.rsplit_once('/').ok_or_else(unsupported)?;
    let (prefix, catch_all) = if is_catch_all(last) {
        (head, true)
    } else {
        (path.trim_end_matches('/'), false)
    };
    if prefix.contains(['{', '}', '*']) {
        return Err(unsupported());
    }

    let prefix = prefix.trim_end_matches('/').to_string();
    Ok(if catch_all {
        Target::CatchAll(prefix)
    } else {
        Target::Plain(prefix)
    })
}

/// `{name*}` or `{*name}`.
fn is_catch_all(segment: &str) -> bool {
    let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return false;
    };
    let name = inner.strip_suffix('*').or_else(|| inner.strip_prefix('*'));
    matches!(name, Some(name) if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}

fn nest_or_fallback(prefix: String) -> Mount {
    if prefix.is_empty() {
        Mount::Fallback
    } else {
        Mount::Nest(prefix)
    }
}

fn with_methods<T>(filter: Option<MethodFilter>, service: T) -> MethodRouter
where
    T: tower::Service<axum::extract::Request, Error = std::convert::Infallible> + Clone + Send + Sync + 'static,
    T::Response: axum::response::IntoResponse + 'static,
    T::Future: Send + 'static,
{
    match filter {
        Some(filter) => on_service(filter, service),
        None => any_service(service),
    }
}

fn resolve(path: &Path, files_root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        files_root.join(path)
    }
}
