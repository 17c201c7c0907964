//! Configuration schema definitions.
//!
//! Two layers live here:
//! - [`PluginOptions`], the options accepted by plugin registration
//!   (`errorFiles` and `staticRoute`).
//! - [`ServerConfig`], the file-based configuration of the `errorh-server`
//!   binary, which embeds raw plugin options under `errorh`.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use axum::http::{Method, StatusCode};
use axum::routing::MethodFilter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved `errorFiles` key naming the fallback page.
pub const DEFAULT_KEY: &str = "default";

/// Options accepted by plugin registration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginOptions {
    /// Status code to error page mapping. `None` disables interception.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_files: Option<ErrorFileMap>,

    /// Extra route serving static files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_route: Option<RouteDefinition>,
}

/// A key of the `errorFiles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorKey {
    /// An exact HTTP status code.
    Status(u16),
    /// The `default` fallback entry.
    Default,
}

impl ErrorKey {
    /// Parse a raw table key. Returns `None` for keys no response can carry.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == DEFAULT_KEY {
            return Some(Self::Default);
        }
        let code = raw.parse::<u16>().ok()?;
        StatusCode::from_u16(code).ok().map(|status| Self::Status(status.as_u16()))
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{code}"),
            Self::Default => f.write_str(DEFAULT_KEY),
        }
    }
}

/// Mapping from HTTP status code to error page, plus an optional fallback.
///
/// Paths are relative to the files root of the responder serving them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    from = "BTreeMap<String, Value>",
    into = "BTreeMap<String, String>"
)]
pub struct ErrorFileMap {
    by_status: BTreeMap<u16, PathBuf>,
    fallback: Option<PathBuf>,
}

impl ErrorFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from raw table entries.
    ///
    /// Any object is accepted. Entries whose key is neither `default` nor a
    /// status code, or whose value is not a non-empty string, can never be
    /// served and are skipped.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a Value)>) -> Self {
        let mut map = Self::new();
        for (key, value) in entries {
            let file = value.as_str().filter(|file| !file.is_empty());
            let (Some(parsed), Some(file)) = (ErrorKey::parse(key), file) else {
                tracing::debug!(key, value = %value, "Ignoring errorFiles entry that can never match");
                continue;
            };
            map.insert_key(parsed, PathBuf::from(file));
        }
        map
    }

    /// Map `status` to `file`, replacing any previous entry.
    pub fn insert(&mut self, status: StatusCode, file: impl Into<PathBuf>) {
        self.by_status.insert(status.as_u16(), file.into());
    }

    /// Set the `default` page used when no exact entry exists.
    pub fn set_default(&mut self, file: impl Into<PathBuf>) {
        self.fallback = Some(file.into());
    }

    #[must_use]
    pub fn with(mut self, status: StatusCode, file: impl Into<PathBuf>) -> Self {
        self.insert(status, file);
        self
    }

    #[must_use]
    pub fn with_default(mut self, file: impl Into<PathBuf>) -> Self {
        self.set_default(file);
        self
    }

    /// The page mapped to exactly this status.
    pub fn exact(&self, status: StatusCode) -> Option<&Path> {
        self.by_status.get(&status.as_u16()).map(PathBuf::as_path)
    }

    /// The `default` page.
    pub fn fallback(&self) -> Option<&Path> {
        self.fallback.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.by_status.is_empty() && self.fallback.is_none()
    }

    /// Iterate over all entries, exact status codes first.
    pub fn entries(&self) -> impl Iterator<Item = (ErrorKey, &Path)> {
        self.by_status
            .iter()
            .map(|(code, path)| (ErrorKey::Status(*code), path.as_path()))
            .chain(self.fallback.as_deref().map(|path| (ErrorKey::Default, path)))
    }

    fn insert_key(&mut self, key: ErrorKey, file: PathBuf) {
        match key {
            ErrorKey::Status(code) => {
                self.by_status.insert(code, file);
            }
            ErrorKey::Default => self.fallback = Some(file),
        }
    }
}

impl From<BTreeMap<String, Value>> for ErrorFileMap {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        Self::from_entries(raw.iter().map(|(key, value)| (key.as_str(), value)))
    }
}

impl From<ErrorFileMap> for BTreeMap<String, String> {
    fn from(map: ErrorFileMap) -> Self {
        map.entries()
            .map(|(key, path)| (key.to_string(), path.display().to_string()))
            .collect()
    }
}

/// Route definition for the optional static route, kept as given.
///
/// Registration only checks that it is an object; the router interprets it
/// as a [`StaticRoute`] when mounting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RouteDefinition(Value);

impl RouteDefinition {
    pub fn new(definition: Value) -> Self {
        Self(definition)
    }

    /// Definition of an already-typed route.
    pub fn from_route(route: &StaticRoute) -> Result<Self, serde_json::Error> {
        serde_json::to_value(route).map(Self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RouteDefinition {
    fn from(definition: Value) -> Self {
        Self(definition)
    }
}

/// A route definition as the router understands it.
///
/// Only the fields needed to mount the route are read; anything else in the
/// definition is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StaticRoute {
    /// Route path. Catch-all patterns such as `/{path*}` mount a prefix.
    pub path: String,

    /// `"*"`, a single method, or a list of methods.
    #[serde(default)]
    pub method: MethodSpec,

    pub handler: StaticHandler,
}

/// What the static route serves.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StaticHandler {
    Directory(DirectoryHandler),
    File(FileHandler),
}

/// Directory served by the static route.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DirectoryHandler {
    /// Directory to serve. Relative paths resolve against the files root.
    pub path: PathBuf,

    /// Serve `index.html` for directory requests.
    #[serde(default = "default_index")]
    pub index: bool,
}

fn default_index() -> bool {
    true
}

/// Single file served for every request the static route matches.
///
/// Either a bare path or `{ path }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FileHandler {
    Path(PathBuf),
    Options { path: PathBuf },
}

impl FileHandler {
    pub fn path(&self) -> &Path {
        match self {
            Self::Path(path) | Self::Options { path } => path,
        }
    }
}

/// Methods accepted by the static route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MethodSpec {
    One(String),
    Many(Vec<String>),
}

impl Default for MethodSpec {
    fn default() -> Self {
        Self::One("*".to_string())
    }
}

impl MethodSpec {
    /// Resolve to a router method filter. `Ok(None)` means any method.
    ///
    /// On failure returns the offending method token.
    pub fn filter(&self) -> Result<Option<MethodFilter>, String> {
        let tokens: &[String] = match self {
            Self::One(token) => std::slice::from_ref(token),
            Self::Many(tokens) => tokens,
        };

        if tokens.is_empty() {
            return Err(String::new());
        }
        if tokens.iter().any(|t| t == "*") {
            return Ok(None);
        }

        let mut filter: Option<MethodFilter> = None;
        for token in tokens {
            let method = Method::from_bytes(token.to_ascii_uppercase().as_bytes())
                .map_err(|_| token.clone())?;
            let single = MethodFilter::try_from(method).map_err(|_| token.clone())?;
            filter = Some(match filter {
                Some(acc) => acc.or(single),
                None => single,
            });
        }
        Ok(filter)
    }
}

/// Root configuration of the `errorh-server` binary.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Where error pages and the static tree live.
    pub files: FilesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Raw plugin options, validated at registration.
    pub errorh: serde_json::Value,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// File lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Root that error page paths and relative static directories resolve against.
    pub relative_to: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            relative_to: PathBuf::from("."),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_key_parse() {
        assert_eq!(ErrorKey::parse("404"), Some(ErrorKey::Status(404)));
        assert_eq!(ErrorKey::parse("default"), Some(ErrorKey::Default));
        assert_eq!(ErrorKey::parse("99"), None);
        assert_eq!(ErrorKey::parse("1000"), None);
        assert_eq!(ErrorKey::parse("Default"), None);
        assert_eq!(ErrorKey::parse("not-found"), None);
    }

    #[test]
    fn test_error_key_whitespace_not_trimmed() {
        assert_eq!(ErrorKey::parse(" 404"), None);
        assert_eq!(ErrorKey::parse("404 "), None);
        assert_eq!(ErrorKey::parse(" default"), None);
    }

    #[test]
    fn test_error_file_map_deserialize() {
        let map: ErrorFileMap =
            serde_json::from_value(json!({ "404": "404.html", "default": "50x.html" })).unwrap();

        assert_eq!(map.exact(StatusCode::NOT_FOUND), Some(Path::new("404.html")));
        assert_eq!(map.exact(StatusCode::INTERNAL_SERVER_ERROR), None);
        assert_eq!(map.fallback(), Some(Path::new("50x.html")));
    }

    #[test]
    fn test_error_file_map_skips_unusable_entries() {
        let map: ErrorFileMap = serde_json::from_value(json!({
            "404": "404.html",
            "notes": "x",
            "500": "",
            "503": 7,
            "502": null,
        }))
        .unwrap();

        assert_eq!(map.entries().count(), 1);
        assert_eq!(map.exact(StatusCode::NOT_FOUND), Some(Path::new("404.html")));
        assert_eq!(map.exact(StatusCode::INTERNAL_SERVER_ERROR), None);
        assert_eq!(map.fallback(), None);
    }

    #[test]
    fn test_plugin_options_from_toml() {
        let options: PluginOptions = toml::from_str(
            r#"
            [errorFiles]
            404 = "404.html"
            default = "50x.html"

            [staticRoute]
            path = "/{path*}"
            method = "*"
            handler = { directory = { path = "./", index = true, redirectToSlash = true } }
            "#,
        )
        .unwrap();

        let files = options.error_files.unwrap();
        assert_eq!(files.exact(StatusCode::NOT_FOUND), Some(Path::new("404.html")));

        let definition = options.static_route.unwrap();
        assert_eq!(definition.as_value()["path"], "/{path*}");
        assert_eq!(definition.as_value()["handler"]["directory"]["redirectToSlash"], true);
    }

    #[test]
    fn test_static_route_handlers() {
        let directory: StaticRoute = serde_json::from_value(json!({
            "path": "/",
            "handler": { "directory": { "path": "public" } }
        }))
        .unwrap();
        assert_eq!(
            directory.handler,
            StaticHandler::Directory(DirectoryHandler { path: "public".into(), index: true })
        );
        assert_eq!(directory.method, MethodSpec::default());

        let bare: StaticRoute =
            serde_json::from_value(json!({ "path": "/robots.txt", "handler": { "file": "robots.txt" } })).unwrap();
        let nested: StaticRoute = serde_json::from_value(json!({
            "path": "/robots.txt",
            "handler": { "file": { "path": "robots.txt" } }
        }))
        .unwrap();
        for route in [bare, nested] {
            match route.handler {
                StaticHandler::File(file) => assert_eq!(file.path(), Path::new("robots.txt")),
                other => panic!("expected a file handler, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_route_definition_from_typed_route() {
        let route = StaticRoute {
            path: "/assets".into(),
            method: MethodSpec::One("GET".into()),
            handler: StaticHandler::Directory(DirectoryHandler { path: "docs".into(), index: false }),
        };
        let definition = RouteDefinition::from_route(&route).unwrap();

        assert_eq!(definition.as_value()["path"], "/assets");
        assert_eq!(definition.as_value()["handler"]["directory"]["index"], false);
        assert_eq!(serde_json::from_value::<StaticRoute>(definition.as_value().clone()).unwrap(), route);
    }

    #[test]
    fn test_method_spec_filter() {
        assert!(MethodSpec::default().filter().unwrap().is_none());
        assert!(MethodSpec::One("get".into()).filter().unwrap().is_some());
        assert!(MethodSpec::Many(vec!["GET".into(), "head".into()]).filter().unwrap().is_some());
        assert!(MethodSpec::Many(vec!["GET".into(), "*".into()]).filter().unwrap().is_none());

        assert_eq!(
            MethodSpec::One("NOT A METHOD".into()).filter().unwrap_err(),
            "NOT A METHOD"
        );
        assert!(MethodSpec::Many(vec![]).filter().is_err());
    }
}
