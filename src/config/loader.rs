//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_options, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Config file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Pick the format from the file extension; anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Load and validate configuration from a TOML or JSON file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content, Format::from_path(path))?;

    tracing::debug!(path = %path.display(), "Configuration file loaded");
    Ok(config)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str, format: Format) -> Result<ServerConfig, ConfigError> {
    let config: ServerConfig = match format {
        Format::Toml => toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?,
        Format::Json => serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?,
    };

    // Fail at load time rather than at registration.
    validate_options(&config.errorh).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [listener]
        bind_address = "127.0.0.1:3000"

        [files]
        relative_to = "public"

        [errorh.errorFiles]
        404 = "404.html"
        default = "50x.html"

        [errorh.staticRoute]
        path = "/"
        handler = { directory = { path = "." } }
    "#;

    #[test]
    fn test_parse_toml() {
        let config = parse_config(SAMPLE, Format::Toml).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.files.relative_to, Path::new("public"));
        assert_eq!(config.errorh["errorFiles"]["404"], "404.html");
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_defaults_without_errorh() {
        let config = parse_config("", Format::Toml).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.errorh.is_null());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = parse_config(
            r#"
            [errorh]
            test = "value"
            "#,
            Format::Toml,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::UnknownKey("test".into())]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[listener", Format::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{ "errorh": {{ "errorFiles": {{ "500": "50x.html" }} }} }}"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.errorh["errorFiles"]["500"], "50x.html");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("errorh.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("errorh.toml")), Format::Toml);
        assert_eq!(Format::from_path(Path::new("errorh")), Format::Toml);
    }
}
