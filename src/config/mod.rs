//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize ServerConfig)
//!     → validation.rs (shape checks on the errorh options)
//!     → PluginOptions (validated, immutable)
//!     → captured by the interceptor and the static route at registration
//! ```
//!
//! # Design Decisions
//! - Options are immutable once registered; there is no runtime mutation
//! - All server fields have defaults to allow minimal configs
//! - Unknown plugin options are an error, not a warning

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ErrorFileMap, PluginOptions, RouteDefinition, ServerConfig, StaticRoute};
pub use validation::{validate_options, ValidationError};
