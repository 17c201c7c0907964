//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     RouteDefinition (opaque)
//!     → static_route.rs (interpret path + handler, ServeDir / ServeFile)
//!     → site.rs (conflict check, then fallback / nest / route)
//!
//! Finish:
//!     Site::into_router → error page layer over every route
//!
//! Per request:
//!     MatchedPath (set by the router)
//!     → metadata.rs (route → plugin settings lookup)
//!     → interception enabled / disabled
//! ```
//!
//! # Design Decisions
//! - Route settings are an explicit table, immutable once the router is built
//! - Unrouted requests have no settings and are always intercepted

pub mod metadata;
pub mod site;
pub mod static_route;

pub use metadata::RouteSettings;
pub use site::Site;
pub use static_route::RouteError;
