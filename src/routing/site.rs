//! Host router that plugins register against.
//!
//! [`Site`] wraps an [`axum::Router`] and records what is mounted on it:
//! route paths, whether a fallback is set, and per-route plugin settings.
//! Routes can be added before or after the plugin is registered. The error
//! page layer is applied in [`Site::into_router`], so it covers all of them.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use axum::handler::Handler;
use axum::routing::MethodRouter;
use axum::{middleware, Router};
use serde_json::Value;

use crate::config::ErrorFileMap;
use crate::intercept::{intercept_errors, FileResponder, Interceptor};
use crate::routing::static_route::{Mount, PreparedRoute, RouteError};
use crate::routing::RouteSettings;

/// A router under construction, with the bookkeeping plugins need.
#[derive(Default)]
pub struct Site {
    router: Router,
    paths: BTreeSet<String>,
    fallback: Option<String>,
    settings: RouteSettings,
    pub(crate) registered: bool,
    interception: Option<(ErrorFileMap, Arc<dyn FileResponder>)>,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route, as [`Router::route`].
    #[must_use]
    pub fn route(mut self, path: &str, method_router: MethodRouter) -> Self {
        self.router = self.router.route(path, method_router);
        self.paths.insert(path.to_string());
        self
    }

    /// Set the fallback handler, as [`Router::fallback`].
    ///
    /// Replaces a static route mounted as the fallback.
    #[must_use]
    pub fn fallback<H, T>(mut self, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        if let Some(previous) = &self.fallback {
            tracing::warn!(route = %previous, "Fallback replaced");
        }
        self.router = self.router.fallback(handler);
        self.fallback = Some("<fallback>".to_string());
        self
    }

    /// Attach a plugin setting to a route, like hapi's `options.plugins`.
    #[must_use]
    pub fn plugin_setting(mut self, route: &str, plugin: &str, value: impl Into<Value>) -> Self {
        self.settings = self.settings.plugin(route, plugin, value);
        self
    }

    /// Opt `route` out of error page interception.
    #[must_use]
    pub fn disable_interception(mut self, route: &str) -> Self {
        self.settings = self.settings.disable_interception(route);
        self
    }

    pub fn route_settings(&self) -> &RouteSettings {
        &self.settings
    }

    /// Whether `path` was added with [`Site::route`] or mounted by a plugin.
    pub fn has_route(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Finish the site. Error page interception, if registered, wraps every
    /// route and the fallback.
    pub fn into_router(self) -> Router {
        let Some((files, responder)) = self.interception else {
            return self.router;
        };
        let interceptor = Arc::new(Interceptor::new(files, self.settings, responder));
        self.router
            .layer(middleware::from_fn_with_state(interceptor, intercept_errors))
    }

    /// Fail if mounting `mount` would replace or collide with something
    /// already on the site.
    pub(crate) fn check_mount(&self, mount: &Mount, path: &str) -> Result<(), RouteError> {
        let conflict = |existing: &str| RouteError::PathConflict {
            path: path.to_string(),
            existing: existing.to_string(),
        };

        match mount {
            Mount::Fallback => match &self.fallback {
                Some(_) => Err(RouteError::FallbackTaken(path.to_string())),
                None => Ok(()),
            },
            Mount::Nest(prefix) => {
                let nested = format!("{prefix}/");
                match self.paths.iter().find(|p| *p == prefix || p.starts_with(&nested)) {
                    Some(existing) => Err(conflict(existing.as_str())),
                    None => Ok(()),
                }
            }
            Mount::Route(route) => match self.paths.get(route) {
                Some(existing) => Err(conflict(existing.as_str())),
                None => Ok(()),
            },
        }
    }

    /// Mount a prepared static route. Call [`Site::check_mount`] first.
    pub(crate) fn mount(&mut self, prepared: PreparedRoute) {
        let router = std::mem::take(&mut self.router);
        self.router = match prepared.mount {
            Mount::Fallback => {
                self.fallback = Some(prepared.path);
                router.fallback_service(prepared.service)
            }
            Mount::Nest(prefix) => {
                let router = router.nest_service(&prefix, prepared.service);
                self.paths.insert(prefix);
                router
            }
            Mount::Route(route) => {
                let router = router.route(&route, prepared.service);
                self.paths.insert(route);
                router
            }
        };
    }

    pub(crate) fn enable_interception(&mut self, files: ErrorFileMap, responder: Arc<dyn FileResponder>) {
        self.interception = Some((files, responder));
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("paths", &self.paths)
            .field("fallback", &self.fallback)
            .field("registered", &self.registered)
            .field("intercepting", &self.interception.is_some())
            .finish_non_exhaustive()
    }
}

impl From<Site> for Router {
    fn from(site: Site) -> Self {
        site.into_router()
    }
}
