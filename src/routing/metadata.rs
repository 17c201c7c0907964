//! Per-route plugin settings.
//!
//! Settings are keyed by the route path as registered with the router (the
//! value of [`MatchedPath`](axum::extract::MatchedPath)), then by plugin name.
//! A route opts out of error interception with `errorh = false`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::plugin::PLUGIN_NAME;

/// Immutable table of route → plugin → setting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RouteSettings {
    routes: HashMap<String, HashMap<String, Value>>,
}

impl RouteSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a plugin setting to a route.
    #[must_use]
    pub fn plugin(mut self, route: impl Into<String>, plugin: impl Into<String>, value: impl Into<Value>) -> Self {
        self.routes
            .entry(route.into())
            .or_default()
            .insert(plugin.into(), value.into());
        self
    }

    /// Shorthand for `plugin(route, "errorh", false)`.
    #[must_use]
    pub fn disable_interception(self, route: impl Into<String>) -> Self {
        self.plugin(route, PLUGIN_NAME, false)
    }

    /// Look up a single plugin setting.
    pub fn plugin_setting(&self, route: &str, plugin: &str) -> Option<&Value> {
        self.routes.get(route)?.get(plugin)
    }

    /// Interception is on unless the route's setting is exactly `false`.
    ///
    /// Unrouted requests (`None`) are always intercepted.
    pub fn interception_enabled(&self, route: Option<&str>) -> bool {
        let setting = route.and_then(|route| self.plugin_setting(route, PLUGIN_NAME));
        !matches!(setting, Some(Value::Bool(false)))
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
