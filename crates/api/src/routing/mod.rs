//! Declarative route groups and the finalized route table.
//!
//! A [`RouteGroup`] lists `(method, path, handler)` entries relative to an
//! optional base path. Groups are mounted under a prefix with
//! [`RouteTableBuilder::mount`]; [`RouteTableBuilder::build`] seals the
//! table. A built [`RouteTable`] has no mutation API and is consumed by
//! value by [`RoutingManager::mount`], so nothing can be registered after
//! mounting has started.

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{self, MethodRouter};

use crate::state::AppState;

mod manager;
mod pattern;

pub use manager::{MountReport, RoutingManager};

/// One handler declared by a group.
pub(crate) struct RouteEntry {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) handler: MethodRouter<AppState>,
}

/// A sub-router: handlers keyed by method and path.
pub struct RouteGroup {
    base: String,
    entries: Vec<RouteEntry>,
}

impl RouteGroup {
    /// A group whose paths are relative to `base` (`""` for none).
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            entries: Vec::new(),
        }
    }

    pub fn get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.on(Method::GET, path, routing::get(handler))
    }

    pub fn post<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.on(Method::POST, path, routing::post(handler))
    }

    pub fn put<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.on(Method::PUT, path, routing::put(handler))
    }

    pub fn delete<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.on(Method::DELETE, path, routing::delete(handler))
    }

    fn on(mut self, method: Method, path: &str, handler: MethodRouter<AppState>) -> Self {
        self.entries.push(RouteEntry {
            method,
            path: path.to_string(),
            handler,
        });
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_parts(self) -> (String, Vec<RouteEntry>) {
        (self.base, self.entries)
    }
}

/// Ordered `(prefix, group)` pairs. Earlier groups take precedence.
pub struct RouteTable {
    groups: Vec<(String, RouteGroup)>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder { groups: Vec::new() }
    }

    /// Prefixes in mount order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(prefix, _)| prefix.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn into_groups(self) -> Vec<(String, RouteGroup)> {
        self.groups
    }
}

/// Collects groups in insertion order until [`build`](Self::build).
pub struct RouteTableBuilder {
    groups: Vec<(String, RouteGroup)>,
}

impl RouteTableBuilder {
    pub fn mount(mut self, prefix: impl Into<String>, group: RouteGroup) -> Self {
        self.groups.push((prefix.into(), group));
        self
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            groups: self.groups,
        }
    }
}

/// Absolute paths a route answers on.
///
/// Segments are joined with single slashes. A route at the root of its group
/// (`"/"` or `""`) answers both with and without a trailing slash.
pub fn join_path(prefix: &str, base: &str, path: &str) -> Vec<String> {
    let joined: Vec<&str> = [prefix, base, path]
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect();

    if joined.is_empty() {
        return vec!["/".to_string()];
    }

    let full = format!("/{}", joined.join("/"));
    if path.trim_matches('/').is_empty() {
        let with_slash = format!("{full}/");
        vec![full, with_slash]
    } else {
        vec![full]
    }
}
