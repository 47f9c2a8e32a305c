//! Feature modules. Each exposes `routes()` returning its [`RouteGroup`].
//!
//! [`RouteGroup`]: crate::routing::RouteGroup

pub mod example;
