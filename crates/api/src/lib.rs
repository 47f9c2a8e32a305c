//! Raxel API server library.
//!
//! Exposes the startup pipeline (bootstrap, server, routing), the middleware
//! stack, services and HTTP modules so integration tests and the binary
//! entrypoint share the same building blocks.

pub mod bootstrap;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod response;
pub mod routes;
pub mod routing;
pub mod server;
pub mod services;
pub mod state;
pub mod validation;
