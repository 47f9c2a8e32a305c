//! Configuration domains, the configuration registry, and key generation
//! helpers for the Raxel backend.
//!
//! Nothing in this crate touches HTTP or the database; the `api` and `db`
//! crates build on it.

pub mod config;
pub mod keys;
