//! The request pipeline installed before routes are mounted.
//!
//! - [`security_headers`] -- helmet-style response headers.
//! - [`client_ip::ClientIp`] -- resolved client address.
//! - [`user_agent::UserAgent`] -- parsed `User-Agent`.
//! - [`auth::AuthUser`] -- bearer-token guard extractor.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use raxel_core::config::WebServiceConfig;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::AppState;

pub mod auth;
pub mod client_ip;
pub mod security_headers;
pub mod user_agent;

/// The fixed, ordered middleware stack.
///
/// Outermost first:
///
/// 1. CORS policy
/// 2. Security headers
/// 3. Request body size limit, enforced by body extractors
/// 4. Cookie parsing
/// 5. Client IP resolution
/// 6. User-agent parsing
/// 7. Structured request/response tracing
#[derive(Debug, Clone)]
pub struct MiddlewarePipeline {
    body_limit: usize,
}

impl MiddlewarePipeline {
    pub fn new(config: &WebServiceConfig) -> Self {
        Self {
            body_limit: config.body_limit_bytes,
        }
    }

    /// Wrap every route and fallback already on `router`.
    pub fn apply(&self, router: Router<AppState>) -> Router<AppState> {
        // Applied bottom-up: the last layer is the outermost.
        router
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(axum::middleware::from_fn(user_agent::user_agent))
            .layer(axum::middleware::from_fn(client_ip::client_ip))
            .layer(CookieManagerLayer::new())
            .layer(DefaultBodyLimit::max(self.body_limit))
            .layer(axum::middleware::from_fn(security_headers::security_headers))
            .layer(CorsLayer::permissive())
    }
}
