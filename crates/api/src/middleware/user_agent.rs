//! `User-Agent` parsing.
//!
//! Recognises the common browser families and operating systems well enough
//! for logging and simple branching. Anything unrecognised is `"unknown"`.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

const UNKNOWN: &str = "unknown";

/// Parsed `User-Agent` header, stored as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    pub raw: String,
    pub browser: String,
    pub version: String,
    pub os: String,
    pub is_mobile: bool,
    pub is_bot: bool,
}

impl Default for UserAgent {
    fn default() -> Self {
        Self::parse("")
    }
}

// Order matters: Edge and Opera also advertise Chrome, Chrome advertises Safari.
const BROWSERS: &[(&str, &str)] = &[
    ("Edg/", "Edge"),
    ("OPR/", "Opera"),
    ("Firefox/", "Firefox"),
    ("Chrome/", "Chrome"),
    ("Version/", "Safari"),
    ("curl/", "curl"),
    ("PostmanRuntime/", "Postman"),
];

const OPERATING_SYSTEMS: &[(&str, &str)] = &[
    ("Android", "Android"),
    ("iPhone", "iOS"),
    ("iPad", "iOS"),
    ("Windows", "Windows"),
    ("Mac OS X", "macOS"),
    ("CrOS", "ChromeOS"),
    ("Linux", "Linux"),
];

const BOT_MARKERS: &[&str] = &["bot", "crawler", "spider", "slurp"];

impl UserAgent {
    pub fn parse(raw: &str) -> Self {
        let (browser, version) = BROWSERS
            .iter()
            .find_map(|(marker, name)| {
                raw.find(marker).map(|at| {
                    let rest = &raw[at + marker.len()..];
                    let version: String = rest
                        .chars()
                        .take_while(|c| c.is_ascii_alphanumeric() || *c == '.')
                        .collect();
                    (name.to_string(), version)
                })
            })
            .unwrap_or_else(|| (UNKNOWN.to_string(), String::new()));

        let os = OPERATING_SYSTEMS
            .iter()
            .find(|(marker, _)| raw.contains(marker))
            .map_or(UNKNOWN, |(_, name)| *name)
            .to_string();

        let lower = raw.to_ascii_lowercase();

        Self {
            raw: raw.to_string(),
            browser,
            version,
            os,
            is_mobile: lower.contains("mobi") || lower.contains("iphone"),
            is_bot: BOT_MARKERS.iter().any(|m| lower.contains(m)),
        }
    }
}

pub async fn user_agent(mut request: Request, next: Next) -> Response {
    let parsed = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(UserAgent::parse)
        .unwrap_or_default();

    request.extensions_mut().insert(parsed);
    next.run(request).await
}

impl<S: Send + Sync> FromRequestParts<S> for UserAgent {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<UserAgent>()
            .cloned()
            .unwrap_or_default())
    }
}
