#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use raxel_api::middleware::MiddlewarePipeline;
use raxel_api::routing::{RouteTable, RoutingManager};
use raxel_api::server::ApplicationHandle;
use raxel_api::state::AppState;
use raxel_core::config::{JwtSettings, WebServiceConfig};
use raxel_db::{ConnectionError, DatabaseConnection};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

// ---------------------------------------------------------------------------
// Fake database
// ---------------------------------------------------------------------------

/// In-memory stand-in for the primary datastore.
#[derive(Default)]
pub struct FakeDatabase {
    fail_connect: bool,
    connected: AtomicBool,
    pub connect_calls: AtomicUsize,
    pub disconnect_calls: AtomicUsize,
}

impl FakeDatabase {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self {
            fail_connect: true,
            ..Self::default()
        })
    }

    pub fn connects(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseConnection for FakeDatabase {
    fn name(&self) -> &str {
        "fake"
    }

    async fn connect(&self) -> Result<(), ConnectionError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(
                ConnectionError::new("DB [Fake] \"fake\"", "There's an error during database connection.")
                    .with_details("connection refused"),
            );
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ConnectionError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Err(ConnectionError::new("DB [Fake] \"fake\"", "DB connection is already closed."));
        }
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// A web-service configuration with a known JWT secret.
pub fn test_config() -> WebServiceConfig {
    WebServiceConfig {
        host: "127.0.0.1".to_string(),
        jwt: JwtSettings {
            secret: Some(TEST_JWT_SECRET.to_string()),
            expiration: Some("1h".to_string()),
        },
        ..WebServiceConfig::default()
    }
}

/// Environment for a full bootstrap against `port`.
pub fn test_env(port: u16) -> HashMap<String, String> {
    [
        ("HOST", "127.0.0.1".to_string()),
        ("PORT", port.to_string()),
        ("WEB_SERVICE_NAME", "Raxel Test".to_string()),
        ("ENVIRONMENT", "TEST".to_string()),
        ("MAIN_DB_HOST", "localhost".to_string()),
        ("MAIN_DB_USER", "postgres".to_string()),
        ("MAIN_DB_NAME", "raxel_test".to_string()),
        ("JWT_SECRET", TEST_JWT_SECRET.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Assemble `table` exactly as `Server::start` does, minus the database
/// and the listener.
pub fn build_test_app(table: RouteTable) -> Router {
    build_test_app_with(test_config(), table)
}

pub fn build_test_app_with(config: WebServiceConfig, table: RouteTable) -> Router {
    let mut app = ApplicationHandle::new(test_state(config.clone()));
    app.attach_middleware(MiddlewarePipeline::new(&config));
    RoutingManager::new(&mut app).mount(table);
    app.into_router()
}

/// Handler state backed by a connected-looking fake database.
pub fn test_state(config: WebServiceConfig) -> AppState {
    AppState {
        config: Arc::new(config),
        database: FakeDatabase::healthy(),
    }
}

/// A port nothing is listening on right now.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> axum::response::Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> axum::response::Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> axum::response::Response {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Status and parsed JSON body of `response`.
pub async fn body_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}
