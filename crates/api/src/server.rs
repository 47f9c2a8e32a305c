//! Application builder: database, middleware, routes, listen.
//!
//! [`Server::start`] runs the four stages strictly in order and stops at the
//! first failure. Nothing listens until the database is connected and every
//! route is mounted.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use raxel_core::config::WebServiceConfig;
use raxel_db::DatabaseConnection;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};

use crate::error::StartupError;
use crate::middleware::MiddlewarePipeline;
use crate::routing::{RouteTable, RoutingManager};
use crate::state::AppState;

const SOURCE: &str = "WebService";

// ---------------------------------------------------------------------------
// ApplicationHandle
// ---------------------------------------------------------------------------

/// The HTTP application while it is being assembled.
///
/// Owned by whoever builds the server; the routing manager borrows it to add
/// routes. The middleware pipeline is recorded when attached and wraps the
/// finished router in [`into_router`](Self::into_router), so it covers every
/// route and the 404 fallback no matter when they were added.
pub struct ApplicationHandle {
    state: AppState,
    router: Router<AppState>,
    middleware: Option<MiddlewarePipeline>,
}

impl ApplicationHandle {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            router: Router::new(),
            middleware: None,
        }
    }

    pub fn attach_middleware(&mut self, pipeline: MiddlewarePipeline) {
        self.middleware = Some(pipeline);
    }

    /// The finished, stateless router ready to serve.
    pub fn into_router(self) -> Router {
        let router = match &self.middleware {
            Some(pipeline) => pipeline.apply(self.router),
            None => self.router,
        };
        router.with_state(self.state)
    }

    pub(crate) fn state(&self) -> &AppState {
        &self.state
    }

    pub(crate) fn take_router(&mut self) -> Router<AppState> {
        std::mem::take(&mut self.router)
    }

    pub(crate) fn replace_router(&mut self, router: Router<AppState>) {
        self.router = router;
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Builds and starts the HTTP application.
pub struct Server {
    config: WebServiceConfig,
    database: Arc<dyn DatabaseConnection>,
    routes: RouteTable,
}

impl Server {
    pub fn new(
        config: WebServiceConfig,
        database: Arc<dyn DatabaseConnection>,
        routes: RouteTable,
    ) -> Self {
        Self {
            config,
            database,
            routes,
        }
    }

    /// Connect the database, attach middleware, mount routes, then listen.
    ///
    /// A database failure aborts before anything is bound. A bind failure
    /// closes the database connection again before returning.
    pub async fn start(self) -> Result<RunningServer, StartupError> {
        let started = Instant::now();
        let Server {
            config,
            database,
            routes,
        } = self;

        // --- 1. Database ---
        tracing::debug!(source = SOURCE, database = database.name(), "Connecting database...");
        if let Err(err) = database.connect().await {
            tracing::error!(
                source = SOURCE,
                origin = %err.origin,
                details = err.details.as_deref().unwrap_or(""),
                "{}",
                err.msg
            );
            return Err(err.into());
        }

        // --- 2. Middleware ---
        let state = AppState {
            config: Arc::new(config.clone()),
            database: Arc::clone(&database),
        };
        let mut app = ApplicationHandle::new(state);
        app.attach_middleware(MiddlewarePipeline::new(&config));
        tracing::debug!(source = SOURCE, "Middleware attached.");

        // --- 3. Routes ---
        RoutingManager::new(&mut app).mount(routes);

        // --- 4. Listen ---
        let addr = format!("{}:{}", config.host, config.port);
        let listener = match TcpListener::bind((config.host.as_str(), config.port)).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!(source = SOURCE, addr = %addr, error = %err, "Failed to bind");
                release(database.as_ref()).await;
                return Err(StartupError::Bind { addr, source: err });
            }
        };
        let local_addr = listener.local_addr().map_err(StartupError::Serve)?;

        let router = app.into_router();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                shutdown_rx.await.ok();
            })
            .await
        });

        tracing::info!(
            source = SOURCE,
            name = %config.name,
            host = %config.host,
            port = local_addr.port(),
            environment = %config.environment,
            started_at = %chrono::Utc::now().to_rfc3339(),
            device = %device_name(),
            "Server running in {local_addr}"
        );
        tracing::debug!(
            source = SOURCE,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Startup complete"
        );

        Ok(RunningServer {
            local_addr,
            shutdown_tx,
            task,
            database,
        })
    }
}

fn device_name() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

// ---------------------------------------------------------------------------
// RunningServer
// ---------------------------------------------------------------------------

/// A server that is accepting connections.
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<io::Result<()>>,
    database: Arc<dyn DatabaseConnection>,
}

impl RunningServer {
    /// The address actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections, drain in-flight requests, and close the
    /// database connection.
    pub async fn shutdown(self) -> Result<(), StartupError> {
        let RunningServer {
            shutdown_tx,
            task,
            database,
            ..
        } = self;

        shutdown_tx.send(()).ok();
        finish(database.as_ref(), task.await).await
    }

    /// Serve until SIGINT/SIGTERM, then shut down gracefully.
    pub async fn wait(self) -> Result<(), StartupError> {
        let RunningServer {
            shutdown_tx,
            mut task,
            database,
            ..
        } = self;

        let stopped = tokio::select! {
            () = shutdown_signal() => None,
            joined = &mut task => Some(joined),
        };

        let joined = match stopped {
            Some(joined) => joined,
            None => {
                shutdown_tx.send(()).ok();
                task.await
            }
        };
        finish(database.as_ref(), joined).await
    }
}

async fn finish(
    database: &dyn DatabaseConnection,
    joined: Result<io::Result<()>, JoinError>,
) -> Result<(), StartupError> {
    tracing::info!(source = SOURCE, "Server stopped accepting connections, cleaning up");
    release(database).await;

    match joined {
        Ok(Ok(())) => {
            tracing::info!(source = SOURCE, "Graceful shutdown complete");
            Ok(())
        }
        Ok(Err(err)) => Err(StartupError::Serve(err)),
        Err(err) => Err(StartupError::Serve(io::Error::other(err))),
    }
}

async fn release(database: &dyn DatabaseConnection) {
    if let Err(err) = database.disconnect().await {
        tracing::warn!(source = SOURCE, error = %err, "Database was not disconnected cleanly");
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(source = SOURCE, error = %err, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(source = SOURCE, error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!(source = SOURCE, "Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!(source = SOURCE, "Received SIGTERM, starting graceful shutdown");
        }
    }
}
