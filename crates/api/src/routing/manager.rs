use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::{OriginalUri, Request};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW,
};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use axum::Router;
use serde_json::json;
use tower::{Service, ServiceExt};
use tower_http::set_header::SetResponseHeaderLayer;

use super::pattern::RoutePattern;
use super::{join_path, RouteTable};
use crate::response::ErrorResponse;
use crate::server::ApplicationHandle;
use crate::state::AppState;

const SOURCE: &str = "RoutingManager";

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, PUT, POST, DELETE";
const ALLOW_HEADERS: &str =
    "X-API-KEY, Origin, X-Requested-With, Content-Type, Accept, Access-Control-Request-Method";
const ALLOW_VALUE: &str = "GET, POST, OPTIONS, PUT, DELETE";

/// What [`RoutingManager::mount`] registered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MountReport {
    /// `(method, path)` pairs now reachable, in mount order.
    pub mounted: Vec<(Method, String)>,
    /// Pairs skipped because an earlier route with the same method already
    /// answers every request they would.
    pub shadowed: Vec<(Method, String)>,
}

/// Mounts a finalized [`RouteTable`] onto an application.
///
/// The manager only borrows the application; it never owns or replaces it.
pub struct RoutingManager<'a> {
    app: &'a mut ApplicationHandle,
}

impl<'a> RoutingManager<'a> {
    pub fn new(app: &'a mut ApplicationHandle) -> Self {
        Self { app }
    }

    /// Install the permissive CORS headers, every group in table order, and
    /// the catch-all 404.
    ///
    /// Requests are dispatched to the first mounted route whose method and
    /// path pattern match, so an earlier `/items/{id}` answers
    /// `/items/special` even when a later group declares that literal.
    /// Routes an earlier one fully covers are skipped with a warning.
    pub fn mount(self, table: RouteTable) -> MountReport {
        let mut report = MountReport::default();
        let mut accepted: Vec<(Method, RoutePattern, usize)> = Vec::new();
        let mut slots: Vec<(String, MethodRouter<AppState>)> = Vec::new();

        for (prefix, group) in table.into_groups() {
            let (base, entries) = group.into_parts();

            for entry in entries {
                for path in join_path(&prefix, &base, &entry.path) {
                    let pattern = RoutePattern::parse(&path);
                    let key = (entry.method.clone(), path.clone());

                    let shadowed_by = accepted
                        .iter()
                        .find(|(method, earlier, _)| *method == entry.method && earlier.covers(&pattern));
                    if let Some((_, earlier, _)) = shadowed_by {
                        tracing::warn!(
                            source = SOURCE,
                            method = %entry.method,
                            path = %path,
                            earlier = %earlier,
                            "Route already answered by an earlier group, skipping."
                        );
                        report.shadowed.push(key);
                        continue;
                    }

                    let slot = match slots.iter().position(|(p, _)| *p == path) {
                        Some(slot) => {
                            let existing = &mut slots[slot].1;
                            *existing = existing.clone().merge(entry.handler.clone());
                            slot
                        }
                        None => {
                            slots.push((path, entry.handler.clone()));
                            slots.len() - 1
                        }
                    };
                    accepted.push((entry.method.clone(), pattern, slot));
                    report.mounted.push(key);
                }
            }

            tracing::info!(source = SOURCE, "Routes for {prefix} declaration established.");
        }

        // One router per path keeps axum's own matcher from ever comparing
        // two user paths, so overlapping patterns cannot conflict at insert.
        let state = self.app.state().clone();
        let routers: Vec<Router> = slots
            .into_iter()
            .map(|(path, method_router)| {
                Router::new()
                    .route(&path, method_router.fallback(not_found))
                    .fallback(not_found)
                    .with_state(state.clone())
            })
            .collect();

        let dispatch = OrderedDispatch {
            routes: accepted
                .into_iter()
                .map(|(method, pattern, slot)| DispatchRoute {
                    method,
                    pattern,
                    router: routers[slot].clone(),
                })
                .collect(),
        };

        let router = self
            .app
            .take_router()
            .fallback_service(dispatch)
            .layer(header(ALLOW, ALLOW_VALUE))
            .layer(header(ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
            .layer(header(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
            .layer(header(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN));

        self.app.replace_router(router);

        tracing::debug!(
            source = SOURCE,
            mounted = report.mounted.len(),
            shadowed = report.shadowed.len(),
            "Route table mounted"
        );
        report
    }
}

fn header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

// ---------------------------------------------------------------------------
// Ordered dispatch
// ---------------------------------------------------------------------------

struct DispatchRoute {
    method: Method,
    pattern: RoutePattern,
    router: Router,
}

impl DispatchRoute {
    fn accepts(&self, method: &Method, path: &str) -> bool {
        let method_ok = self.method == *method || (*method == Method::HEAD && self.method == Method::GET);
        method_ok && self.pattern.matches(path)
    }
}

/// Tries routes in mount order and hands the request to the first match.
#[derive(Clone)]
struct OrderedDispatch {
    routes: Arc<[DispatchRoute]>,
}

impl Service<Request> for OrderedDispatch {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let target = self
            .routes
            .iter()
            .find(|route| route.accepts(request.method(), request.uri().path()))
            .map(|route| route.router.clone());

        match target {
            Some(router) => Box::pin(router.oneshot(request)),
            None => {
                let uri = request
                    .extensions()
                    .get::<OriginalUri>()
                    .map_or_else(|| request.uri().clone(), |original| original.0.clone());
                let response = not_found_response(request.method(), &uri).into_response();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Not found
// ---------------------------------------------------------------------------

/// Catch-all for any path or method nothing else answered.
async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> ErrorResponse {
    not_found_response(&method, &uri)
}

fn not_found_response(method: &Method, uri: &Uri) -> ErrorResponse {
    let requested = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());

    ErrorResponse::new(
        StatusCode::NOT_FOUND,
        "Resource not found",
        json!({
            "resourceRequested": requested,
            "method": method.as_str(),
        }),
    )
}
