mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, build_test_app, send, test_config};
use raxel_api::middleware::auth::AuthUser;
use raxel_api::response::ApiResponse;
use raxel_api::routing::{RouteGroup, RouteTable};
use raxel_api::services::jwt::JwtService;
use serde_json::{json, Value};

async fn profile(user: AuthUser) -> ApiResponse<Value> {
    ApiResponse::ok("Profile", user.claims)
}

fn guarded_table() -> RouteTable {
    RouteTable::builder()
        .mount("/api", RouteGroup::new("/account").get("/profile", profile))
        .build()
}

async fn call(authorization: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::get("/api/account/profile");
    if let Some(value) = authorization {
        request = request.header("authorization", value);
    }
    let response = send(build_test_app(guarded_table()), request.body(Body::empty()).unwrap()).await;
    body_json(response).await
}

#[tokio::test]
async fn missing_header_is_404() {
    let (status, json) = call(None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["msg"], "Token not found or invalid");
}

#[tokio::test]
async fn non_bearer_scheme_is_404() {
    let (status, json) = call(Some("Basic dXNlcjpwYXNz")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["msg"], "Token not found or invalid");
}

#[tokio::test]
async fn empty_bearer_is_404() {
    let (status, json) = call(Some("Bearer ")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["msg"], "There isn't a token to validate");
}

#[tokio::test]
async fn bad_token_is_403() {
    let (status, json) = call(Some("Bearer not.a.token")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["status"], 403);
    assert_eq!(json["msg"], "Access denied");
}

#[tokio::test]
async fn valid_token_reaches_the_handler() {
    let jwt = JwtService::new(&test_config().jwt).unwrap();
    let token = jwt.generate(&json!({ "sub": "user-1" })).unwrap();

    let (status, json) = call(Some(&format!("Bearer {token}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["sub"], "user-1");
    assert!(json["data"]["exp"].is_number());
}
