use serde::Serialize;

use crate::response::ApiResponse;
use crate::routing::RouteGroup;

#[derive(Debug, Serialize)]
pub struct Greeting {
    info: &'static str,
}

/// `GET /` -- liveness greeting.
pub async fn hello() -> ApiResponse<Greeting> {
    ApiResponse::ok(
        "Hello, World!",
        Greeting {
            info: "Raxel Arias, v0.1",
        },
    )
}

pub fn routes() -> RouteGroup {
    RouteGroup::new("").get("/", hello)
}
