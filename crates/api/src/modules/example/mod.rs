//! Example module: controller, service and validator layering.
//!
//! - `GET  /example/get-message`
//! - `POST /example/send-message`

use crate::routing::RouteGroup;

pub mod controller;
pub mod service;
pub mod validator;

pub fn routes() -> RouteGroup {
    RouteGroup::new("/example")
        .get("/get-message", controller::get_message)
        .post("/send-message", controller::send_message)
}
