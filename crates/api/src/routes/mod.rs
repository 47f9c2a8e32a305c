//! The application's static route table.

use crate::modules;
use crate::routing::RouteTable;

pub mod greeting;

/// Every route group the service exposes, in precedence order.
pub fn api_route_table() -> RouteTable {
    RouteTable::builder()
        .mount("/api", greeting::routes())
        .mount("/api", modules::example::routes())
        .build()
}
