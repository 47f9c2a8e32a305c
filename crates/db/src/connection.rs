use async_trait::async_trait;

use crate::ConnectionError;

/// A datastore the application must reach before it serves traffic.
///
/// Implementations use interior mutability so one instance can be shared
/// behind an `Arc` between the server and request handlers.
#[async_trait]
pub trait DatabaseConnection: Send + Sync {
    /// Display name used in log records.
    fn name(&self) -> &str;

    /// Open the connection. Fails if it is already open.
    async fn connect(&self) -> Result<(), ConnectionError>;

    /// Close the connection. Fails if it is already closed.
    async fn disconnect(&self) -> Result<(), ConnectionError>;

    async fn is_connected(&self) -> bool;
}
