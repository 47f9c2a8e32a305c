use sqlx::{PgConnection, Postgres};

use crate::DbPool;

/// A database transaction tagged with the service and operation that owns it.
///
/// Every step is logged under the `"service (operation)"` label. Dropping a
/// `Transaction` without calling [`complete`](Self::complete) or
/// [`cancel`](Self::cancel) rolls it back.
pub struct Transaction {
    inner: sqlx::Transaction<'static, Postgres>,
    label: String,
}

impl Transaction {
    /// Acquire a connection from `pool` and start a transaction on it.
    pub async fn begin(pool: &DbPool, service: &str, operation: &str) -> Result<Self, sqlx::Error> {
        let label = format!("{service} ({operation})");
        tracing::info!(source = %label, "Establishing connection with the transaction service");

        let inner = pool.begin().await?;
        tracing::debug!(source = %label, "Connection established. Transaction started");

        Ok(Self { inner, label })
    }

    /// The connection to run queries against.
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.inner
    }

    /// Commit the transaction and release the connection.
    pub async fn complete(self) -> Result<(), sqlx::Error> {
        self.inner.commit().await?;
        tracing::info!(source = %self.label, "Transaction completed. Data is saved/updated.");
        Ok(())
    }

    /// Roll the transaction back and release the connection.
    pub async fn cancel(self) -> Result<(), sqlx::Error> {
        self.inner.rollback().await?;
        tracing::warn!(
            source = %self.label,
            "Transaction cancelled. Data will not be saved/updated."
        );
        Ok(())
    }
}
