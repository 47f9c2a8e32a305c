//! Round trips against a live PostgreSQL server.
//!
//! Ignored by default. Export the `MAIN_DB_*` variables for a disposable
//! database and run `cargo test -p raxel-db -- --ignored`.

use raxel_core::config::{ConfigurationRegistry, ProcessEnv};
use raxel_db::{DatabaseConnection, PostgresConnection, Transaction};

async fn connected() -> PostgresConnection {
    let mut registry = ConfigurationRegistry::new();
    registry.load_all(&ProcessEnv);
    let config = registry.databases().get().expect("database config loaded");

    let conn = PostgresConnection::main(config);
    conn.connect().await.expect("database reachable");
    conn
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn connect_twice_is_rejected() {
    let conn = connected().await;

    let err = conn.connect().await.unwrap_err();
    assert_eq!(err.msg, "DB connection is already opened.");

    conn.disconnect().await.expect("disconnect");
    assert!(!conn.is_connected().await);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn cancelled_transaction_discards_writes() {
    let conn = connected().await;
    let pool = conn.pool().await.expect("pool open");

    sqlx::query("CREATE TABLE IF NOT EXISTS raxel_tx_probe (id INT PRIMARY KEY)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM raxel_tx_probe").execute(&pool).await.unwrap();

    let mut tx = Transaction::begin(&pool, "ProbeService", "insert").await.unwrap();
    sqlx::query("INSERT INTO raxel_tx_probe (id) VALUES (1)")
        .execute(tx.connection())
        .await
        .unwrap();
    tx.cancel().await.unwrap();

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM raxel_tx_probe")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    let mut tx = Transaction::begin(&pool, "ProbeService", "insert").await.unwrap();
    sqlx::query("INSERT INTO raxel_tx_probe (id) VALUES (2)")
        .execute(tx.connection())
        .await
        .unwrap();
    tx.complete().await.unwrap();

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM raxel_tx_probe")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    sqlx::query("DROP TABLE raxel_tx_probe").execute(&pool).await.unwrap();
    conn.disconnect().await.unwrap();
}
