//! Connection pool construction.
//!
//! The pool is built once by [`crate::Application`] and handed to every request through
//! [`crate::AppState`]. Statements are logged through `log` at debug level, and statements
//! slower than the configured threshold at warn level.

use crate::config::{DatabaseConfig, PoolSettings};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{ConnectOptions, Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Open a connection pool for the configured database.
pub async fn create_pool(database: &DatabaseConfig, slow_statement_threshold: Duration) -> Result<SqlitePool, sqlx::Error> {
    let connect_options = SqliteConnectOptions::from_str(&database.url)?
        .log_statements(log::LevelFilter::Debug)
        .log_slow_statements(log::LevelFilter::Warn, slow_statement_threshold);

    info!(
        max_connections = database.pool.max_connections,
        min_connections = database.pool.min_connections,
        "Opening database pool"
    );

    pool_options(&database.pool).connect_with(connect_options).await
}

/// Begin a transaction that takes the database write lock up front.
///
/// A deferred transaction that reads before it writes fails with `SQLITE_BUSY` when another
/// connection holds a read lock. With `BEGIN IMMEDIATE` concurrent writers wait on the busy timeout.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

fn pool_options(settings: &PoolSettings) -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(non_zero_secs(settings.idle_timeout_secs))
        .max_lifetime(non_zero_secs(settings.max_lifetime_secs))
}

// 0 = never
fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
