use crate::config::Config;
use crate::error::DbError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool for `database_url`, creating the database file if missing.
/// A `max_connections` of 0 is treated as 1.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, DbError> {
    let max_connections = max_connections.max(1);
    info!(database_url = %database_url, max_connections, "connecting to database");
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

pub async fn connect_with(cfg: &Config) -> Result<SqlitePool, DbError> {
    connect(&cfg.database_url, cfg.max_connections).await
}
