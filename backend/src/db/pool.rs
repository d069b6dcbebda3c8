use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open the local store. `:memory:` gives a private in-memory database,
/// which only survives while its single connection stays open.
pub async fn create_pool(database_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let (options, max_connections) = if database_path == ":memory:" {
        (SqliteConnectOptions::from_str("sqlite::memory:")?, 1)
    } else {
        (
            SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            5,
        )
    };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Create the local tables if they are missing.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
