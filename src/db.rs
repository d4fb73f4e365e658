use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::config::Config;

pub type Db = Pool<Sqlite>;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT UNIQUE,
        hashed_password TEXT NOT NULL
    );"#,
    r#"CREATE TABLE IF NOT EXISTS todo_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT 0,
        owner_id INTEGER NOT NULL REFERENCES users(id)
    );"#,
    "CREATE INDEX IF NOT EXISTS idx_todo_items_owner_id ON todo_items (owner_id);",
];

/// Creates the database if needed, opens a pool and bootstraps the tables.
pub async fn connect(config: &Config) -> Result<Db, sqlx::Error> {
    let url = config.database_url.as_str();

    if !Sqlite::database_exists(url).await.unwrap_or(false) {
        tracing::info!(url, "creating database");
        Sqlite::create_database(url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await?;
    tracing::info!("connection to the database is successful");

    init_schema(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
pub async fn connect_in_memory() -> Result<Db, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &Db) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }
    tracing::debug!("schema is up to date");
    Ok(())
}
