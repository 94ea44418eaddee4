//! Database Migrations
//!
//! Idempotent schema bootstrap for the users and orders tables.

use anyhow::{Context, Result};
use deadpool_postgres::Pool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            UUID PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS orders (
    id         UUID PRIMARY KEY,
    products   JSONB NOT NULL,
    "user"     JSONB NOT NULL,
    status     TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);
"#;

/// Run all pending migrations
pub async fn run_migrations(pool: &Pool) -> Result<()> {
    tracing::info!("Running database migrations...");

    let client = pool
        .get()
        .await
        .context("Failed to get connection for migrations")?;
    client
        .batch_execute(SCHEMA)
        .await
        .context("Failed to apply database schema")?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
