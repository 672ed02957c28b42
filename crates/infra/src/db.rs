//! Postgres connection pool and schema setup.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error::{StoreError, map_sqlx_error};

/// Open a connection pool against `database_url`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;

    info!(max_connections, "connected to postgres");
    Ok(pool)
}

const SCHEMA: &[(&str, &str)] = &[
    (
        "species",
        r#"
        CREATE TABLE IF NOT EXISTS species (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL CHECK (name <> ''),
            type TEXT NOT NULL CHECK (type IN ('PLANT', 'ANIMAL')),
            scientific_name TEXT NOT NULL CHECK (scientific_name <> ''),
            quantity BIGINT NOT NULL DEFAULT 0 CHECK (quantity >= 0),
            status TEXT NOT NULL DEFAULT 'AVAILABLE'
                CHECK (status IN ('AVAILABLE', 'RESERVED', 'OUT_OF_STOCK')),
            minimum_threshold BIGINT NOT NULL DEFAULT 5 CHECK (minimum_threshold >= 0),
            habitat_requirements JSONB NOT NULL DEFAULT '{}'::jsonb,
            certifications JSONB NOT NULL DEFAULT '[]'::jsonb,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'STAFF' CHECK (role IN ('ADMIN', 'STAFF')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
];

/// Create the `species` and `users` tables if they are missing.
///
/// Idempotent; existing tables are left untouched.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for (table, ddl) in SCHEMA {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error(&format!("create table {table}"), e))?;
    }
    info!(tables = SCHEMA.len(), "database schema ready");
    Ok(())
}
