// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (PostgreSQL).
//!
//! `Db` owns an explicitly constructed connection pool that is injected into
//! the application state at startup and closed on shutdown. Each submodule adds
//! the typed operations for one table:
//! - Users (signup, session lookups, credits)
//! - Plans (owner CRUD, published listing)
//! - Expenses (plan-scoped CRUD and bulk delete)
//! - Feedback (append-only)

pub mod expenses;
pub mod feedback;
pub mod plans;
pub mod users;

use crate::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Postgres database handle.
#[derive(Clone)]
pub struct Db {
    pool: Option<PgPool>,
}

impl Db {
    /// Open a connection pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Postgres: {}", e)))?;

        tracing::info!(max_connections, "Connected to Postgres");

        Ok(Self { pool: Some(pool) })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a mock handle for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { pool: None }
    }

    /// Helper to get the pool or return an error if offline.
    fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(self.pool()?)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            tracing::info!("Postgres pool closed");
        }
    }
}

/// Map a store error to the opaque database error.
pub(crate) fn db_err(e: sqlx::Error) -> AppError {
    AppError::Database(e.to_string())
}
