//! Shared `PostgreSQL` plumbing for the repository adapters.
//!
//! Diesel connections are synchronous, so every adapter funnels its queries
//! through [`run_blocking`], which checks a connection out of the r2d2 pool on
//! a blocking worker thread and keeps the async executor free.

use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tracing::info;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating the base schema. Every statement is idempotent.
pub const BASE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_base_tables/up.sql");

/// Failures raised by the shared persistence helpers.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// The blocking worker panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A schema statement failed.
    #[error("schema migration failed: {0}")]
    Migration(#[from] diesel::result::Error),
}

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`PersistenceError::Pool`] when the pool cannot open its initial
/// connections.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PersistenceError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().max_size(max_size).build(manager)?;
    Ok(pool)
}

/// Runs a Diesel closure on a pooled connection inside
/// [`tokio::task::spawn_blocking`].
///
/// Pool and join failures are converted into the caller's error type.
///
/// # Errors
///
/// Returns whatever the closure returns, or the converted
/// [`PersistenceError`] when no connection is available or the worker fails.
pub async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<PersistenceError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(PersistenceError::from)?;
        f(&mut connection)
    })
    .await
    .map_err(PersistenceError::from)?
}

/// Applies the embedded schema.
///
/// # Errors
///
/// Returns [`PersistenceError`] when a connection cannot be obtained or a
/// statement fails.
pub async fn migrate(pool: &PgPool) -> Result<(), PersistenceError> {
    run_blocking(pool, |connection| {
        connection.batch_execute(BASE_SCHEMA_SQL)?;
        Ok::<_, PersistenceError>(())
    })
    .await?;
    info!("database schema is up to date");
    Ok(())
}
