//! `PostgreSQL` adapter for task and comment persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTaskRepository;
