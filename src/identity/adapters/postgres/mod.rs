//! `PostgreSQL` adapter for identity persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresIdentityRepository;
