//! Per-test databases cloned from a migrated template.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};

use std::sync::Arc;

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use rstest::fixture;
use tasktrack::{
    app::{PostgresBackend, Services},
    identity::domain::ConversationHandle,
    notify::{MessageTransport, TransportError},
    persistence::{BASE_SCHEMA_SQL, PgPool},
};
use uuid::Uuid;

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "tasktrack_test_template";

/// Transport that accepts and discards every message.
pub struct SilentTransport;

#[async_trait]
impl MessageTransport for SilentTransport {
    async fn send_text(
        &self,
        _conversation: &ConversationHandle,
        _text: &str,
    ) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Services wired to a test database.
pub type PgServices = Services<PostgresBackend<SilentTransport>>;

fn apply_schema(url: &str) -> Result<(), BoxError> {
    let mut connection = PgConnection::establish(url)?;
    connection.batch_execute(BASE_SCHEMA_SQL)?;
    Ok(())
}

/// A database cloned from [`TEMPLATE_DB`], dropped on exit.
pub struct TestDatabase {
    cluster: PostgresCluster,
    name: String,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Ensures the template exists, clones it, and opens a pool.
    pub async fn create(cluster: PostgresCluster) -> Result<Self, BoxError> {
        let name = format!("tt_{}", Uuid::new_v4().simple());
        let database = name.clone();
        let pool = tokio::task::spawn_blocking(move || -> Result<PgPool, BoxError> {
            cluster.ensure_template(TEMPLATE_DB, apply_schema)?;
            cluster.create_database_from_template(&database, TEMPLATE_DB)?;
            let manager = ConnectionManager::<PgConnection>::new(cluster.database_url(&database));
            Ok(Pool::builder().max_size(4).build(manager)?)
        })
        .await??;
        Ok(Self {
            cluster,
            name,
            pool,
        })
    }

    /// Wires the application services onto this database.
    pub fn services(&self) -> Arc<PgServices> {
        Arc::new(Services::postgres(&self.pool, Arc::new(SilentTransport)))
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// A fresh database on the shared cluster.
#[fixture]
pub async fn test_database(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> Result<TestDatabase, BoxError> {
    TestDatabase::create(postgres_cluster?).await
}
