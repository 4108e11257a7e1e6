//! Service wiring shared by the HTTP and chat surfaces.
//!
//! A [`Backend`] names the concrete adapter types once; [`Services`] then
//! builds every application service over them so both front doors run the
//! exact same command layer.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::identity::{
    adapters::{memory::InMemoryIdentityRepository, postgres::PostgresIdentityRepository},
    ports::{ProfileRepository, UserRepository},
    services::{AccountService, IdentityService},
};
use crate::notify::{CommentNotifier, MessageTransport, NotificationDispatcher};
use crate::persistence::PgPool;
use crate::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    ports::{CommentRepository, TaskRepository},
    services::{CommentService, TaskService},
};
use mockable::{Clock, DefaultClock};
use tracing::{error, info};

/// Bundle of adapter types the application services run on.
pub trait Backend: Send + Sync + 'static {
    /// User and profile store.
    type Identity: UserRepository + ProfileRepository + 'static;
    /// Task and comment store.
    type Tasks: TaskRepository + CommentRepository + 'static;
    /// Comment notification hook.
    type Notifier: CommentNotifier + 'static;
    /// Time source for comment timestamps.
    type Clock: Clock + Send + Sync + 'static;
}

/// `PostgreSQL` stores with notifications sent through `M`.
pub struct PostgresBackend<M>(PhantomData<fn() -> M>);

impl<M> Backend for PostgresBackend<M>
where
    M: MessageTransport + 'static,
{
    type Identity = PostgresIdentityRepository;
    type Tasks = PostgresTaskRepository;
    type Notifier = NotificationDispatcher<PostgresIdentityRepository, M>;
    type Clock = DefaultClock;
}

/// In-memory stores with notifications sent through `M`.
pub struct InMemoryBackend<M>(PhantomData<fn() -> M>);

impl<M> Backend for InMemoryBackend<M>
where
    M: MessageTransport + 'static,
{
    type Identity = InMemoryIdentityRepository;
    type Tasks = InMemoryTaskRepository;
    type Notifier = NotificationDispatcher<InMemoryIdentityRepository, M>;
    type Clock = DefaultClock;
}

/// Application services over one [`Backend`].
pub struct Services<B: Backend> {
    /// Chat participant reconciliation.
    pub identity: IdentityService<B::Identity>,
    /// Password accounts for the HTTP surface.
    pub accounts: AccountService<B::Identity>,
    /// Task command layer.
    pub tasks: TaskService<B::Tasks>,
    /// Comment command layer.
    pub comments: CommentService<B::Tasks, B::Notifier, B::Clock>,
}

impl<B: Backend> Services<B> {
    /// Builds every service from shared adapter instances.
    #[must_use]
    pub fn new(
        identity: Arc<B::Identity>,
        tasks: Arc<B::Tasks>,
        notifier: Arc<B::Notifier>,
        clock: Arc<B::Clock>,
    ) -> Self {
        Self {
            identity: IdentityService::new(Arc::clone(&identity)),
            accounts: AccountService::new(identity),
            tasks: TaskService::new(Arc::clone(&tasks)),
            comments: CommentService::new(tasks, notifier, clock),
        }
    }
}

impl<M> Services<PostgresBackend<M>>
where
    M: MessageTransport + 'static,
{
    /// Wires `PostgreSQL` repositories on `pool` with notifications sent
    /// through `transport`.
    #[must_use]
    pub fn postgres(pool: &PgPool, transport: Arc<M>) -> Self {
        let identity = Arc::new(PostgresIdentityRepository::new(pool.clone()));
        let tasks = Arc::new(PostgresTaskRepository::new(pool.clone()));
        let notifier = Arc::new(NotificationDispatcher::new(Arc::clone(&identity), transport));
        Self::new(identity, tasks, notifier, Arc::new(DefaultClock))
    }
}

impl<M> Services<InMemoryBackend<M>>
where
    M: MessageTransport + 'static,
{
    /// Wires fresh in-memory repositories with notifications sent through
    /// `transport`.
    #[must_use]
    pub fn in_memory(transport: Arc<M>) -> Self {
        let identity = Arc::new(InMemoryIdentityRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let notifier = Arc::new(NotificationDispatcher::new(Arc::clone(&identity), transport));
        Self::new(identity, tasks, notifier, Arc::new(DefaultClock))
    }
}

/// Resolves on Ctrl-C.
///
/// When the signal handler cannot be installed the future never resolves
/// and the process has to be stopped externally.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
