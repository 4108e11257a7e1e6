//! JSON HTTP surface.
//!
//! The router is generic over the [`Backend`] so tests can drive it against
//! in-memory stores with `tower::ServiceExt::oneshot`. All task routes act
//! on behalf of the bearer of an access token, and a task owned by anyone
//! else is answered with the same `404 {"detail": "Not found."}` as a
//! missing one.

pub mod dto;
mod error;
mod extract;
pub mod handlers;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, ApiQuery, AuthUser};

use crate::app::{Backend, Services};
use crate::auth::TokenIssuer;
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handler state.
pub struct ApiState<B: Backend> {
    /// Application services.
    pub services: Arc<Services<B>>,
    /// Token issuer and verifier.
    pub tokens: Arc<TokenIssuer>,
}

impl<B: Backend> ApiState<B> {
    /// Creates handler state.
    #[must_use]
    pub const fn new(services: Arc<Services<B>>, tokens: Arc<TokenIssuer>) -> Self {
        Self { services, tokens }
    }
}

impl<B: Backend> Clone for ApiState<B> {
    fn clone(&self) -> Self {
        Self {
            services: Arc::clone(&self.services),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Builds the application router.
#[must_use]
pub fn router<B: Backend>(state: ApiState<B>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/auth/login/", post(handlers::auth::login::<B>))
        .route("/api/auth/refresh/", post(handlers::auth::refresh::<B>))
        .route(
            "/api/tasks/",
            get(handlers::tasks::list::<B>).post(handlers::tasks::create::<B>),
        )
        .route(
            "/api/tasks/{id}/",
            get(handlers::tasks::retrieve::<B>)
                .put(handlers::tasks::replace::<B>)
                .patch(handlers::tasks::patch::<B>)
                .delete(handlers::tasks::destroy::<B>),
        )
        .route(
            "/api/tasks/{task_id}/comments/",
            get(handlers::comments::list::<B>).post(handlers::comments::create::<B>),
        )
        .route(
            "/api/tasks/{task_id}/comments/{id}/",
            delete(handlers::comments::destroy::<B>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP API listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests;
