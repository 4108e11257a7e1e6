//! Error type for chat command handling.

use crate::identity::services::IdentityServiceError;
use crate::task::services::TaskCommandError;
use thiserror::Error;

/// Failures that turn into the generic chat failure reply.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Identity reconciliation or lookup failed.
    #[error(transparent)]
    Identity(#[from] IdentityServiceError),
    /// A task command failed unexpectedly.
    #[error(transparent)]
    Task(#[from] TaskCommandError),
}
