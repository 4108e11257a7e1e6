//! Tasks and their comments.
//!
//! Tasks belong to exactly one user. Every read or write issued on behalf of a
//! user is scoped to that user's tasks, and a task owned by someone else is
//! reported exactly like a task that does not exist. Comments are open to any
//! authenticated user. Creating one notifies the task owner through
//! [`crate::notify`]. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
