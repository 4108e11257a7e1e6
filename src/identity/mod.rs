//! Internal accounts and their link to external chat identities.
//!
//! A [`domain::User`] is the internal owner of tasks and comments. A
//! [`domain::UserProfile`] ties that user to a numeric chat-platform id and
//! remembers the conversation where notifications should be delivered. The
//! module follows the same layering as [`crate::task`]:
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
