//! Error types for identity value validation.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The user handle is empty after trimming.
    #[error("user handle must not be empty")]
    EmptyHandle,

    /// The user handle exceeds the persisted column width.
    #[error("user handle is {length} characters, maximum is {max}")]
    HandleTooLong {
        /// Observed character count.
        length: usize,
        /// Maximum accepted character count.
        max: usize,
    },

    /// The conversation handle is empty after trimming.
    #[error("conversation handle must not be empty")]
    EmptyConversationHandle,

    /// The conversation handle exceeds the persisted column width.
    #[error("conversation handle is {length} characters, maximum is {max}")]
    ConversationHandleTooLong {
        /// Observed character count.
        length: usize,
        /// Maximum accepted character count.
        max: usize,
    },
}
