//! Domain model for internal users and chat-platform profiles.

mod error;
mod ids;
mod profile;
mod user;

pub use error::IdentityDomainError;
pub use ids::{ConversationHandle, ExternalChatId, ProfileId, UserHandle, UserId};
pub use profile::{NewUserProfile, PersistedProfileData, UserProfile};
pub use user::{NewUser, PasswordDigest, PersistedUserData, User};
