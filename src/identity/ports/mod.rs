//! Port contracts for identity persistence.

mod repository;

pub use repository::{
    IdentityRepositoryError, IdentityRepositoryResult, ProfileRepository, UserRepository,
};
