//! Identity orchestration services.

mod accounts;
mod reconcile;

pub use accounts::{AccountError, AccountResult, AccountService};
pub use reconcile::{IdentityService, IdentityServiceError, IdentityServiceResult, Registration};
