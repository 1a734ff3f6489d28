//! Driven port for the user endpoints of the library API.

use async_trait::async_trait;

use super::RemoteError;
use crate::domain::{Email, NewUser, ProfileMetadata, UserAccount, UserPatch};

/// Port for account administration and the signed-in user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a new account.
    async fn create_user(&self, user: &NewUser) -> Result<UserAccount, RemoteError>;

    /// Apply a partial update to the account identified by `email`.
    async fn update_user(&self, email: &Email, patch: &UserPatch) -> Result<(), RemoteError>;

    /// Identity and scope encoded in the current bearer token.
    async fn profile(&self) -> Result<ProfileMetadata, RemoteError>;
}
