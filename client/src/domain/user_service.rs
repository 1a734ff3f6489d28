//! Account administration: sign-up and partial profile updates.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::UserDirectory;
use crate::domain::{Email, Error, NewUser, UserAccount, UserPatch};

/// Service wrapping the user endpoints.
#[derive(Clone)]
pub struct UserAdminService<U> {
    users: Arc<U>,
}

impl<U> UserAdminService<U> {
    /// Create a service over `users`.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

impl<U> UserAdminService<U>
where
    U: UserDirectory,
{
    /// Register a validated account.
    pub async fn create(&self, user: &NewUser) -> Result<UserAccount, Error> {
        let account = self.users.create_user(user).await?;
        info!(email = %account.email, "user created");
        Ok(account)
    }

    /// Update the account identified by `email`. An empty patch is refused.
    pub async fn update(&self, email: &str, patch: &UserPatch) -> Result<(), Error> {
        let email = Email::new(email)?;
        if patch.is_empty() {
            return Err(Error::invalid_request("nothing to update"));
        }
        self.users.update_user(&email, patch).await?;
        info!(%email, "user updated");
        Ok(())
    }
}
