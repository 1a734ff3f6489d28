//! Session transitions: login, profile loading, restore on start and logout.
//!
//! The service owns no session state. Callers lend it `&mut SessionState`
//! for the duration of one transition.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{Authenticator, LocalStorage, UserDirectory};
use crate::domain::{
    ACCESS_TOKEN_KEY, Error, LoginCredentials, ProfileMetadata, REFRESH_TOKEN_KEY, SessionState,
    UserScope,
};

/// Location a successful login lands on when no `from` was supplied.
pub const HOME_LOCATION: &str = "/";

/// Raw login form input.
#[derive(Debug, Clone, Copy)]
pub struct LoginForm<'a> {
    /// Email entered by the user.
    pub email: &'a str,
    /// Password entered by the user.
    pub password: &'a str,
    /// Location the user tried to reach before being sent to login.
    pub from: Option<&'a str>,
}

/// Service driving session state through the login lifecycle.
#[derive(Clone)]
pub struct SessionService<A, U> {
    authenticator: Arc<A>,
    users: Arc<U>,
    storage: Arc<dyn LocalStorage>,
}

impl<A, U> SessionService<A, U> {
    /// Create a service over the login endpoint, the profile endpoint and
    /// the token store.
    pub fn new(authenticator: Arc<A>, users: Arc<U>, storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            authenticator,
            users,
            storage,
        }
    }
}

impl<A, U> SessionService<A, U>
where
    A: Authenticator,
    U: UserDirectory,
{
    /// Exchange credentials for tokens and mark the session authenticated.
    ///
    /// Returns the location to navigate to: `form.from` when present,
    /// otherwise [`HOME_LOCATION`]. On any failure the session is left
    /// untouched and the error message is ready for inline display; a
    /// rejected login carries the server's `detail` verbatim.
    pub async fn login(
        &self,
        session: &mut SessionState,
        form: LoginForm<'_>,
    ) -> Result<String, Error> {
        let credentials = LoginCredentials::try_from_parts(form.email, form.password)?;
        let tokens = self
            .authenticator
            .authenticate(&credentials)
            .await
            .inspect_err(|err| info!(error = %err, "login rejected"))?;

        self.storage
            .set_item(ACCESS_TOKEN_KEY, tokens.access_token.expose())?;
        self.storage
            .set_item(REFRESH_TOKEN_KEY, tokens.refresh_token.expose())?;
        session.set_authenticated(true);
        info!(user = credentials.username(), "login succeeded");

        Ok(form
            .from
            .filter(|from| !from.trim().is_empty())
            .unwrap_or(HOME_LOCATION)
            .to_owned())
    }

    /// Fill scope and email from `users/metadata`.
    ///
    /// A failed fetch means the stored token is not usable, so the session
    /// falls back to signed out. The stored token itself is kept.
    pub async fn load_profile(&self, session: &mut SessionState) -> Result<ProfileMetadata, Error> {
        if !session.is_authenticated() {
            return Err(Error::unauthorized("not signed in"));
        }
        match self.users.profile().await {
            Ok(profile) => {
                session.set_scope(UserScope::new(profile.scope.as_deref().unwrap_or_default()));
                session.set_email(profile.email.clone());
                debug!(scope = ?profile.scope, "profile loaded");
                Ok(profile)
            }
            Err(err) => {
                warn!(error = %err, "profile fetch failed; signing out");
                session.set_authenticated(false);
                Err(err.into())
            }
        }
    }

    /// Resume a session from a persisted token.
    ///
    /// Authentication is set optimistically before any round trip. Returns
    /// `Ok(None)` when no token is stored.
    pub async fn restore(
        &self,
        session: &mut SessionState,
    ) -> Result<Option<ProfileMetadata>, Error> {
        if self.storage.get_item(ACCESS_TOKEN_KEY)?.is_none() {
            debug!("no stored access token");
            return Ok(None);
        }
        session.set_authenticated(true);
        self.load_profile(session).await.map(Some)
    }
}

impl<A, U> SessionService<A, U> {
    /// Forget both tokens and return the session to its initial state.
    ///
    /// The session is reset even when storage fails; the first storage error
    /// is still reported.
    pub fn logout(&self, session: &mut SessionState) -> Result<(), Error> {
        let access = self.storage.remove_item(ACCESS_TOKEN_KEY);
        let refresh = self.storage.remove_item(REFRESH_TOKEN_KEY);
        session.reset();
        info!("logged out");
        access?;
        refresh?;
        Ok(())
    }
}
