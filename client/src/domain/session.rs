//! In-memory session state consulted by every view.
//!
//! The state is owned by the application shell and lent to views as
//! `&SessionState` for rendering decisions or `&mut SessionState` when a
//! flow changes it. Tokens are not kept here; they live in local storage.

use std::fmt;

/// Scope name granting access to the admin menu.
pub const SUPERUSER_SCOPE: &str = "superuser";

/// Authorization scope reported for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UserScope(String);

impl UserScope {
    /// Wrap a raw scope string. Surrounding whitespace is dropped.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_owned())
    }

    /// Whether no scope has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this scope unlocks admin actions.
    pub fn is_superuser(&self) -> bool {
        self.0 == SUPERUSER_SCOPE
    }

    /// Borrow the scope text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authentication flag and scope for the current user.
///
/// ## Invariants
/// - A fresh state is unauthenticated with an empty scope.
/// - The scope and email are only observable while authenticated, and are
///   dropped whenever authentication is turned off.
///
/// # Examples
/// ```
/// use carbon_client::domain::{SessionState, UserScope};
///
/// let mut session = SessionState::new();
/// session.set_scope(UserScope::new("superuser"));
/// assert!(session.scope().is_none());
///
/// session.set_authenticated(true);
/// session.set_scope(UserScope::new("superuser"));
/// assert!(session.is_superuser());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    authenticated: bool,
    scope: UserScope,
    email: Option<String>,
}

impl SessionState {
    /// Initial, signed-out state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the user is treated as signed in.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Scope of the signed-in user, once the profile fetch has filled it.
    pub fn scope(&self) -> Option<&UserScope> {
        (self.authenticated && !self.scope.is_empty()).then_some(&self.scope)
    }

    /// Email of the signed-in user, once the profile fetch has filled it.
    pub fn email(&self) -> Option<&str> {
        if self.authenticated {
            self.email.as_deref()
        } else {
            None
        }
    }

    /// Whether admin actions should be offered.
    pub fn is_superuser(&self) -> bool {
        self.scope().is_some_and(UserScope::is_superuser)
    }

    /// Flip the authentication flag. Turning it off forgets scope and email.
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
        if !authenticated {
            self.scope = UserScope::default();
            self.email = None;
        }
    }

    /// Record the scope reported by the profile fetch. Ignored while signed
    /// out.
    pub fn set_scope(&mut self, scope: UserScope) {
        if self.authenticated {
            self.scope = scope;
        }
    }

    /// Record the email reported by the profile fetch. Ignored while signed
    /// out.
    pub fn set_email(&mut self, email: impl Into<String>) {
        if self.authenticated {
            self.email = Some(email.into());
        }
    }

    /// Return to the initial, signed-out state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_state_is_signed_out_with_empty_scope() {
        let session = SessionState::new();
        assert!(!session.is_authenticated());
        assert!(session.scope().is_none());
        assert!(session.email().is_none());
    }

    #[test]
    fn signing_out_forgets_scope_and_email() {
        let mut session = SessionState::new();
        session.set_authenticated(true);
        session.set_scope(UserScope::new("admin"));
        session.set_email("ada@example.com");
        assert_eq!(session.scope().map(UserScope::as_str), Some("admin"));

        session.set_authenticated(false);
        session.set_authenticated(true);
        assert!(session.scope().is_none());
        assert!(session.email().is_none());
    }

    #[rstest]
    #[case("superuser", true)]
    #[case(" superuser ", true)]
    #[case("admin", false)]
    #[case("user", false)]
    #[case("", false)]
    fn only_superusers_see_admin_actions(#[case] scope: &str, #[case] expected: bool) {
        let mut session = SessionState::new();
        session.set_authenticated(true);
        session.set_scope(UserScope::new(scope));
        assert_eq!(session.is_superuser(), expected);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut session = SessionState::new();
        session.set_authenticated(true);
        session.set_scope(UserScope::new("superuser"));
        session.reset();
        assert_eq!(session, SessionState::new());
    }
}
