//! Authentication primitives: login credentials and issued tokens.
//!
//! Login form input is validated here before any request leaves the client.
//! Tokens are opaque strings; holding one says nothing about whether the
//! server still accepts it.

use std::fmt;

use zeroize::Zeroizing;

/// Local storage key holding the bearer token attached to every request.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Local storage key holding the refresh token. Written at login, never read.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Domain error returned when login form values are incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email or password was blank.
    MissingFields,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "email and password are required."),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials submitted to the auth endpoint.
///
/// ## Invariants
/// - `username` is trimmed and non-empty. The library signs users in by email,
///   sent as the OAuth2 `username` form field.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use carbon_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "secret").unwrap();
/// assert_eq!(creds.username(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() || password.is_empty() {
            return Err(LoginValidationError::MissingFields);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username (email) sent as the `username` form field.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password sent as the `password` form field.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Borrow the raw token for header construction or persistence.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Token pair issued by the auth endpoint on a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Bearer token for API requests.
    pub access_token: AccessToken,
    /// Refresh token. Persisted but never used.
    pub refresh_token: AccessToken,
}
