//! Driven port for the external login endpoint.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{LoginCredentials, TokenPair};

define_port_error! {
    /// Errors surfaced while exchanging credentials for tokens.
    pub enum AuthenticatorError {
        /// The login request never produced a response.
        Transport { message: String } =>
            "network error: {message}",
        /// The endpoint refused the credentials. `detail` is shown verbatim.
        Rejected { detail: String } =>
            "{detail}",
        /// The endpoint answered successfully with an unexpected body.
        Decode { message: String } =>
            "login response could not be decoded: {message}",
    }
}

/// Port exchanging login credentials for a token pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Submit `credentials` and return the issued tokens.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<TokenPair, AuthenticatorError>;
}
