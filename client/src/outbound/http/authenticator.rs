//! Reqwest-backed adapter for the external login endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tracing::debug;
use url::Url;

use super::RequestGateway;
use super::dto::{ErrorDetailDto, TokenResponseDto};
use crate::domain::ports::{Authenticator, AuthenticatorError};
use crate::domain::{LoginCredentials, TokenPair};

/// Login adapter posting form-encoded credentials to a fixed URL.
pub struct HttpAuthenticator {
    gateway: Arc<RequestGateway>,
    login_url: Url,
}

impl HttpAuthenticator {
    /// Create an adapter posting to `login_url` through `gateway`.
    pub fn new(gateway: Arc<RequestGateway>, login_url: Url) -> Self {
        Self { gateway, login_url }
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<TokenPair, AuthenticatorError> {
        let response = self
            .gateway
            .request(Method::POST, self.login_url.clone())
            .form(&[
                ("username", credentials.username()),
                ("password", credentials.password()),
            ])
            .send()
            .await
            .map_err(|error| AuthenticatorError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| AuthenticatorError::transport(error.to_string()))?;
        if !status.is_success() {
            return Err(map_rejection(status, &body));
        }

        let tokens: TokenResponseDto = serde_json::from_slice(&body)
            .map_err(|error| AuthenticatorError::decode(error.to_string()))?;
        Ok(tokens.into())
    }
}

fn map_rejection(status: StatusCode, body: &[u8]) -> AuthenticatorError {
    let detail = serde_json::from_slice::<ErrorDetailDto>(body)
        .ok()
        .and_then(ErrorDetailDto::into_message);
    debug!(status = status.as_u16(), has_detail = detail.is_some(), "login refused");
    AuthenticatorError::rejected(
        detail.unwrap_or_else(|| format!("request failed with status code {}", status.as_u16())),
    )
}
