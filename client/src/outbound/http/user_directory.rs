//! Reqwest-backed adapter for the user endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use super::RequestGateway;
use crate::domain::ports::{RemoteError, UserDirectory};
use crate::domain::{Email, NewUser, ProfileMetadata, UserAccount, UserPatch};

/// User directory adapter over the library REST API.
pub struct HttpUserDirectory {
    gateway: Arc<RequestGateway>,
}

impl HttpUserDirectory {
    /// Create an adapter sharing `gateway`.
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn create_user(&self, user: &NewUser) -> Result<UserAccount, RemoteError> {
        let url = self.gateway.endpoint(&["users", "create"])?;
        let request = self.gateway.request(Method::POST, url).json(user);
        self.gateway.send_json(request).await
    }

    async fn update_user(&self, email: &Email, patch: &UserPatch) -> Result<(), RemoteError> {
        let url = self.gateway.endpoint(&["users", "update", email.as_str()])?;
        let request = self.gateway.request(Method::PATCH, url).json(patch);
        self.gateway.send_empty(request).await
    }

    async fn profile(&self) -> Result<ProfileMetadata, RemoteError> {
        let url = self.gateway.endpoint(&["users", "metadata"])?;
        self.gateway
            .send_json(self.gateway.request(Method::GET, url))
            .await
    }
}
