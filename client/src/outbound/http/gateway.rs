//! Shared HTTP client that attaches the stored bearer token to every request.
//!
//! All library API calls and the login call go through one
//! [`RequestGateway`]. There is no response interception: no refresh, no
//! retry and no backoff.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::domain::ACCESS_TOKEN_KEY;
use crate::domain::ports::{LocalStorage, RemoteError};

/// HTTP gateway bound to the library API base URL.
pub struct RequestGateway {
    client: Client,
    base: Url,
    storage: Arc<dyn LocalStorage>,
}

impl RequestGateway {
    /// Build a gateway. `timeout` of `None` leaves requests unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        timeout: Option<Duration>,
        storage: Arc<dyn LocalStorage>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base,
            storage,
        })
    }

    /// Endpoint URL built from path segments under the base URL.
    ///
    /// Segments are percent-encoded, so ids, ISBNs and email addresses can be
    /// passed as-is.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::transport(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request to `url`, with the bearer header when a token is
    /// stored.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let token = self.access_token();
        debug!(
            %method,
            path = url.path(),
            bearer = token.is_some(),
            "dispatching request"
        );
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Send `builder` and decode a JSON body.
    pub async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, RemoteError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder).await?;
        let body = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&body).map_err(|error| RemoteError::decode(error.to_string()))
    }

    /// Send `builder` and ignore any body.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<(), RemoteError> {
        self.send(builder).await.map(drop)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, RemoteError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, &body))
    }

    fn access_token(&self) -> Option<String> {
        match self.storage.get_item(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|value| !value.is_empty()),
            Err(error) => {
                warn!(%error, "access token unreadable; sending request without it");
                None
            }
        }
    }
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> RemoteError {
    RemoteError::transport(error.to_string())
}

pub(crate) fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteError {
    debug!(
        status = status.as_u16(),
        body = %body_preview(body),
        "request rejected"
    );
    RemoteError::status(status.as_u16())
}

pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{InMemoryLocalStorage, LocalStorageError, MockLocalStorage};
    use rstest::rstest;

    fn gateway(storage: Arc<dyn LocalStorage>) -> RequestGateway {
        let base = Url::parse("http://library.test/api/").expect("base url");
        RequestGateway::new(base, None, storage).expect("client")
    }

    #[test]
    fn stored_token_becomes_bearer_header() {
        let storage = Arc::new(InMemoryLocalStorage::with_items([(ACCESS_TOKEN_KEY, "tok")]));
        let gateway = gateway(storage);
        let url = gateway.endpoint(&["users", "metadata"]).expect("url");

        let request = gateway.request(Method::GET, url).build().expect("request");

        assert_eq!(
            request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok()),
            Some("Bearer tok")
        );
    }

    #[rstest]
    #[case::missing(InMemoryLocalStorage::new())]
    #[case::blank(InMemoryLocalStorage::with_items([(ACCESS_TOKEN_KEY, "")]))]
    fn no_token_means_no_authorization_header(#[case] storage: InMemoryLocalStorage) {
        let gateway = gateway(Arc::new(storage));
        let url = gateway.endpoint(&["books", "retrieve", "books"]).expect("url");

        let request = gateway.request(Method::GET, url).build().expect("request");

        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn unreadable_storage_sends_without_header() {
        let mut storage = MockLocalStorage::new();
        storage
            .expect_get_item()
            .returning(|_| Err(LocalStorageError::corrupt("bad json")));
        let gateway = gateway(Arc::new(storage));
        let url = gateway.endpoint(&["books"]).expect("url");

        let request = gateway.request(Method::GET, url).build().expect("request");

        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[rstest]
    #[case(&["books", "retrieve", "7"], "http://library.test/api/books/retrieve/7")]
    #[case(&["users", "update", "ada@example.com"], "http://library.test/api/users/update/ada@example.com")]
    #[case(&["books", "retrieve", "bookpdf", "a b"], "http://library.test/api/books/retrieve/bookpdf/a%20b")]
    fn endpoints_extend_the_base_path(#[case] segments: &[&str], #[case] expected: &str) {
        let gateway = gateway(Arc::new(InMemoryLocalStorage::new()));
        assert_eq!(gateway.endpoint(segments).expect("url").as_str(), expected);
    }

    #[test]
    fn status_errors_keep_only_the_code() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"{\"detail\":\"nope\"}");
        assert_eq!(error, RemoteError::status(400_u16));
    }

    #[test]
    fn previews_are_compacted_and_truncated() {
        let body = format!("a  b\n{}", "x".repeat(200));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("a b x"));
        assert!(preview.ends_with("..."));
    }
}
