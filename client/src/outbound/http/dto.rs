//! Wire shapes of the login endpoint.
//!
//! Book and user payloads decode straight into domain types; only the login
//! exchange needs translating.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AccessToken, TokenPair};

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: String,
    pub(super) refresh_token: String,
}

impl From<TokenResponseDto> for TokenPair {
    fn from(value: TokenResponseDto) -> Self {
        Self {
            access_token: AccessToken::new(value.access_token),
            refresh_token: AccessToken::new(value.refresh_token),
        }
    }
}

/// Error body carrying a `detail` member. Validation failures send a list
/// of problems instead of a string.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorDetailDto {
    #[serde(default)]
    pub(super) detail: Option<Value>,
}

impl ErrorDetailDto {
    pub(super) fn into_message(self) -> Option<String> {
        match self.detail? {
            Value::String(text) if !text.trim().is_empty() => Some(text),
            Value::Array(items) => {
                let messages = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect::<Vec<_>>();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        }
    }
}
