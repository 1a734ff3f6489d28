//! Library user accounts and the signed-in user's profile metadata.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a user's display name.
pub const NAME_MAX: usize = 64;

/// Validation failures that block a user request before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// A required field was missing or blank.
    #[error("{field} is required")]
    Required { field: &'static str },
    /// The email address had no `@` separating local part and domain.
    #[error("email must look like name@domain")]
    InvalidEmail,
    /// The name exceeded [`NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Email address identifying a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an email address.
    ///
    /// # Examples
    /// ```
    /// use carbon_client::domain::Email;
    ///
    /// assert!(Email::new("ada@example.com").is_ok());
    /// assert!(Email::new("ada").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::Required { field: "email" });
        }
        match trimmed.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }

    /// Borrow the address text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Role assigned to an account. The signed-in user's scope carries the same
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Full administrative access, including the admin menu.
    Superuser,
    /// Catalogue maintenance access.
    Admin,
    /// Regular reader.
    User,
}

/// Account record returned by `users/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Login email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Age in years, when given.
    #[serde(default)]
    pub age: Option<u32>,
    /// Server-side account id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Role assigned to the account.
    #[serde(default)]
    pub status: Option<UserStatus>,
    /// Whether the account may sign in.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Whether the account currently borrows books.
    #[serde(default)]
    pub is_borrower: Option<bool>,
    /// Whether the account holds a membership.
    #[serde(default)]
    pub is_member: Option<bool>,
    /// Date the account was created.
    #[serde(default)]
    pub registered_date: Option<NaiveDate>,
}

/// Sign-up payload for `users/create`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    email: Email,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<u32>,
    password: String,
}

impl NewUser {
    /// Validate sign-up form values.
    pub fn try_new(
        email: &str,
        name: &str,
        age: Option<u32>,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        let email = Email::new(email)?;
        let name = validate_name(name)?.ok_or(UserValidationError::Required { field: "name" })?;
        if password.is_empty() {
            return Err(UserValidationError::Required { field: "password" });
        }
        Ok(Self {
            email,
            name,
            age,
            password: password.to_owned(),
        })
    }

    /// Email of the account being created.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name of the account being created.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("age", &self.age)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Partial update for `PATCH users/update/{email}`. Unset fields are not sent.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

impl UserPatch {
    /// Validate update form values. Blank text fields are left unchanged.
    pub fn try_new(
        email: Option<&str>,
        name: Option<&str>,
        age: Option<u32>,
        password: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let email = email
            .filter(|value| !value.trim().is_empty())
            .map(Email::new)
            .transpose()?;
        let name = match name {
            Some(value) => validate_name(value)?,
            None => None,
        };
        let password = password
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(Self {
            email,
            name,
            age,
            password,
        })
    }

    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPatch")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("age", &self.age)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Identity encoded in the bearer token, as reported by `users/metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Email of the signed-in account.
    pub email: String,
    /// Scope string, typically `superuser`, `admin` or `user`.
    #[serde(default)]
    pub scope: Option<String>,
}

fn validate_name(raw: &str) -> Result<Option<String>, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(UserValidationError::NameTooLong { max: NAME_MAX });
    }
    Ok(Some(trimmed.to_owned()))
}
