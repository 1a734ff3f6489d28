//! Book records, admin form payloads and their client-side validation.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum ISBN length accepted by the catalogue.
pub const ISBN_MAX: usize = 13;

/// Validation failures that block a book request before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookValidationError {
    /// A required field was missing or blank.
    #[error("{field} is required")]
    Required { field: &'static str },
    /// A field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    /// A book id was not a positive integer.
    #[error("book id must be a positive integer, got `{value}`")]
    InvalidId { value: String },
}

/// Catalogue identifier of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Wrap a raw identifier.
    pub fn new(raw: i64) -> Result<Self, BookValidationError> {
        if raw <= 0 {
            return Err(BookValidationError::InvalidId {
                value: raw.to_string(),
            });
        }
        Ok(Self(raw))
    }

    /// Raw identifier as sent in request paths.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for BookId {
    type Err = BookValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| BookValidationError::InvalidId {
                value: s.to_owned(),
            })?;
        Self::new(raw)
    }
}

/// International Standard Book Number used for lookups and PDF retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Validate and construct an ISBN.
    pub fn new(raw: impl Into<String>) -> Result<Self, BookValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BookValidationError::Required { field: "isbn" });
        }
        if trimmed.chars().count() > ISBN_MAX {
            return Err(BookValidationError::TooLong {
                field: "isbn",
                max: ISBN_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the ISBN text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Isbn {
    type Error = BookValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Isbn> for String {
    fn from(value: Isbn) -> Self {
        value.0
    }
}

/// Book record returned by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Catalogue identifier.
    pub id: BookId,
    /// Display title.
    pub title: String,
    /// Author as entered by the librarian.
    #[serde(default)]
    pub author: Option<String>,
    /// ISBN-10 or ISBN-13; also keys the PDF lookup.
    #[serde(default)]
    pub isbn: Option<String>,
    /// Edition label, e.g. `2nd`.
    #[serde(default)]
    pub edition: Option<String>,
    /// Publisher name.
    #[serde(default)]
    pub publisher: Option<String>,
    /// Publication date as free text.
    #[serde(default)]
    pub publish_date: Option<String>,
    /// Place of publication.
    #[serde(default)]
    pub publish_place: Option<String>,
    /// Page count.
    #[serde(default)]
    pub number_of_pages: Option<u32>,
    /// Blurb or summary.
    #[serde(default)]
    pub description: Option<String>,
    /// Language of the text.
    #[serde(default)]
    pub language: Option<String>,
    /// Library of Congress control number.
    #[serde(default)]
    pub lccn: Option<String>,
    /// Subtitle.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Comma-separated subject headings.
    #[serde(default)]
    pub subjects: Option<String>,
    /// Base64-encoded JPEG cover.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Date the record was added.
    #[serde(default)]
    pub added_date: Option<NaiveDate>,
    /// Account currently holding the book.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Date of the current loan.
    #[serde(default)]
    pub borrowed_date: Option<NaiveDate>,
    /// Date of the last return.
    #[serde(default)]
    pub returned_date: Option<NaiveDate>,
    /// Whether the book is out on loan.
    #[serde(default)]
    pub is_borrowed: bool,
}

impl Book {
    /// ISBN suitable for PDF lookups, if the record carries a usable one.
    pub fn isbn(&self) -> Option<Isbn> {
        self.isbn.as_deref().and_then(|raw| Isbn::new(raw).ok())
    }

    /// Image source for the cover: an inline JPEG data URI when the record
    /// carries a decodable cover, otherwise `fallback`.
    pub fn cover_source(&self, fallback: &str) -> String {
        self.cover_image
            .as_deref()
            .and_then(cover_data_uri)
            .unwrap_or_else(|| fallback.to_owned())
    }
}

/// Build a `data:image/jpeg;base64,...` URI from a base64 payload.
///
/// Returns `None` when the payload is blank or not valid base64.
///
/// # Examples
/// ```
/// use carbon_client::domain::cover_data_uri;
///
/// assert_eq!(cover_data_uri("/9j/4A=="), Some("data:image/jpeg;base64,/9j/4A==".to_owned()));
/// assert_eq!(cover_data_uri("not base64!"), None);
/// ```
pub fn cover_data_uri(b64: &str) -> Option<String> {
    let payload = b64.trim();
    if payload.is_empty() || STANDARD.decode(payload).is_err() {
        return None;
    }
    Some(format!("data:image/jpeg;base64,{payload}"))
}

/// Payload for manual book creation (`POST books/create`).
///
/// Only `title` and `author` are required by the form; the remaining fields
/// are bounded by the catalogue's column widths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    /// Display title.
    pub title: String,
    /// Author as entered by the librarian.
    #[serde(default)]
    pub author: Option<String>,
    /// ISBN-10 or ISBN-13; also keys the PDF lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Edition label, e.g. `2nd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    /// Publisher name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Publication date as free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    /// Place of publication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_place: Option<String>,
    /// Page count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<u32>,
    /// Blurb or summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Language of the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Library of Congress control number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lccn: Option<String>,
    /// Subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Comma-separated subject headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<String>,
}

impl NewBook {
    /// Check required fields and maximum lengths.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        require("title", Some(self.title.as_str()))?;
        require("author", self.author.as_deref())?;
        check_lengths(&self.text_fields())
    }

    fn text_fields(&self) -> [(&'static str, Option<&str>); 11] {
        [
            ("edition", self.edition.as_deref()),
            ("publisher", self.publisher.as_deref()),
            ("publish date", self.publish_date.as_deref()),
            ("publish place", self.publish_place.as_deref()),
            ("description", self.description.as_deref()),
            ("language", self.language.as_deref()),
            ("isbn", self.isbn.as_deref()),
            ("lccn", self.lccn.as_deref()),
            ("subtitle", self.subtitle.as_deref()),
            ("subjects", self.subjects.as_deref()),
            ("title", Some(self.title.as_str())),
        ]
    }
}

/// Partial update for `PATCH books/update/{id}`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// New ISBN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Edition label, e.g. `2nd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    /// Publisher name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Publication date as free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    /// Place of publication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_place: Option<String>,
    /// Page count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<u32>,
    /// Blurb or summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Language of the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Library of Congress control number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lccn: Option<String>,
    /// Subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Comma-separated subject headings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<String>,
}

impl BookPatch {
    /// Check maximum lengths of the fields being changed.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        check_lengths(&[
            ("title", self.title.as_deref()),
            ("author", self.author.as_deref()),
            ("isbn", self.isbn.as_deref()),
            ("edition", self.edition.as_deref()),
            ("publisher", self.publisher.as_deref()),
            ("publish date", self.publish_date.as_deref()),
            ("publish place", self.publish_place.as_deref()),
            ("description", self.description.as_deref()),
            ("language", self.language.as_deref()),
            ("lccn", self.lccn.as_deref()),
            ("subtitle", self.subtitle.as_deref()),
            ("subjects", self.subjects.as_deref()),
        ])
    }

    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// File contents attached to a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of the payload.
    pub mime: &'static str,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// A JPEG cover image.
    pub fn jpeg(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: "image/jpeg",
            bytes,
        }
    }

    /// A PDF document.
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: "application/pdf",
            bytes,
        }
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Maximum length per book text field, matching the catalogue's columns.
fn max_length(field: &str) -> Option<usize> {
    match field {
        "title" | "author" | "edition" | "publisher" | "publish date" | "publish place" => Some(64),
        "description" | "subtitle" => Some(1024),
        "language" => Some(32),
        "isbn" => Some(ISBN_MAX),
        "lccn" => Some(12),
        "subjects" => Some(256),
        _ => None,
    }
}

fn require(field: &'static str, value: Option<&str>) -> Result<(), BookValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(BookValidationError::Required { field }),
    }
}

fn check_lengths(fields: &[(&'static str, Option<&str>)]) -> Result<(), BookValidationError> {
    for &(field, value) in fields {
        let (Some(text), Some(max)) = (value, max_length(field)) else {
            continue;
        };
        if text.chars().count() > max {
            return Err(BookValidationError::TooLong { field, max });
        }
    }
    Ok(())
}
