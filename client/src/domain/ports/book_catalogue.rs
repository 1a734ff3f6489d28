//! Driven port for the book endpoints of the library API.

use async_trait::async_trait;
use pagination::FetchWindow;
use serde::Deserialize;
use url::Url;

use super::RemoteError;
use crate::domain::{Book, BookId, BookPatch, FileUpload, Isbn, NewBook};

/// Short-lived download link issued by the API for stored files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignedUrl {
    /// Location of the file.
    pub url: Url,
}

/// Port for reading and maintaining the book catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCatalogue: Send + Sync {
    /// Fetch `window.limit` books starting at `window.skip`.
    async fn list_books(&self, window: FetchWindow) -> Result<Vec<Book>, RemoteError>;

    /// Fetch one book by id.
    async fn book(&self, id: BookId) -> Result<Book, RemoteError>;

    /// Signed link to the PDF stored for `isbn`.
    async fn book_pdf_url(&self, isbn: &Isbn) -> Result<SignedUrl, RemoteError>;

    /// Signed link to a static asset such as the placeholder cover.
    async fn static_file_url(&self, name: &str) -> Result<SignedUrl, RemoteError>;

    /// Create a book from form values and return the stored payload.
    async fn create_book(&self, book: &NewBook) -> Result<NewBook, RemoteError>;

    /// Create a book by looking `isbn` up in the external catalogue.
    async fn create_book_by_isbn(&self, isbn: &Isbn) -> Result<NewBook, RemoteError>;

    /// Apply a partial update and return the fields the server echoed.
    async fn update_book(&self, id: BookId, patch: &BookPatch) -> Result<BookPatch, RemoteError>;

    /// Replace the cover image of a book.
    async fn upload_cover(&self, id: BookId, cover: FileUpload) -> Result<(), RemoteError>;

    /// Attach a PDF to a book.
    async fn upload_pdf(&self, id: BookId, pdf: FileUpload) -> Result<(), RemoteError>;

    /// Delete a book.
    async fn delete_book(&self, id: BookId) -> Result<(), RemoteError>;
}
