//! Reqwest-backed adapter for the book endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::FetchWindow;
use reqwest::Method;
use reqwest::multipart::{Form, Part};

use super::RequestGateway;
use crate::domain::ports::{BookCatalogue, RemoteError, SignedUrl};
use crate::domain::{Book, BookId, BookPatch, FileUpload, Isbn, NewBook};

/// Multipart field carrying a cover image.
pub const COVER_FIELD: &str = "cover_img";
/// Multipart field carrying a PDF.
pub const PDF_FIELD: &str = "pdf_file";

/// Book catalogue adapter over the library REST API.
pub struct HttpBookCatalogue {
    gateway: Arc<RequestGateway>,
}

impl HttpBookCatalogue {
    /// Create an adapter sharing `gateway`.
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl BookCatalogue for HttpBookCatalogue {
    async fn list_books(&self, window: FetchWindow) -> Result<Vec<Book>, RemoteError> {
        let url = self.gateway.endpoint(&["books", "retrieve", "books"])?;
        let request = self.gateway.request(Method::GET, url).query(&window);
        self.gateway.send_json(request).await
    }

    async fn book(&self, id: BookId) -> Result<Book, RemoteError> {
        let id = id.to_string();
        let url = self.gateway.endpoint(&["books", "retrieve", &id])?;
        self.gateway
            .send_json(self.gateway.request(Method::GET, url))
            .await
    }

    async fn book_pdf_url(&self, isbn: &Isbn) -> Result<SignedUrl, RemoteError> {
        let url = self
            .gateway
            .endpoint(&["books", "retrieve", "bookpdf", isbn.as_str()])?;
        self.gateway
            .send_json(self.gateway.request(Method::GET, url))
            .await
    }

    async fn static_file_url(&self, name: &str) -> Result<SignedUrl, RemoteError> {
        let url = self
            .gateway
            .endpoint(&["books", "retrieve", "staticfile", name])?;
        self.gateway
            .send_json(self.gateway.request(Method::GET, url))
            .await
    }

    async fn create_book(&self, book: &NewBook) -> Result<NewBook, RemoteError> {
        let url = self.gateway.endpoint(&["books", "create"])?;
        let request = self.gateway.request(Method::POST, url).json(book);
        self.gateway.send_json(request).await
    }

    async fn create_book_by_isbn(&self, isbn: &Isbn) -> Result<NewBook, RemoteError> {
        let url = self.gateway.endpoint(&["books", "create", isbn.as_str()])?;
        self.gateway
            .send_json(self.gateway.request(Method::POST, url))
            .await
    }

    async fn update_book(&self, id: BookId, patch: &BookPatch) -> Result<BookPatch, RemoteError> {
        let id = id.to_string();
        let url = self.gateway.endpoint(&["books", "update", &id])?;
        let request = self.gateway.request(Method::PATCH, url).json(patch);
        self.gateway.send_json(request).await
    }

    async fn upload_cover(&self, id: BookId, cover: FileUpload) -> Result<(), RemoteError> {
        let id = id.to_string();
        let url = self.gateway.endpoint(&["books", "update", "cover", &id])?;
        let form = multipart_form(COVER_FIELD, cover)?;
        let request = self.gateway.request(Method::PATCH, url).multipart(form);
        self.gateway.send_empty(request).await
    }

    async fn upload_pdf(&self, id: BookId, pdf: FileUpload) -> Result<(), RemoteError> {
        let id = id.to_string();
        let url = self.gateway.endpoint(&["books", "upload", "bookpdf", &id])?;
        let form = multipart_form(PDF_FIELD, pdf)?;
        let request = self.gateway.request(Method::POST, url).multipart(form);
        self.gateway.send_empty(request).await
    }

    async fn delete_book(&self, id: BookId) -> Result<(), RemoteError> {
        let id = id.to_string();
        let url = self.gateway.endpoint(&["books", "delete", &id])?;
        self.gateway
            .send_empty(self.gateway.request(Method::DELETE, url))
            .await
    }
}

fn multipart_form(field: &'static str, file: FileUpload) -> Result<Form, RemoteError> {
    let part = Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(file.mime)
        .map_err(|error| RemoteError::transport(error.to_string()))?;
    Ok(Form::new().part(field, part))
}
