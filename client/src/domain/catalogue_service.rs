//! Book catalogue use-cases: detail, PDF access, repository table and the
//! admin create/update/delete flows.
//!
//! Form values are validated before any request is sent; a validation
//! failure never reaches the catalogue port.

use std::sync::Arc;

use pagination::FetchWindow;
use tracing::info;

use crate::domain::ports::{BookCatalogue, SignedUrl};
use crate::domain::{Book, BookId, BookPatch, Error, FileUpload, Isbn, NewBook};

/// Static asset shown in place of a missing cover.
pub const COMING_SOON_COVER: &str = "cover-coming-soon.jpg";

/// Window of the admin repository table: the first fifty books.
pub const REPOSITORY_WINDOW: FetchWindow = FetchWindow { limit: 50, skip: 0 };

/// Catalogue service wrapping the book endpoints.
#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    /// Create a service over `catalogue`.
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

impl<C> CatalogueService<C>
where
    C: BookCatalogue,
{
    /// Load one book for the detail view.
    pub async fn book(&self, id: BookId) -> Result<Book, Error> {
        Ok(self.catalogue.book(id).await?)
    }

    /// Signed link to the PDF of `book`, looked up by its ISBN.
    pub async fn book_pdf(&self, book: &Book) -> Result<SignedUrl, Error> {
        let isbn = book
            .isbn()
            .ok_or_else(|| Error::not_found("this book has no ISBN, so no PDF is stored"))?;
        Ok(self.catalogue.book_pdf_url(&isbn).await?)
    }

    /// Signed link to the placeholder cover.
    pub async fn placeholder_cover(&self) -> Result<SignedUrl, Error> {
        Ok(self.catalogue.static_file_url(COMING_SOON_COVER).await?)
    }

    /// Books shown in the admin repository table.
    pub async fn repository(&self) -> Result<Vec<Book>, Error> {
        Ok(self.catalogue.list_books(REPOSITORY_WINDOW).await?)
    }

    /// Create a book from form values.
    pub async fn create(&self, book: &NewBook) -> Result<NewBook, Error> {
        book.validate()?;
        let created = self.catalogue.create_book(book).await?;
        info!(title = %created.title, "book created");
        Ok(created)
    }

    /// Create a book from an ISBN lookup.
    pub async fn create_by_isbn(&self, raw_isbn: &str) -> Result<NewBook, Error> {
        let isbn = Isbn::new(raw_isbn)?;
        let created = self.catalogue.create_book_by_isbn(&isbn).await?;
        info!(%isbn, title = %created.title, "book created from isbn");
        Ok(created)
    }

    /// Apply a partial update. An empty patch is refused.
    pub async fn update(&self, id: BookId, patch: &BookPatch) -> Result<BookPatch, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("nothing to update"));
        }
        patch.validate()?;
        let updated = self.catalogue.update_book(id, patch).await?;
        info!(book_id = id.get(), "book updated");
        Ok(updated)
    }

    /// Replace the cover image. An empty file is refused.
    pub async fn upload_cover(&self, id: BookId, cover: FileUpload) -> Result<(), Error> {
        ensure_not_empty(&cover)?;
        self.catalogue.upload_cover(id, cover).await?;
        info!(book_id = id.get(), "cover uploaded");
        Ok(())
    }

    /// Attach a PDF. An empty file is refused.
    pub async fn upload_pdf(&self, id: BookId, pdf: FileUpload) -> Result<(), Error> {
        ensure_not_empty(&pdf)?;
        self.catalogue.upload_pdf(id, pdf).await?;
        info!(book_id = id.get(), "pdf uploaded");
        Ok(())
    }

    /// Delete a book.
    pub async fn delete(&self, id: BookId) -> Result<(), Error> {
        self.catalogue.delete_book(id).await?;
        info!(book_id = id.get(), "book deleted");
        Ok(())
    }
}

fn ensure_not_empty(file: &FileUpload) -> Result<(), Error> {
    if file.bytes.is_empty() {
        return Err(Error::invalid_request(format!(
            "{} is empty",
            file.file_name
        )));
    }
    Ok(())
}
