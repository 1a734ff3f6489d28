//! In-memory port implementations shared by the behaviour suites.
//!
//! The mockall doubles in the library are compiled for unit tests only, so
//! integration suites drive the services through these recording stubs.

use std::sync::Mutex;

use async_trait::async_trait;
use carbon_client::domain::ports::{
    Authenticator, AuthenticatorError, BookCatalogue, RemoteError, SignedUrl, UserDirectory,
};
use carbon_client::domain::{
    AccessToken, Book, BookId, BookPatch, Email, FileUpload, Isbn, LoginCredentials, NewBook,
    NewUser, ProfileMetadata, TokenPair, UserAccount, UserPatch,
};
use pagination::FetchWindow;
use url::Url;

/// Build a minimal book record.
pub fn book(id: i64, title: &str) -> Book {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "author": "Anon",
        "isbn": format!("978{id:010}"),
    }))
    .expect("book fixture")
}

/// Build `count` books with ids starting at one.
pub fn library(count: i64) -> Vec<Book> {
    (1..=count).map(|id| book(id, &format!("Book {id}"))).collect()
}

/// Token pair with recognisable values.
pub fn tokens(access: &str, refresh: &str) -> TokenPair {
    TokenPair {
        access_token: AccessToken::new(access),
        refresh_token: AccessToken::new(refresh),
    }
}

/// Authenticator answering every login with one fixed outcome.
pub struct StubAuthenticator {
    outcome: Mutex<Result<TokenPair, AuthenticatorError>>,
    usernames: Mutex<Vec<String>>,
}

impl StubAuthenticator {
    pub fn new(outcome: Result<TokenPair, AuthenticatorError>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            usernames: Mutex::new(Vec::new()),
        }
    }

    pub fn set_outcome(&self, outcome: Result<TokenPair, AuthenticatorError>) {
        *self.outcome.lock().expect("outcome lock") = outcome;
    }

    pub fn usernames(&self) -> Vec<String> {
        self.usernames.lock().expect("usernames lock").clone()
    }
}

#[async_trait]
impl Authenticator for StubAuthenticator {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<TokenPair, AuthenticatorError> {
        self.usernames
            .lock()
            .expect("usernames lock")
            .push(credentials.username().to_owned());
        self.outcome.lock().expect("outcome lock").clone()
    }
}

/// User directory with a configurable profile response.
pub struct StubUsers {
    profile: Mutex<Result<ProfileMetadata, RemoteError>>,
    updates: Mutex<Vec<String>>,
}

impl StubUsers {
    pub fn new(profile: Result<ProfileMetadata, RemoteError>) -> Self {
        Self {
            profile: Mutex::new(profile),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn signed_in_as(email: &str, scope: &str) -> Self {
        Self::new(Ok(ProfileMetadata {
            email: email.to_owned(),
            scope: Some(scope.to_owned()),
        }))
    }

    pub fn set_profile(&self, profile: Result<ProfileMetadata, RemoteError>) {
        *self.profile.lock().expect("profile lock") = profile;
    }

    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().expect("updates lock").clone()
    }
}

#[async_trait]
impl UserDirectory for StubUsers {
    async fn create_user(&self, user: &NewUser) -> Result<UserAccount, RemoteError> {
        serde_json::from_value(serde_json::json!({
            "email": user.email().as_str(),
            "name": user.name(),
            "status": "user",
        }))
        .map_err(|err| RemoteError::decode(err.to_string()))
    }

    async fn update_user(&self, email: &Email, _patch: &UserPatch) -> Result<(), RemoteError> {
        self.updates
            .lock()
            .expect("updates lock")
            .push(email.as_str().to_owned());
        Ok(())
    }

    async fn profile(&self) -> Result<ProfileMetadata, RemoteError> {
        self.profile.lock().expect("profile lock").clone()
    }
}

/// Catalogue serving windows over an in-memory library and recording them.
pub struct StubCatalogue {
    books: Mutex<Vec<Book>>,
    failure: Mutex<Option<RemoteError>>,
    windows: Mutex<Vec<FetchWindow>>,
    deleted: Mutex<Vec<BookId>>,
}

impl StubCatalogue {
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
            failure: Mutex::new(None),
            windows: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Make every listing request fail with `err` until cleared.
    pub fn fail_with(&self, err: Option<RemoteError>) {
        *self.failure.lock().expect("failure lock") = err;
    }

    pub fn windows(&self) -> Vec<FetchWindow> {
        self.windows.lock().expect("windows lock").clone()
    }

    pub fn deleted(&self) -> Vec<BookId> {
        self.deleted.lock().expect("deleted lock").clone()
    }
}

fn signed(path: &str) -> Result<SignedUrl, RemoteError> {
    Url::parse(&format!("https://files.example.org/{path}"))
        .map(|url| SignedUrl { url })
        .map_err(|err| RemoteError::decode(err.to_string()))
}

#[async_trait]
impl BookCatalogue for StubCatalogue {
    async fn list_books(&self, window: FetchWindow) -> Result<Vec<Book>, RemoteError> {
        self.windows.lock().expect("windows lock").push(window);
        if let Some(err) = self.failure.lock().expect("failure lock").clone() {
            return Err(err);
        }
        let books = self.books.lock().expect("books lock");
        Ok(books
            .iter()
            .skip(window.skip as usize)
            .take(window.limit as usize)
            .cloned()
            .collect())
    }

    async fn book(&self, id: BookId) -> Result<Book, RemoteError> {
        self.books
            .lock()
            .expect("books lock")
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| RemoteError::status(404_u16))
    }

    async fn book_pdf_url(&self, isbn: &Isbn) -> Result<SignedUrl, RemoteError> {
        signed(&format!("pdf/{isbn}.pdf"))
    }

    async fn static_file_url(&self, name: &str) -> Result<SignedUrl, RemoteError> {
        signed(&format!("static/{name}"))
    }

    async fn create_book(&self, book: &NewBook) -> Result<NewBook, RemoteError> {
        Ok(book.clone())
    }

    async fn create_book_by_isbn(&self, isbn: &Isbn) -> Result<NewBook, RemoteError> {
        Ok(NewBook {
            title: format!("Looked up {isbn}"),
            isbn: Some(isbn.as_str().to_owned()),
            ..NewBook::default()
        })
    }

    async fn update_book(&self, _id: BookId, patch: &BookPatch) -> Result<BookPatch, RemoteError> {
        Ok(patch.clone())
    }

    async fn upload_cover(&self, _id: BookId, _cover: FileUpload) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn upload_pdf(&self, _id: BookId, _pdf: FileUpload) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn delete_book(&self, id: BookId) -> Result<(), RemoteError> {
        self.deleted.lock().expect("deleted lock").push(id);
        Ok(())
    }
}
