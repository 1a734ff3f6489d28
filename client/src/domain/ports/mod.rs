//! Domain ports for the hexagonal boundary.
//!
//! Every port here is driven: the domain calls out through them to the
//! library API, the login endpoint and local storage.

mod macros;
pub(crate) use macros::define_port_error;

mod authenticator;
mod book_catalogue;
mod local_storage;
mod remote_error;
mod user_directory;

#[cfg(test)]
pub use authenticator::MockAuthenticator;
pub use authenticator::{Authenticator, AuthenticatorError};
#[cfg(test)]
pub use book_catalogue::MockBookCatalogue;
pub use book_catalogue::{BookCatalogue, SignedUrl};
#[cfg(test)]
pub use local_storage::MockLocalStorage;
pub use local_storage::{InMemoryLocalStorage, LocalStorage, LocalStorageError};
pub use remote_error::RemoteError;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
