//! HTTP adapters for the library API and the login endpoint.
//!
//! Every adapter shares one [`RequestGateway`], which owns the reqwest
//! client and the bearer-token injection.

mod authenticator;
mod book_catalogue;
mod dto;
mod gateway;
mod user_directory;

pub use authenticator::HttpAuthenticator;
pub use book_catalogue::{COVER_FIELD, HttpBookCatalogue, PDF_FIELD};
pub use gateway::RequestGateway;
pub use user_directory::HttpUserDirectory;
