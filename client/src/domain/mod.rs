//! Domain primitives, view models and use-case services.
//!
//! Purpose: Hold everything the front ends need that does not depend on a
//! transport. Adapters plug in through [`ports`].
//!
//! Public surface:
//! - SessionState / UserScope: authentication flag and role gating views.
//! - ListingState / ListingFetcher: paginated book listing.
//! - SessionService, CatalogueService, UserAdminService: use-cases.
//! - Error / ErrorCode: view-facing failures.

pub mod auth;
pub mod book;
pub mod catalogue_service;
pub mod error;
pub mod listing;
pub mod navigation;
pub mod ports;
pub mod session;
pub mod session_service;
pub mod user;
pub mod user_service;

pub use self::auth::{
    ACCESS_TOKEN_KEY, AccessToken, LoginCredentials, LoginValidationError, REFRESH_TOKEN_KEY,
    TokenPair,
};
pub use self::book::{
    Book, BookId, BookPatch, BookValidationError, FileUpload, Isbn, NewBook, cover_data_uri,
};
pub use self::catalogue_service::{COMING_SOON_COVER, CatalogueService, REPOSITORY_WINDOW};
pub use self::error::{Error, ErrorCode};
pub use self::listing::{
    FetchOutcome, ListingFetcher, ListingState, NO_MORE_BOOKS, PendingFetch, RequestTag,
};
pub use self::navigation::{
    AdminAction, BookLink, LOGIN_LOCATION, admin_actions, book_update_path, details_path,
};
pub use self::session::{SUPERUSER_SCOPE, SessionState, UserScope};
pub use self::session_service::{HOME_LOCATION, LoginForm, SessionService};
pub use self::user::{
    Email, NAME_MAX, NewUser, ProfileMetadata, UserAccount, UserPatch, UserStatus,
    UserValidationError,
};
pub use self::user_service::UserAdminService;
