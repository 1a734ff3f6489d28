//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest adapters for the library REST API and login endpoint
//! - **storage**: file-backed local storage in the state directory
//!
//! Adapters translate between wire or file formats and domain types. They
//! contain no business logic.

pub mod http;
pub mod storage;
