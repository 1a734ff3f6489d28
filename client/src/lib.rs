//! Typed client and terminal front end for the carbon library REST API.
//!
//! The crate follows a hexagonal layout:
//! - [`domain`] holds session state, pagination view models, validation and
//!   the use-case services, talking to the outside world through
//!   [`domain::ports`].
//! - [`outbound`] implements those ports with reqwest and the filesystem.
//! - [`inbound`] exposes the `carbon` command line.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod telemetry;
