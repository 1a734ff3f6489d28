//! Terminal front end. Each invocation plays the part of one page view:
//! it restores the session, runs one command and prints the result.

mod app;
mod args;
mod render;

pub use app::{App, AppPorts, HttpApp, LISTING_LOCATION_KEY};
pub use args::{
    BookFields, BooksCommand, Cli, Command, CreateBookArgs, ListArgs, LoginArgs, UpdateBookArgs,
    UsersCommand,
};
