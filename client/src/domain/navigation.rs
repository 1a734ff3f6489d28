//! Rendering decisions driven by the session: where book links lead and
//! which admin actions are offered.

use crate::domain::{BookId, SessionState};

/// Route of the login view.
pub const LOGIN_LOCATION: &str = "/login";

/// Destination of a book link in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookLink {
    /// Open the detail view directly.
    Details {
        /// Detail route, e.g. `/details/7`.
        path: String,
    },
    /// Send the user to login first, then on to `from`.
    Login {
        /// Detail route to return to after a successful login.
        from: String,
    },
}

impl BookLink {
    /// Link for book `id` given the current session.
    ///
    /// # Examples
    /// ```
    /// use carbon_client::domain::{BookId, BookLink, SessionState};
    ///
    /// let id = BookId::new(7).unwrap();
    /// let link = BookLink::for_book(&SessionState::new(), id);
    /// assert_eq!(link.target(), "/login");
    /// assert_eq!(link.return_to(), Some("/details/7"));
    /// ```
    pub fn for_book(session: &SessionState, id: BookId) -> Self {
        let path = details_path(id);
        if session.is_authenticated() {
            Self::Details { path }
        } else {
            Self::Login { from: path }
        }
    }

    /// Route the link navigates to.
    pub fn target(&self) -> &str {
        match self {
            Self::Details { path } => path.as_str(),
            Self::Login { .. } => LOGIN_LOCATION,
        }
    }

    /// Location login should return to, if the link goes via login.
    pub fn return_to(&self) -> Option<&str> {
        match self {
            Self::Details { .. } => None,
            Self::Login { from } => Some(from.as_str()),
        }
    }
}

/// Detail route for book `id`.
pub fn details_path(id: BookId) -> String {
    format!("/details/{}", id.get())
}

/// Per-row update route, offered to superusers only.
pub fn book_update_path(session: &SessionState, id: BookId) -> Option<String> {
    session
        .is_superuser()
        .then(|| format!("/update/book/{}", id.get()))
}

/// Admin menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    CreateBook,
    UpdateBook,
    AddUser,
    BookRepository,
}

const ALL_ADMIN_ACTIONS: [AdminAction; 4] = [
    AdminAction::CreateBook,
    AdminAction::UpdateBook,
    AdminAction::AddUser,
    AdminAction::BookRepository,
];

impl AdminAction {
    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::CreateBook => "CREATE BOOK",
            Self::UpdateBook => "UPDATE BOOK",
            Self::AddUser => "ADD NEW USER",
            Self::BookRepository => "BOOK REPOSITORY",
        }
    }

    /// Route the entry opens.
    pub fn path(self) -> &'static str {
        match self {
            Self::CreateBook => "/create/book",
            Self::UpdateBook => "/update/book",
            Self::AddUser => "/create/user",
            Self::BookRepository => "/repository/books",
        }
    }
}

/// Admin menu for the current session; empty unless the scope is
/// `superuser`.
pub fn admin_actions(session: &SessionState) -> &'static [AdminAction] {
    if session.is_superuser() {
        &ALL_ADMIN_ACTIONS
    } else {
        &[]
    }
}
