//! Paginated book listing: cursor navigation, result replacement and
//! stale-response discarding.
//!
//! [`ListingState`] is the view model owned by a listing view. Navigation
//! methods move the cursor and hand back a [`PendingFetch`]; the caller runs
//! it through [`ListingFetcher`] and feeds the result back with
//! [`ListingState::complete`]. Only the most recently issued fetch may change
//! the state.

use std::sync::Arc;

use pagination::{FetchWindow, PageCursor};
use tracing::{debug, info};

use crate::domain::ports::BookCatalogue;
use crate::domain::{Book, Error};

/// Error text shown when a fetch comes back empty.
pub const NO_MORE_BOOKS: &str = "No more books to show";

/// Monotonic identifier attached to each issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTag(u64);

/// A fetch issued by [`ListingState`] and not yet completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFetch {
    tag: RequestTag,
    window: FetchWindow,
}

impl PendingFetch {
    /// Tag identifying this fetch.
    pub fn tag(&self) -> RequestTag {
        self.tag
    }

    /// Records requested.
    pub fn window(&self) -> FetchWindow {
        self.window
    }
}

/// Result of feeding a completed fetch back into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result replaced the listing.
    Replaced,
    /// The fetch failed; the previous listing is kept and the error set.
    Failed,
    /// A newer fetch has been issued; the result was dropped.
    Stale,
}

/// View model for a paginated listing.
///
/// ## Invariants
/// - `books` only ever holds the result of one fetch; pages are never merged.
/// - Backward navigation is unavailable on page zero.
/// - Forward navigation is unavailable once the latest result was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    cursor: PageCursor,
    books: Vec<Book>,
    error: Option<String>,
    last_issued: u64,
}

impl ListingState {
    /// State positioned at `cursor` with nothing loaded yet.
    pub fn new(cursor: PageCursor) -> Self {
        Self {
            cursor,
            books: Vec::new(),
            error: None,
            last_issued: 0,
        }
    }

    /// Current cursor.
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Query string encoding the current cursor, e.g. `page=0&limit=10&skip=0`.
    pub fn location(&self) -> String {
        self.cursor.to_query()
    }

    /// Books from the latest successful fetch.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Error text to show under the listing, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the backward control is enabled.
    pub fn can_go_back(&self) -> bool {
        !self.cursor.is_first_page()
    }

    /// Whether the forward control is enabled.
    ///
    /// This trails the data by one step: forward stays enabled on a full
    /// last page and is only disabled after an empty page has been seen.
    pub fn can_go_forward(&self) -> bool {
        !self.books.is_empty()
    }

    /// Issue a fetch for the current cursor.
    pub fn load(&mut self) -> PendingFetch {
        self.issue()
    }

    /// Jump to `cursor`, as when the location is edited, and fetch it.
    pub fn jump_to(&mut self, cursor: PageCursor) -> PendingFetch {
        self.cursor = cursor;
        self.issue()
    }

    /// Step forward one page. Returns `None` while forward is disabled.
    pub fn forward(&mut self) -> Option<PendingFetch> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor = self.cursor.next();
        Some(self.issue())
    }

    /// Step back one page, clearing any error text. Returns `None` on page
    /// zero.
    pub fn backward(&mut self) -> Option<PendingFetch> {
        let previous = self.cursor.previous()?;
        self.cursor = previous;
        self.error = None;
        Some(self.issue())
    }

    /// Apply the result of `pending`.
    ///
    /// Results for anything but the latest issued fetch are discarded.
    pub fn complete(
        &mut self,
        pending: PendingFetch,
        result: Result<Vec<Book>, Error>,
    ) -> FetchOutcome {
        if pending.tag.0 != self.last_issued {
            debug!(
                tag = pending.tag.0,
                latest = self.last_issued,
                "discarding stale listing response"
            );
            return FetchOutcome::Stale;
        }
        match result {
            Ok(books) => {
                if books.is_empty() {
                    self.error = Some(NO_MORE_BOOKS.to_owned());
                }
                info!(
                    page = self.cursor.page(),
                    count = books.len(),
                    "listing replaced"
                );
                self.books = books;
                FetchOutcome::Replaced
            }
            Err(err) => {
                info!(page = self.cursor.page(), error = %err, "listing fetch failed");
                self.error = Some(err.message().to_owned());
                FetchOutcome::Failed
            }
        }
    }

    fn issue(&mut self) -> PendingFetch {
        self.last_issued += 1;
        PendingFetch {
            tag: RequestTag(self.last_issued),
            window: self.cursor.window(),
        }
    }
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new(PageCursor::default())
    }
}

/// Runs pending listing fetches against the catalogue.
#[derive(Clone)]
pub struct ListingFetcher<C> {
    catalogue: Arc<C>,
}

impl<C> ListingFetcher<C>
where
    C: BookCatalogue,
{
    /// Create a fetcher over `catalogue`.
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }

    /// Fetch the records `pending` asks for without touching any state.
    pub async fn fetch(&self, pending: PendingFetch) -> Result<Vec<Book>, Error> {
        self.catalogue
            .list_books(pending.window())
            .await
            .map_err(Error::from)
    }

    /// Fetch and apply in one step.
    pub async fn run(&self, state: &mut ListingState, pending: PendingFetch) -> FetchOutcome {
        let result = self.fetch(pending).await;
        state.complete(pending, result)
    }
}
