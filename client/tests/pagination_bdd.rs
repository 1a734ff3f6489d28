//! Behaviour tests for the paginated book listing.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

#[allow(dead_code)]
#[path = "support/doubles.rs"]
mod doubles;

use std::cell::RefCell;
use std::sync::Arc;

use carbon_client::domain::ports::RemoteError;
use carbon_client::domain::{FetchOutcome, ListingFetcher, ListingState, PendingFetch};
use doubles::{StubCatalogue, library};
use pagination::PageCursor;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

struct PaginationWorld {
    runtime: Runtime,
    catalogue: RefCell<Arc<StubCatalogue>>,
    state: RefCell<ListingState>,
    late_outcome: RefCell<Option<FetchOutcome>>,
}

impl PaginationWorld {
    fn new() -> Self {
        Self {
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime"),
            catalogue: RefCell::new(Arc::new(StubCatalogue::new(Vec::new()))),
            state: RefCell::new(ListingState::default()),
            late_outcome: RefCell::new(None),
        }
    }

    fn fetcher(&self) -> ListingFetcher<StubCatalogue> {
        ListingFetcher::new(self.catalogue.borrow().clone())
    }

    fn run(&self, pending: PendingFetch) -> FetchOutcome {
        let fetcher = self.fetcher();
        let mut state = self.state.borrow_mut();
        self.runtime.block_on(fetcher.run(&mut state, pending))
    }

    fn shown_ids(&self) -> Vec<i64> {
        self.state
            .borrow()
            .books()
            .iter()
            .map(|book| book.id.get())
            .collect()
    }
}

#[fixture]
fn world() -> PaginationWorld {
    PaginationWorld::new()
}

#[given("a library of {count} books listed {limit} per page")]
fn a_library(world: &PaginationWorld, count: i64, limit: u32) {
    *world.catalogue.borrow_mut() = Arc::new(StubCatalogue::new(library(count)));
    *world.state.borrow_mut() = ListingState::new(PageCursor::first(limit));
}

#[when("the listing loads")]
fn the_listing_loads(world: &PaginationWorld) {
    let pending = world.state.borrow_mut().load();
    assert_eq!(world.run(pending), FetchOutcome::Replaced);
}

#[when("the reader steps forward")]
fn the_reader_steps_forward(world: &PaginationWorld) {
    let pending = world
        .state
        .borrow_mut()
        .forward()
        .expect("forward navigation is enabled");
    world.run(pending);
}

#[when("the reader steps backward")]
fn the_reader_steps_backward(world: &PaginationWorld) {
    let pending = world
        .state
        .borrow_mut()
        .backward()
        .expect("backward navigation is enabled");
    world.run(pending);
}

#[when("the catalogue starts failing with status {status}")]
fn the_catalogue_fails(world: &PaginationWorld, status: u16) {
    world
        .catalogue
        .borrow()
        .fail_with(Some(RemoteError::status(status)));
}

#[when("the reader steps forward twice before the first response arrives")]
fn two_forward_steps_race(world: &PaginationWorld) {
    let (first, second) = {
        let mut state = world.state.borrow_mut();
        let first = state.forward().expect("first step");
        let second = state.forward().expect("second step");
        (first, second)
    };
    let fetcher = world.fetcher();
    let (first_result, second_result) = world
        .runtime
        .block_on(async { (fetcher.fetch(first).await, fetcher.fetch(second).await) });

    let mut state = world.state.borrow_mut();
    assert_eq!(state.complete(second, second_result), FetchOutcome::Replaced);
    *world.late_outcome.borrow_mut() = Some(state.complete(first, first_result));
}

#[then("the listing shows books {first} to {last}")]
fn the_listing_shows(world: &PaginationWorld, first: i64, last: i64) {
    assert_eq!(world.shown_ids(), (first..=last).collect::<Vec<_>>());
}

#[then("the listing is empty")]
fn the_listing_is_empty(world: &PaginationWorld) {
    assert!(world.shown_ids().is_empty());
}

#[then("backward navigation is disabled")]
fn backward_disabled(world: &PaginationWorld) {
    assert!(!world.state.borrow().can_go_back());
}

#[then("forward navigation is disabled")]
fn forward_disabled(world: &PaginationWorld) {
    let mut state = world.state.borrow_mut();
    assert!(!state.can_go_forward());
    assert!(state.forward().is_none());
}

#[then("the location is \"{location}\"")]
fn the_location_is(world: &PaginationWorld, location: String) {
    assert_eq!(world.state.borrow().location(), location);
}

#[then("the listing error is \"{message}\"")]
fn the_listing_error_is(world: &PaginationWorld, message: String) {
    assert_eq!(world.state.borrow().error(), Some(message.as_str()));
}

#[then("the catalogue saw skips \"{skips}\"")]
fn the_catalogue_saw_skips(world: &PaginationWorld, skips: String) {
    let seen: Vec<String> = world
        .catalogue
        .borrow()
        .windows()
        .iter()
        .map(|window| window.skip.to_string())
        .collect();
    assert_eq!(seen.join(","), skips);
}

#[then("the earlier response is discarded")]
fn the_earlier_response_is_discarded(world: &PaginationWorld) {
    assert_eq!(*world.late_outcome.borrow(), Some(FetchOutcome::Stale));
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "The first page loads the first window"
)]
fn first_page_loads_the_first_window(world: PaginationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "Stepping forward and back moves one window at a time"
)]
fn stepping_moves_one_window_at_a_time(world: PaginationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "Stepping past the last book reports there are no more"
)]
fn stepping_past_the_last_book_reports_no_more(world: PaginationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "A failed fetch keeps the previous page visible"
)]
fn failed_fetch_keeps_the_previous_page(world: PaginationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "A response to a superseded request is discarded"
)]
fn superseded_response_is_discarded(world: PaginationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "An empty first page disables forward and explains why"
)]
fn empty_first_page_disables_forward(world: PaginationWorld) {
    drop(world);
}
