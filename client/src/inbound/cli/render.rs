//! Plain-text rendering of view models.

use crate::domain::{
    Book, BookLink, ListingState, SessionState, admin_actions, book_update_path,
};

/// Render the signed-in user, or a hint to sign in.
pub fn profile(session: &SessionState) -> String {
    if !session.is_authenticated() {
        return "Not signed in. Use `carbon login`.".to_owned();
    }
    let email = session.email().unwrap_or("(unknown email)");
    let scope = session.scope().map_or("(no scope)", |scope| scope.as_str());
    let mut lines = vec![format!("{} [{scope}]", email.to_uppercase())];
    lines.extend(
        admin_actions(session)
            .iter()
            .map(|action| format!("  {} -> {}", action.label(), action.path())),
    );
    lines.join("\n")
}

/// Render a listing page with navigation controls and the error line.
pub fn listing(state: &ListingState, session: &SessionState, placeholder: &str) -> String {
    let mut lines = Vec::new();
    for book in state.books() {
        let link = BookLink::for_book(session, book.id);
        lines.push(format!("{:>5}  {}", book.id, book.title.to_uppercase()));
        lines.push(format!(
            "       {}",
            book.author.as_deref().unwrap_or_default().to_uppercase()
        ));
        lines.push(format!(
            "       cover: {}",
            describe_cover(&book.cover_source(placeholder))
        ));
        lines.push(match link.return_to() {
            Some(from) => format!("       open: {} (then {from})", link.target()),
            None => format!("       open: {}", link.target()),
        });
        if let Some(path) = book_update_path(session, book.id) {
            lines.push(format!("       update: {path}"));
        }
    }
    let back = if state.can_go_back() { "<" } else { "-" };
    let forward = if state.can_go_forward() { ">" } else { "-" };
    lines.push(format!("[{back}] {} [{forward}]", state.cursor().page()));
    lines.push(format!("location: {}", state.location()));
    if let Some(error) = state.error() {
        lines.push(error.to_owned());
    }
    lines.join("\n")
}

/// Render the detail view of one book.
pub fn book(book: &Book, session: &SessionState, placeholder: &str) -> String {
    let mut lines = vec![book.title.to_uppercase()];
    if let Some(subtitle) = &book.subtitle {
        lines.push(subtitle.clone());
    }
    let rows = [
        ("author", book.author.clone()),
        ("isbn", book.isbn.clone()),
        ("edition", book.edition.clone()),
        ("publisher", book.publisher.clone()),
        ("published", book.publish_date.clone()),
        ("place", book.publish_place.clone()),
        ("pages", book.number_of_pages.map(|pages| pages.to_string())),
        ("language", book.language.clone()),
        ("lccn", book.lccn.clone()),
        ("subjects", book.subjects.clone()),
        ("added", book.added_date.map(|date| date.to_string())),
    ];
    lines.extend(
        rows.into_iter()
            .filter_map(|(label, value)| value.map(|value| format!("{label:>10}: {value}"))),
    );
    let status = if book.is_borrowed { "borrowed" } else { "available" };
    lines.push(format!("{:>10}: {status}", "status"));
    lines.push(format!(
        "{:>10}: {}",
        "cover",
        describe_cover(&book.cover_source(placeholder))
    ));
    if let Some(description) = &book.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    if let Some(path) = book_update_path(session, book.id) {
        lines.push(String::new());
        lines.push(format!("update: {path}"));
    }
    lines.join("\n")
}

/// Render the admin repository table.
pub fn repository(books: &[Book]) -> String {
    let mut lines = vec![format!(
        "{:>5}  {:<40}  {:<24}  {:<13}  borrowed",
        "id", "title", "author", "isbn"
    )];
    lines.extend(books.iter().map(|book| {
        format!(
            "{:>5}  {:<40}  {:<24}  {:<13}  {}",
            book.id,
            book.title,
            book.author.as_deref().unwrap_or_default(),
            book.isbn.as_deref().unwrap_or_default(),
            if book.is_borrowed { "yes" } else { "no" }
        )
    }));
    lines.join("\n")
}

fn describe_cover(source: &str) -> &str {
    if source.starts_with("data:") {
        "embedded JPEG"
    } else if source.is_empty() {
        "none"
    } else {
        source
    }
}
