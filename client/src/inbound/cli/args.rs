//! Command-line surface of `carbon`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{BookId, BookPatch, NewBook};

/// `carbon` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "carbon",
    about = "Browse and administer the carbon library from the terminal",
    version
)]
pub struct Cli {
    /// Keep tokens and the listing location in memory only.
    #[arg(long, global = true)]
    pub ephemeral: bool,
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and store the issued tokens.
    Login(LoginArgs),
    /// Forget stored tokens.
    Logout,
    /// Show the signed-in user and available admin actions.
    Whoami,
    /// Browse and maintain books.
    #[command(subcommand)]
    Books(BooksCommand),
    /// Register and update accounts.
    #[command(subcommand)]
    Users(UsersCommand),
}

impl Command {
    /// Whether the stored session should be restored before running.
    pub fn restores_session(&self) -> bool {
        !matches!(self, Self::Login(_) | Self::Logout)
    }
}

/// Login form.
#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    /// Account email.
    #[arg(long)]
    pub email: String,
    /// Account password.
    #[arg(long)]
    pub password: String,
    /// Location to continue at after signing in.
    #[arg(long)]
    pub from: Option<String>,
}

/// Book commands.
#[derive(Debug, Clone, Subcommand)]
pub enum BooksCommand {
    /// Show a page of books. Without options the last location is reused.
    List(ListArgs),
    /// Step to the next page.
    Next,
    /// Step to the previous page.
    Prev,
    /// Show one book.
    Show {
        /// Book id.
        id: BookId,
    },
    /// Print a download link for a book's PDF.
    Pdf {
        /// Book id.
        id: BookId,
    },
    /// Table of the first fifty books.
    Repository,
    /// Create a book from form values.
    Create(CreateBookArgs),
    /// Create a book by ISBN lookup.
    CreateIsbn {
        /// ISBN to look up.
        isbn: String,
    },
    /// Change selected fields of a book.
    Update(UpdateBookArgs),
    /// Replace a book's cover with a JPEG file.
    Cover {
        /// Book id.
        id: BookId,
        /// JPEG file to upload.
        path: PathBuf,
    },
    /// Attach a PDF file to a book.
    UploadPdf {
        /// Book id.
        id: BookId,
        /// PDF file to upload.
        path: PathBuf,
    },
    /// Delete a book.
    Delete {
        /// Book id.
        id: BookId,
    },
}

/// Listing location options.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Location query such as `page=2&limit=10&skip=20`.
    #[arg(long, conflicts_with_all = ["page", "limit", "skip"])]
    pub location: Option<String>,
    /// Zero-based page number.
    #[arg(long)]
    pub page: Option<u32>,
    /// Books per page.
    #[arg(long)]
    pub limit: Option<u32>,
    /// Offset of the first book.
    #[arg(long)]
    pub skip: Option<u32>,
}

impl ListArgs {
    /// Whether any location option was given.
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.page.is_none() && self.limit.is_none() && self.skip.is_none()
    }
}

/// Optional book fields shared by create and update.
#[derive(Debug, Clone, Default, Args)]
pub struct BookFields {
    /// ISBN.
    #[arg(long)]
    pub isbn: Option<String>,
    /// Edition.
    #[arg(long)]
    pub edition: Option<String>,
    /// Publisher.
    #[arg(long)]
    pub publisher: Option<String>,
    /// Publication date as free text.
    #[arg(long)]
    pub publish_date: Option<String>,
    /// Place of publication.
    #[arg(long)]
    pub publish_place: Option<String>,
    /// Page count.
    #[arg(long)]
    pub number_of_pages: Option<u32>,
    /// Description.
    #[arg(long)]
    pub description: Option<String>,
    /// Language.
    #[arg(long)]
    pub language: Option<String>,
    /// Library of Congress control number.
    #[arg(long)]
    pub lccn: Option<String>,
    /// Subtitle.
    #[arg(long)]
    pub subtitle: Option<String>,
    /// Subjects.
    #[arg(long)]
    pub subjects: Option<String>,
}

/// Create form.
#[derive(Debug, Clone, Args)]
pub struct CreateBookArgs {
    /// Title.
    #[arg(long)]
    pub title: String,
    /// Author.
    #[arg(long)]
    pub author: String,
    #[command(flatten)]
    pub fields: BookFields,
}

impl From<CreateBookArgs> for NewBook {
    fn from(value: CreateBookArgs) -> Self {
        let fields = value.fields;
        Self {
            title: value.title,
            author: Some(value.author),
            isbn: non_blank(fields.isbn),
            edition: non_blank(fields.edition),
            publisher: non_blank(fields.publisher),
            publish_date: non_blank(fields.publish_date),
            publish_place: non_blank(fields.publish_place),
            number_of_pages: fields.number_of_pages,
            description: non_blank(fields.description),
            language: non_blank(fields.language),
            lccn: non_blank(fields.lccn),
            subtitle: non_blank(fields.subtitle),
            subjects: non_blank(fields.subjects),
        }
    }
}

/// Update form. Only the given fields are sent.
#[derive(Debug, Clone, Args)]
pub struct UpdateBookArgs {
    /// Book id.
    pub id: BookId,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New author.
    #[arg(long)]
    pub author: Option<String>,
    #[command(flatten)]
    pub fields: BookFields,
}

impl UpdateBookArgs {
    /// Patch holding the non-blank fields.
    pub fn patch(&self) -> BookPatch {
        let fields = self.fields.clone();
        BookPatch {
            title: non_blank(self.title.clone()),
            author: non_blank(self.author.clone()),
            isbn: non_blank(fields.isbn),
            edition: non_blank(fields.edition),
            publisher: non_blank(fields.publisher),
            publish_date: non_blank(fields.publish_date),
            publish_place: non_blank(fields.publish_place),
            number_of_pages: fields.number_of_pages,
            description: non_blank(fields.description),
            language: non_blank(fields.language),
            lccn: non_blank(fields.lccn),
            subtitle: non_blank(fields.subtitle),
            subjects: non_blank(fields.subjects),
        }
    }
}

/// User commands.
#[derive(Debug, Clone, Subcommand)]
pub enum UsersCommand {
    /// Register an account.
    Create {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Display name.
        #[arg(long)]
        name: String,
        /// Age in years.
        #[arg(long)]
        age: Option<u32>,
        /// Password.
        #[arg(long)]
        password: String,
    },
    /// Change selected fields of an account.
    Update {
        /// Email of the account to change.
        target: String,
        /// New email.
        #[arg(long)]
        email: Option<String>,
        /// New display name.
        #[arg(long)]
        name: Option<String>,
        /// New age.
        #[arg(long)]
        age: Option<u32>,
        /// New password.
        #[arg(long)]
        password: Option<String>,
    },
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
