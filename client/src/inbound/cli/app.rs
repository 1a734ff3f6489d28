//! Command dispatch: wires the domain services to the parsed command and
//! renders the outcome as text.

use std::path::Path;
use std::sync::Arc;

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use pagination::PageCursor;
use tracing::warn;

use super::args::{BooksCommand, Command, ListArgs, LoginArgs, UsersCommand};
use super::render;
use crate::config::ResolvedSettings;
use crate::domain::ports::{Authenticator, BookCatalogue, LocalStorage, UserDirectory};
use crate::domain::{
    AdminAction, BookId, BookLink, CatalogueService, Error, FileUpload, ListingFetcher,
    ListingState, LoginForm, NewUser, SessionService, SessionState, UserAdminService, UserPatch,
    admin_actions,
};
use crate::outbound::http::{HttpAuthenticator, HttpBookCatalogue, HttpUserDirectory, RequestGateway};

/// Local storage key remembering the listing location between runs.
pub const LISTING_LOCATION_KEY: &str = "listing_location";

/// Driven ports the application runs against.
pub struct AppPorts<A, U, C> {
    /// Login endpoint.
    pub authenticator: Arc<A>,
    /// User endpoints.
    pub users: Arc<U>,
    /// Book endpoints.
    pub catalogue: Arc<C>,
    /// Token and location storage.
    pub storage: Arc<dyn LocalStorage>,
}

/// Application shell owning the session for one invocation.
pub struct App<A, U, C> {
    session: SessionState,
    page_size: u32,
    storage: Arc<dyn LocalStorage>,
    sessions: SessionService<A, U>,
    users: UserAdminService<U>,
    catalogue: CatalogueService<C>,
    listing: ListingFetcher<C>,
}

/// Application wired to the HTTP adapters.
pub type HttpApp = App<HttpAuthenticator, HttpUserDirectory, HttpBookCatalogue>;

impl HttpApp {
    /// Build the HTTP adapters around one shared gateway.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn connect(
        settings: &ResolvedSettings,
        storage: Arc<dyn LocalStorage>,
    ) -> Result<Self, reqwest::Error> {
        let gateway = Arc::new(RequestGateway::new(
            settings.api_base_url.clone(),
            settings.request_timeout,
            Arc::clone(&storage),
        )?);
        let ports = AppPorts {
            authenticator: Arc::new(HttpAuthenticator::new(
                Arc::clone(&gateway),
                settings.login_url.clone(),
            )),
            users: Arc::new(HttpUserDirectory::new(Arc::clone(&gateway))),
            catalogue: Arc::new(HttpBookCatalogue::new(gateway)),
            storage,
        };
        Ok(Self::new(ports, settings.page_size))
    }
}

impl<A, U, C> App<A, U, C>
where
    A: Authenticator,
    U: UserDirectory,
    C: BookCatalogue,
{
    /// Create an application over `ports`, signed out.
    pub fn new(ports: AppPorts<A, U, C>, page_size: u32) -> Self {
        let AppPorts {
            authenticator,
            users,
            catalogue,
            storage,
        } = ports;
        Self {
            session: SessionState::new(),
            page_size,
            sessions: SessionService::new(authenticator, Arc::clone(&users), Arc::clone(&storage)),
            users: UserAdminService::new(users),
            listing: ListingFetcher::new(Arc::clone(&catalogue)),
            catalogue: CatalogueService::new(catalogue),
            storage,
        }
    }

    /// Current session.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Run one command and return the text to print.
    ///
    /// A stored session that cannot be restored is not fatal: the command
    /// runs signed out and the reason is appended to the output.
    pub async fn run(&mut self, command: Command) -> Result<String, Error> {
        let mut notice = None;
        if command.restores_session() {
            if let Err(err) = self.sessions.restore(&mut self.session).await {
                warn!(error = %err, "stored session could not be restored");
                notice = Some(err);
            }
        }

        let output = match command {
            Command::Login(args) => self.login(args).await?,
            Command::Logout => {
                self.sessions.logout(&mut self.session)?;
                "Signed out.".to_owned()
            }
            Command::Whoami => render::profile(&self.session),
            Command::Books(books) => self.books(books).await?,
            Command::Users(users) => self.accounts(users).await?,
        };

        Ok(match notice {
            Some(err) => format!("{output}\n{}", err.message()),
            None => output,
        })
    }

    async fn login(&mut self, args: LoginArgs) -> Result<String, Error> {
        let target = self
            .sessions
            .login(
                &mut self.session,
                LoginForm {
                    email: &args.email,
                    password: &args.password,
                    from: args.from.as_deref(),
                },
            )
            .await?;
        // The tokens are stored by now; a failed profile fetch only means the
        // next command restores signed out.
        match self.sessions.load_profile(&mut self.session).await {
            Ok(profile) => Ok(format!("Signed in as {}.\nContinue at {target}", profile.email)),
            Err(err) => {
                warn!(error = %err, "profile unavailable after login");
                Ok(format!("Signed in.\nContinue at {target}\n{}", err.message()))
            }
        }
    }

    async fn books(&mut self, command: BooksCommand) -> Result<String, Error> {
        match command {
            BooksCommand::List(args) => {
                let cursor = if args.is_empty() {
                    self.stored_cursor()?
                } else {
                    self.cursor_from_args(&args)?
                };
                self.browse(cursor, None).await
            }
            BooksCommand::Next => self.browse(self.stored_cursor()?, Some(Step::Forward)).await,
            BooksCommand::Prev => self.browse(self.stored_cursor()?, Some(Step::Backward)).await,
            BooksCommand::Show { id } => {
                self.require_signed_in(id)?;
                let book = self.catalogue.book(id).await?;
                let placeholder = self.placeholder().await;
                Ok(render::book(&book, &self.session, &placeholder))
            }
            BooksCommand::Pdf { id } => {
                self.require_signed_in(id)?;
                let book = self.catalogue.book(id).await?;
                let link = self.catalogue.book_pdf(&book).await?;
                Ok(link.url.to_string())
            }
            BooksCommand::Repository => {
                self.require_admin(AdminAction::BookRepository)?;
                let books = self.catalogue.repository().await?;
                Ok(render::repository(&books))
            }
            BooksCommand::Create(args) => {
                self.require_admin(AdminAction::CreateBook)?;
                let created = self.catalogue.create(&args.into()).await?;
                Ok(format!("Created \"{}\".", created.title))
            }
            BooksCommand::CreateIsbn { isbn } => {
                self.require_admin(AdminAction::CreateBook)?;
                let created = self.catalogue.create_by_isbn(&isbn).await?;
                Ok(format!("Created \"{}\" from ISBN {isbn}.", created.title))
            }
            BooksCommand::Update(args) => {
                self.require_admin(AdminAction::UpdateBook)?;
                self.catalogue.update(args.id, &args.patch()).await?;
                Ok(format!("Updated book {}.", args.id))
            }
            BooksCommand::Cover { id, path } => {
                self.require_admin(AdminAction::UpdateBook)?;
                let (name, bytes) = read_file(&path)?;
                self.catalogue
                    .upload_cover(id, FileUpload::jpeg(name, bytes))
                    .await?;
                Ok(format!("Cover of book {id} replaced."))
            }
            BooksCommand::UploadPdf { id, path } => {
                self.require_admin(AdminAction::UpdateBook)?;
                let (name, bytes) = read_file(&path)?;
                self.catalogue
                    .upload_pdf(id, FileUpload::pdf(name, bytes))
                    .await?;
                Ok(format!("PDF attached to book {id}."))
            }
            BooksCommand::Delete { id } => {
                self.require_admin(AdminAction::UpdateBook)?;
                self.catalogue.delete(id).await?;
                Ok(format!("Deleted book {id}."))
            }
        }
    }

    async fn accounts(&self, command: UsersCommand) -> Result<String, Error> {
        match command {
            UsersCommand::Create {
                email,
                name,
                age,
                password,
            } => {
                let user = NewUser::try_new(&email, &name, age, &password)?;
                let account = self.users.create(&user).await?;
                Ok(format!("Created account for {}.", account.email))
            }
            UsersCommand::Update {
                target,
                email,
                name,
                age,
                password,
            } => {
                let patch = UserPatch::try_new(
                    email.as_deref(),
                    name.as_deref(),
                    age,
                    password.as_deref(),
                )?;
                self.users.update(&target, &patch).await?;
                Ok(format!("Updated {target}."))
            }
        }
    }

    async fn browse(&self, cursor: PageCursor, step: Option<Step>) -> Result<String, Error> {
        let mut state = ListingState::new(cursor);
        let pending = state.load();
        self.listing.run(&mut state, pending).await;

        let stepped = match step {
            Some(Step::Forward) => state.forward(),
            Some(Step::Backward) => state.backward(),
            None => None,
        };
        if let Some(pending) = stepped {
            self.listing.run(&mut state, pending).await;
        }

        self.storage
            .set_item(LISTING_LOCATION_KEY, &state.location())?;
        let placeholder = self.placeholder().await;
        Ok(render::listing(&state, &self.session, &placeholder))
    }

    fn stored_cursor(&self) -> Result<PageCursor, Error> {
        let Some(location) = self.storage.get_item(LISTING_LOCATION_KEY)? else {
            return Ok(PageCursor::first(self.page_size));
        };
        Ok(PageCursor::from_query(&location).unwrap_or_else(|err| {
            warn!(%location, error = %err, "ignoring unreadable listing location");
            PageCursor::first(self.page_size)
        }))
    }

    fn cursor_from_args(&self, args: &ListArgs) -> Result<PageCursor, Error> {
        if let Some(location) = &args.location {
            return PageCursor::from_query(location)
                .map_err(|err| Error::invalid_request(err.to_string()));
        }
        let page = args.page.unwrap_or(0);
        let limit = args.limit.unwrap_or(self.page_size);
        let skip = args.skip.unwrap_or_else(|| page.saturating_mul(limit));
        PageCursor::from_parts(page, limit, skip).map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn placeholder(&self) -> String {
        match self.catalogue.placeholder_cover().await {
            Ok(link) => link.url.to_string(),
            Err(err) => {
                warn!(error = %err, "placeholder cover unavailable");
                String::new()
            }
        }
    }

    fn require_signed_in(&self, id: BookId) -> Result<(), Error> {
        match BookLink::for_book(&self.session, id).return_to() {
            Some(from) => Err(Error::unauthorized(format!(
                "sign in to open this book: carbon login --from {from}"
            ))),
            None => Ok(()),
        }
    }

    fn require_admin(&self, action: AdminAction) -> Result<(), Error> {
        if admin_actions(&self.session).contains(&action) {
            Ok(())
        } else {
            Err(Error::unauthorized(format!(
                "{} requires the superuser scope",
                action.label()
            )))
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Forward,
    Backward,
}

fn read_file(path: &Path) -> Result<(String, Vec<u8>), Error> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| Error::invalid_request(format!("{} is not a file", path.display())))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
        Error::invalid_request(format!("opening {}: {err}", parent.display()))
    })?;
    let bytes = dir
        .read(name)
        .map_err(|err| Error::invalid_request(format!("reading {}: {err}", path.display())))?;
    Ok((name.to_string_lossy().into_owned(), bytes))
}
