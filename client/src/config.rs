//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `CARBON_*` environment variables or an OrthoConfig
//! configuration file. The API base URL and the login URL are required;
//! startup fails without them.

use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use pagination::DEFAULT_LIMIT;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const STATE_DIR_NAME: &str = ".carbon-library";

/// Raw settings as loaded from the environment and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CARBON")]
pub struct ClientSettings {
    /// Base URL of the library REST API, e.g. `http://localhost:8000/`.
    pub api_base_url: Option<String>,
    /// Absolute URL of the login endpoint.
    pub login_url: Option<String>,
    /// Directory holding local storage. Defaults to `$HOME/.carbon-library`.
    pub state_dir: Option<PathBuf>,
    /// Books per listing page.
    #[ortho_config(default = 10)]
    pub page_size: u32,
    /// Per-request timeout in seconds. Unset leaves requests unbounded.
    pub request_timeout_secs: Option<u64>,
}

/// Reasons settings cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A required value was not provided.
    #[error("{name} is required (set {env})")]
    Missing {
        /// Setting name.
        name: &'static str,
        /// Environment variable that supplies it.
        env: &'static str,
    },
    /// A URL setting did not parse.
    #[error("{name} is not a valid URL: {message}")]
    InvalidUrl {
        /// Setting name.
        name: &'static str,
        /// Parser message.
        message: String,
    },
    /// No state directory was configured and `$HOME` is unset.
    #[error("state_dir is not set and HOME is unavailable")]
    NoStateDir,
    /// The state directory path is not valid UTF-8.
    #[error("state_dir must be valid UTF-8: {0}")]
    NonUtf8StateDir(String),
    /// `page_size` was zero.
    #[error("page_size must be at least 1")]
    ZeroPageSize,
}

/// Validated settings ready for wiring adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Base URL of the library REST API.
    pub api_base_url: Url,
    /// Login endpoint.
    pub login_url: Url,
    /// Local storage directory.
    pub state_dir: Utf8PathBuf,
    /// Books per listing page.
    pub page_size: u32,
    /// Per-request timeout.
    pub request_timeout: Option<Duration>,
}

impl ClientSettings {
    /// Validate the loaded values.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] for missing or malformed values.
    pub fn resolve(&self) -> Result<ResolvedSettings, SettingsError> {
        self.resolve_with_home(std::env::var_os("HOME").map(PathBuf::from))
    }

    fn resolve_with_home(&self, home: Option<PathBuf>) -> Result<ResolvedSettings, SettingsError> {
        let api_base_url = parse_url(
            "api_base_url",
            "CARBON_API_BASE_URL",
            self.api_base_url.as_deref(),
        )?;
        let login_url = parse_url("login_url", "CARBON_LOGIN_URL", self.login_url.as_deref())?;
        if self.page_size == 0 {
            return Err(SettingsError::ZeroPageSize);
        }
        let state_dir = match &self.state_dir {
            Some(dir) => dir.clone(),
            None => home.ok_or(SettingsError::NoStateDir)?.join(STATE_DIR_NAME),
        };
        let state_dir = Utf8PathBuf::from_path_buf(state_dir)
            .map_err(|path| SettingsError::NonUtf8StateDir(path.display().to_string()))?;

        Ok(ResolvedSettings {
            api_base_url,
            login_url,
            state_dir,
            page_size: self.page_size,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        })
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            login_url: None,
            state_dir: None,
            page_size: DEFAULT_LIMIT,
            request_timeout_secs: None,
        }
    }
}

fn parse_url(
    name: &'static str,
    env: &'static str,
    raw: Option<&str>,
) -> Result<Url, SettingsError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing { name, env })?;
    Url::parse(raw).map_err(|err| SettingsError::InvalidUrl {
        name,
        message: err.to_string(),
    })
}
