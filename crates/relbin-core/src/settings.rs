//! Installer configuration.
//!
//! Settings come from an optional `config.toml` in the relbin home directory.
//! Every key is optional; a missing file means "all defaults".
//!
//! ```toml
//! org = "ava-labs"
//! download_host = "https://github.com"
//! api_host = "https://api.github.com"
//! timeout_secs = 300
//! bin_dir = "/opt/relbin/bin"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use relbin_schema::RepoName;
use serde::Deserialize;
use thiserror::Error;

use crate::paths;
use crate::plan::ReleaseSource;

/// Organisation that publishes the release archives by default.
pub const DEFAULT_ORG: &str = "ava-labs";
/// Host serving release downloads by default.
pub const DEFAULT_DOWNLOAD_HOST: &str = "https://github.com";
/// Host serving the release feed API by default.
pub const DEFAULT_API_HOST: &str = "https://api.github.com";
/// Default whole-request HTTP timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Could not determine home directory. Set {} to override.", paths::HOME_ENV)]
    NoHome,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    org: Option<String>,
    download_host: Option<String>,
    api_host: Option<String>,
    timeout_secs: Option<u64>,
    bin_dir: Option<PathBuf>,
}

/// Resolved configuration for one installer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Organisation owning the release repositories.
    pub org: String,
    /// Base URL for archive downloads (`<host>/<org>/<repo>/releases/download/...`).
    pub download_host: String,
    /// Base URL for the release feed (`<host>/repos/<org>/<repo>/releases/latest`).
    pub api_host: String,
    /// Whole-request timeout applied to every HTTP call.
    pub timeout: Duration,
    /// Root under which `<repo>-<version>` directories are created.
    pub bin_dir: PathBuf,
}

impl Settings {
    /// Default settings installing into `bin_dir`.
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            org: DEFAULT_ORG.to_string(),
            download_host: DEFAULT_DOWNLOAD_HOST.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bin_dir: bin_dir.into(),
        }
    }

    /// Load `<home>/config.toml`, falling back to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] if the file exists but cannot be read,
    /// or [`SettingsError::Parse`] if it is not valid settings TOML.
    pub fn load(home: &Path) -> Result<Self, SettingsError> {
        let path = paths::config_path(home);
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<ConfigFile>(&content)
                .map_err(|source| SettingsError::Parse { path, source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ConfigFile::default(),
            Err(source) => return Err(SettingsError::Read { path, source }),
        };

        let defaults = Self::new(paths::default_bin_dir(home));
        Ok(Self {
            org: file.org.unwrap_or(defaults.org),
            download_host: file.download_host.unwrap_or(defaults.download_host),
            api_host: file.api_host.unwrap_or(defaults.api_host),
            timeout: file
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
            bin_dir: file.bin_dir.unwrap_or(defaults.bin_dir),
        })
    }

    /// Load settings from the resolved relbin home directory.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoHome`] if no home directory can be found,
    /// otherwise whatever [`Settings::load`] returns.
    pub fn load_default() -> Result<Self, SettingsError> {
        let home = paths::try_relbin_home().ok_or(SettingsError::NoHome)?;
        Self::load(&home)
    }

    /// Where release archives are downloaded from.
    pub fn release_source(&self) -> ReleaseSource {
        ReleaseSource::new(&self.download_host, &self.org)
    }

    /// Release feed endpoint describing the latest release of `repo`.
    pub fn feed_url(&self, repo: &RepoName) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_host.trim_end_matches('/'),
            self.org,
            repo
        )
    }

    /// Build the HTTP client shared by the resolver and the fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Client`] if the TLS backend cannot be initialised.
    pub fn http_client(&self) -> Result<reqwest::Client, SettingsError> {
        Ok(reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(self.timeout)
            .build()?)
    }
}
