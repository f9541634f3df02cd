//! Install orchestration.
//!
//! [`Installer`] groups the state one invocation needs (HTTP client,
//! settings, reporter, host platform) and runs the pipeline strictly in
//! order: resolve -> plan -> fetch -> lock -> extract. Nothing is retried.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use relbin_schema::{PlatformDescriptor, RepoName, Version};
use thiserror::Error;
use tracing::{debug, info};

use crate::install_dir::{self, RemoveError};
use crate::io::download::{self, FetchError};
use crate::io::extract::{self, ExtractError, InstallMode, InstallOutcome};
use crate::io::release::{self, ResolveError};
use crate::lock::{InstallLock, LockError};
use crate::plan::{self, PlanError};
use crate::reporter::Reporter;
use crate::settings::Settings;

/// Which step of the pipeline failed; remediation differs for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Version,
    Download,
    Install,
}

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("Could not determine a version of {repo}: {source}")]
    Version { repo: RepoName, source: ResolveError },

    #[error("Could not download {repo} {version}: {source}")]
    Plan {
        repo: RepoName,
        version: Version,
        source: PlanError,
    },

    #[error("Could not download {repo} {version}: {source}")]
    Download {
        repo: RepoName,
        version: Version,
        source: FetchError,
    },

    #[error("Could not install {repo} {version}: {source}")]
    Locked {
        repo: RepoName,
        version: Version,
        source: LockError,
    },

    #[error("Could not install {repo} {version} into {}: {source}", path.display())]
    Install {
        repo: RepoName,
        version: Version,
        path: PathBuf,
        source: ExtractError,
    },

    #[error("Could not install {repo} {version}: extraction task failed: {reason}")]
    Task {
        repo: RepoName,
        version: Version,
        reason: String,
    },

    #[error("Could not remove {repo} {version}: {source}")]
    Remove {
        repo: RepoName,
        version: Version,
        source: RemoveError,
    },
}

impl InstallError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Version { .. } => Stage::Version,
            Self::Plan { .. } | Self::Download { .. } => Stage::Download,
            Self::Locked { .. } | Self::Install { .. } | Self::Task { .. } | Self::Remove { .. } => {
                Stage::Install
            }
        }
    }
}

/// A version present on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installed {
    pub repository: RepoName,
    pub version: Version,
    pub path: PathBuf,
    pub outcome: InstallOutcome,
}

/// Groups the collaborators of one installation invocation.
#[derive(Clone)]
pub struct Installer {
    client: reqwest::Client,
    settings: Settings,
    reporter: Arc<dyn Reporter>,
    platform: PlatformDescriptor,
}

impl fmt::Debug for Installer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installer")
            .field("settings", &self.settings)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl Installer {
    pub fn new(client: reqwest::Client, settings: Settings, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            client,
            settings,
            reporter,
            platform: PlatformDescriptor::current(),
        }
    }

    /// Plan downloads for `platform` instead of the running host.
    pub fn with_platform(mut self, platform: PlatformDescriptor) -> Self {
        self.platform = platform;
        self
    }

    /// Installation directory for `repo` at `version`.
    pub fn install_path(&self, repo: &RepoName, version: &Version) -> PathBuf {
        install_dir::install_path(&self.settings.bin_dir, repo, version)
    }

    /// Query the release feed for the latest version of `repo`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Version`] wrapping the resolver failure.
    pub async fn latest_version(&self, repo: &RepoName) -> Result<Version, InstallError> {
        let feed_url = self.settings.feed_url(repo);
        self.reporter.resolving(repo, &feed_url);
        release::resolve_latest(&self.client, &feed_url)
            .await
            .map_err(|source| InstallError::Version {
                repo: repo.clone(),
                source,
            })
    }

    /// Install `repo` at `version`, or at the latest release when `None`.
    ///
    /// An already populated installation directory short-circuits before any
    /// download unless `mode` is [`InstallMode::Force`].
    ///
    /// # Errors
    ///
    /// See [`InstallError`]; [`InstallError::stage`] tells which step failed.
    pub async fn install(
        &self,
        repo: &RepoName,
        version: Option<Version>,
        mode: InstallMode,
    ) -> Result<Installed, InstallError> {
        let version = match version {
            Some(v) => v,
            None => match self.latest_version(repo).await {
                Ok(v) => v,
                Err(e) => {
                    self.reporter.failed(repo, None, &e.to_string());
                    return Err(e);
                }
            },
        };

        match self.install_version(repo, &version, mode).await {
            Ok(installed) => {
                let detail = if installed.outcome.is_fresh() {
                    "installed"
                } else {
                    "already installed"
                };
                self.reporter.done(repo, &version, detail);
                Ok(installed)
            }
            Err(e) => {
                self.reporter.failed(repo, Some(&version), &e.to_string());
                Err(e)
            }
        }
    }

    async fn install_version(
        &self,
        repo: &RepoName,
        version: &Version,
        mode: InstallMode,
    ) -> Result<Installed, InstallError> {
        let path = self.install_path(repo, version);
        let installed = |outcome| Installed {
            repository: repo.clone(),
            version: version.clone(),
            path: path.clone(),
            outcome,
        };

        if mode == InstallMode::SkipIfPresent && install_dir::is_populated(&path) {
            info!(%repo, %version, path = %path.display(), "already installed, skipping download");
            return Ok(installed(InstallOutcome::AlreadyInstalled));
        }

        let target = plan::build_download_url(
            &self.settings.release_source(),
            repo,
            version,
            &self.platform,
        )
        .map_err(|source| InstallError::Plan {
            repo: repo.clone(),
            version: version.clone(),
            source,
        })?;

        self.reporter.downloading(repo, version, &target.url);
        let archive = download::fetch_archive(&self.client, &target.url)
            .await
            .map_err(|source| InstallError::Download {
                repo: repo.clone(),
                version: version.clone(),
                source,
            })?;

        let _lock = InstallLock::acquire(&path).map_err(|source| InstallError::Locked {
            repo: repo.clone(),
            version: version.clone(),
            source,
        })?;

        debug!(%repo, %version, bytes = archive.len(), "installing archive");
        self.reporter.extracting(repo, version, archive.len() as u64);

        let dest = path.clone();
        let outcome =
            tokio::task::spawn_blocking(move || extract::install_archive(&archive, &dest, mode))
                .await
                .map_err(|e| InstallError::Task {
                    repo: repo.clone(),
                    version: version.clone(),
                    reason: e.to_string(),
                })?
                .map_err(|source| InstallError::Install {
                    repo: repo.clone(),
                    version: version.clone(),
                    path: path.clone(),
                    source,
                })?;

        Ok(installed(outcome))
    }

    /// Installed versions of `repo`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the binaries directory cannot be read.
    pub fn installed_versions(&self, repo: &RepoName) -> std::io::Result<Vec<Version>> {
        install_dir::list_installed(&self.settings.bin_dir, repo)
    }

    /// Remove the installation of `repo` at `version`.
    ///
    /// Takes the install lock so a concurrent install of the same version is
    /// not deleted out from under itself.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Locked`] if an install is in progress, or
    /// [`InstallError::Remove`] if the version is absent or cannot be deleted.
    pub fn remove(&self, repo: &RepoName, version: &Version) -> Result<PathBuf, InstallError> {
        let path = self.install_path(repo, version);
        let _lock = InstallLock::acquire(&path).map_err(|source| InstallError::Locked {
            repo: repo.clone(),
            version: version.clone(),
            source,
        })?;
        install_dir::remove_install(&self.settings.bin_dir, repo, version).map_err(|source| {
            InstallError::Remove {
                repo: repo.clone(),
                version: version.clone(),
                source,
            }
        })
    }

    /// True if `repo` at `version` is installed (directory present and non-empty).
    pub fn is_installed(&self, repo: &RepoName, version: &Version) -> bool {
        install_dir::is_populated(&self.install_path(repo, version))
    }

    pub fn bin_dir(&self) -> &Path {
        &self.settings.bin_dir
    }
}
