//! relbin - install versioned release binaries side by side
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Resolves the latest release of a repository (or takes an explicit
//! version), downloads the archive published for the host platform and
//! unpacks it into its own directory.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.relbin/                 # or $RELBIN_HOME
//! ├── config.toml            # optional overrides
//! └── bin/
//!     ├── subnet-evm-v0.5.10/
//!     └── subnet-evm-v0.6.0/
//! ```

pub mod cmd;
pub mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use relbin_core::{InstallError, Installer, Settings, Stage};
use relbin_schema::{RepoName, Version};

use crate::ui::ConsoleReporter;

#[derive(Debug, Parser)]
#[command(name = "relbin")]
#[command(author, version = env!("RELBIN_VERSION"), about = "relbin - install versioned release binaries")]
pub struct Cli {
    /// Only print results and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the per-version installs
    #[arg(long, global = true, env = "RELBIN_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Organisation publishing the releases
    #[arg(long, global = true, env = "RELBIN_ORG")]
    pub org: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a release (the latest one unless --version is given)
    Install {
        /// Repository name, e.g. subnet-evm
        repo: RepoName,
        /// Release tag to install, e.g. v1.2.3
        #[arg(long)]
        version: Option<Version>,
        /// Reinstall even if the version is already present
        #[arg(short, long)]
        force: bool,
    },
    /// Print the latest published version
    Latest {
        /// Repository name
        repo: RepoName,
    },
    /// List installed versions
    List {
        /// Repository name
        repo: RepoName,
    },
    /// Print the installation directory of a version
    Path {
        /// Repository name
        repo: RepoName,
        /// Release tag
        version: Version,
    },
    /// Delete an installed version
    Remove {
        /// Repository name
        repo: RepoName,
        /// Release tag
        version: Version,
    },
}

/// Build the installer for this invocation: settings from
/// `$RELBIN_HOME/config.toml`, then command-line overrides.
pub fn installer(cli: &Cli) -> Result<Installer> {
    let mut settings = Settings::load_default()?;
    if let Some(bin_dir) = &cli.bin_dir {
        settings.bin_dir.clone_from(bin_dir);
    }
    if let Some(org) = &cli.org {
        settings.org.clone_from(org);
    }

    let client = settings.http_client()?;
    let reporter = Arc::new(ConsoleReporter::new(cli.quiet));
    Ok(Installer::new(client, settings, reporter))
}

/// What the operator can do about a failed install.
pub fn remediation(err: &anyhow::Error) -> Option<&'static str> {
    let err = err.downcast_ref::<InstallError>()?;
    Some(match (err, err.stage()) {
        (InstallError::Plan { .. }, _) => "no archives are published for this platform",
        (InstallError::Locked { .. }, _) => {
            "wait for the other install to finish, or delete the lock file if none is running"
        }
        (InstallError::Remove { .. }, _) => "run `relbin list <repo>` to see installed versions",
        (_, Stage::Version) => "check the repository name, or pass --version to skip the release feed",
        (_, Stage::Download) => "check that the version exists and the download host is reachable",
        (_, Stage::Install) => "check that the binaries directory is writable (see --bin-dir)",
    })
}
