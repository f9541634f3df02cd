//! Path command
use anyhow::{Result, bail};
use relbin_core::Installer;
use relbin_schema::{RepoName, Version};

/// Print where `repo` at `version` is installed. Fails if it is not.
pub fn path(installer: &Installer, repo: &RepoName, version: &Version) -> Result<()> {
    if !installer.is_installed(repo, version) {
        bail!("{repo} {version} is not installed");
    }
    println!("{}", installer.install_path(repo, version).display());
    Ok(())
}
