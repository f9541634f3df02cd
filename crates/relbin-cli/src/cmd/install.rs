//! Install command
use anyhow::Result;
use relbin_core::{InstallMode, Installer};
use relbin_schema::{RepoName, Version};

/// Install `repo` and print the installation directory on stdout.
pub async fn install(
    installer: &Installer,
    repo: &RepoName,
    version: Option<Version>,
    force: bool,
) -> Result<()> {
    let mode = if force {
        InstallMode::Force
    } else {
        InstallMode::SkipIfPresent
    };

    let installed = installer.install(repo, version, mode).await?;
    println!("{}", installed.path.display());
    Ok(())
}
