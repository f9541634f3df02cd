//! Remove command
use anyhow::Result;
use crossterm::style::Stylize;
use relbin_core::Installer;
use relbin_schema::{RepoName, Version};

pub fn remove(installer: &Installer, repo: &RepoName, version: &Version) -> Result<()> {
    let path = installer.remove(repo, version)?;
    eprintln!(
        "  {} {repo} {version} {}",
        "✓".green(),
        format!("removed {}", path.display()).dark_grey()
    );
    Ok(())
}
