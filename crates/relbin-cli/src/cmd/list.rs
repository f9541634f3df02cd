//! List command
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use relbin_core::Installer;
use relbin_schema::RepoName;

/// List installed versions of `repo`, oldest first.
pub fn list(installer: &Installer, repo: &RepoName) -> Result<()> {
    let versions = installer.installed_versions(repo).with_context(|| {
        format!(
            "Failed to read binaries directory {}",
            installer.bin_dir().display()
        )
    })?;

    if versions.is_empty() {
        eprintln!("  {}", format!("No versions of {repo} installed.").dark_grey());
        return Ok(());
    }

    for version in &versions {
        let path = installer.install_path(repo, version);
        println!(
            "  {} {}",
            format!("{:<12}", version.as_str()).cyan(),
            path.display().to_string().dark_grey()
        );
    }
    Ok(())
}
