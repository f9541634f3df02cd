//! Latest command
use anyhow::Result;
use relbin_core::Installer;
use relbin_schema::RepoName;

pub async fn latest(installer: &Installer, repo: &RepoName) -> Result<()> {
    let version = installer.latest_version(repo).await?;
    println!("{version}");
    Ok(())
}
