//! Per-version installation directories.
//!
//! Layout: `<bin_root>/<repository>-<version>/`. Every version gets its own
//! directory so several can coexist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use relbin_schema::{RepoName, Version};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoveError {
    #[error("{} is not installed", path.display())]
    NotInstalled { path: PathBuf },

    #[error("Failed to remove {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Installation directory for `repo` at `version`.
pub fn install_path(bin_root: &Path, repo: &RepoName, version: &Version) -> PathBuf {
    bin_root.join(format!("{repo}-{version}"))
}

/// Single status check: does anything exist at `path`?
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// True if `path` is a directory with at least one entry.
///
/// This is what "already installed" means: staged extraction never leaves a
/// populated directory behind on failure.
pub fn is_populated(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_some())
}

/// Versions of `repo` installed under `bin_root`, oldest first.
///
/// Directory names whose suffix is not a valid version are ignored, which
/// also keeps `foo` from picking up installs of `foo-bar`.
///
/// # Errors
///
/// Returns any I/O error other than `bin_root` not existing.
pub fn list_installed(bin_root: &Path, repo: &RepoName) -> io::Result<Vec<Version>> {
    let entries = match fs::read_dir(bin_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let prefix = format!("{repo}-");
    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(version) = name
            .to_str()
            .and_then(|n| n.strip_prefix(&prefix))
            .and_then(|v| Version::parse(v).ok())
        else {
            continue;
        };
        versions.push(version);
    }

    versions.sort();
    Ok(versions)
}

/// Delete the installation of `repo` at `version`.
///
/// # Errors
///
/// Returns [`RemoveError::NotInstalled`] if the directory does not exist,
/// or [`RemoveError::Io`] if it cannot be removed.
pub fn remove_install(
    bin_root: &Path,
    repo: &RepoName,
    version: &Version,
) -> Result<PathBuf, RemoveError> {
    let path = install_path(bin_root, repo, version);
    if !exists(&path) {
        return Err(RemoveError::NotInstalled { path });
    }
    match fs::remove_dir_all(&path) {
        Ok(()) => Ok(path),
        Err(source) => Err(RemoveError::Io { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn repo(name: &str) -> RepoName {
        RepoName::new(name).unwrap()
    }

    fn version(tag: &str) -> Version {
        Version::parse(tag).unwrap()
    }

    #[test]
    fn test_install_path_layout() {
        let path = install_path(
            Path::new("/home/op/.relbin/bin"),
            &repo("subnet-evm"),
            &version("v1.2.3"),
        );
        assert_eq!(path, Path::new("/home/op/.relbin/bin/subnet-evm-v1.2.3"));
    }

    #[test]
    fn test_distinct_versions_do_not_overlap() {
        let root = Path::new("/bin-root");
        let a = install_path(root, &repo("subnet-evm"), &version("v1.2.3"));
        let b = install_path(root, &repo("subnet-evm"), &version("v1.2.30"));
        assert_ne!(a, b);
        assert!(!a.starts_with(&b) && !b.starts_with(&a));
    }

    #[test]
    fn test_exists_and_populated() {
        let root = tempdir().unwrap();
        let path = install_path(root.path(), &repo("subnet-evm"), &version("v1.2.3"));
        assert!(!exists(&path));
        assert!(!is_populated(&path));

        fs::create_dir_all(&path).unwrap();
        assert!(exists(&path));
        assert!(!is_populated(&path));

        fs::write(path.join("subnet-evm"), b"bin").unwrap();
        assert!(is_populated(&path));
    }

    #[test]
    fn test_list_installed_sorted_and_filtered() {
        let root = tempdir().unwrap();
        for dir in [
            "subnet-evm-v0.5.10",
            "subnet-evm-v0.5.2",
            "subnet-evm-vnext",
            "subnet-evm-extra-v1.0.0",
            "avalanchego-v1.10.0",
            ".subnet-evm-v9.9.9.lock",
        ] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        fs::write(root.path().join("subnet-evm-v3.0.0"), b"file, not dir").unwrap();

        let versions = list_installed(root.path(), &repo("subnet-evm")).unwrap();
        let tags: Vec<&str> = versions.iter().map(Version::as_str).collect();
        assert_eq!(tags, ["v0.5.2", "v0.5.10"]);
    }

    #[test]
    fn test_list_installed_missing_root() {
        let root = tempdir().unwrap();
        let versions = list_installed(&root.path().join("nope"), &repo("subnet-evm")).unwrap();
        assert!(versions.is_empty());
    }

    #[test]
    fn test_remove_install() {
        let root = tempdir().unwrap();
        let path = install_path(root.path(), &repo("subnet-evm"), &version("v1.2.3"));
        fs::create_dir_all(path.join("nested")).unwrap();

        let removed = remove_install(root.path(), &repo("subnet-evm"), &version("v1.2.3")).unwrap();
        assert_eq!(removed, path);
        assert!(!exists(&path));

        let err = remove_install(root.path(), &repo("subnet-evm"), &version("v1.2.3")).unwrap_err();
        assert!(matches!(err, RemoveError::NotInstalled { .. }));
    }
}
