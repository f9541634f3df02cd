//! Advisory per-destination install lock.
//!
//! Two installs of the same version race on the destination directory. The
//! lock is a sibling file `.<name>.lock` created with `create_new`, so exactly
//! one process wins; the other gets [`LockError::Held`] instead of
//! interleaving writes. The file is removed when the guard drops.
//!
//! A process killed while holding the lock leaves the file behind; the error
//! message names it so the operator can delete it.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LockError {
    #[error("Another install is in progress (lock file {} exists; delete it if no install is running)", path.display())]
    Held { path: PathBuf },

    #[error("Failed to create lock file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Guard holding the lock for one installation directory.
#[derive(Debug)]
pub struct InstallLock {
    path: PathBuf,
}

impl InstallLock {
    /// Lock file guarding `dest`.
    pub fn path_for(dest: &Path) -> PathBuf {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        dest.with_file_name(format!(".{name}.lock"))
    }

    /// Take the lock for `dest`, creating its parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Held`] if another install holds the lock, or
    /// [`LockError::Io`] if the lock file cannot be created.
    pub fn acquire(dest: &Path) -> Result<Self, LockError> {
        let path = Self::path_for(dest);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| LockError::Io {
                path: path.clone(),
                source,
            })?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(LockError::Held { path });
            }
            Err(source) => return Err(LockError::Io { path, source }),
        };

        // Owner pid, for whoever finds a stale lock.
        let _ = writeln!(file, "{}", std::process::id());
        debug!(lock = %path.display(), "acquired install lock");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(lock = %self.path.display(), error = %e, "failed to release install lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_path_is_hidden_sibling() {
        assert_eq!(
            InstallLock::path_for(Path::new("/x/bin/subnet-evm-v1.2.3")),
            Path::new("/x/bin/.subnet-evm-v1.2.3.lock")
        );
    }

    #[test]
    fn test_second_acquire_fails_until_release() {
        let root = tempdir().unwrap();
        let dest = root.path().join("bin").join("subnet-evm-v1.2.3");

        let guard = InstallLock::acquire(&dest).unwrap();
        assert!(guard.path().exists());
        assert!(matches!(
            InstallLock::acquire(&dest),
            Err(LockError::Held { .. })
        ));

        drop(guard);
        let again = InstallLock::acquire(&dest).unwrap();
        assert!(again.path().exists());
    }

    #[test]
    fn test_different_versions_lock_independently() {
        let root = tempdir().unwrap();
        let _a = InstallLock::acquire(&root.path().join("subnet-evm-v1.0.0")).unwrap();
        let _b = InstallLock::acquire(&root.path().join("subnet-evm-v1.0.1")).unwrap();
    }
}
