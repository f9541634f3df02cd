//! Archive installation.
//!
//! Extraction never writes into the destination directly. The archive is
//! unpacked into a staging directory next to the destination (same
//! filesystem) and renamed into place only once every entry has been written.
//! Any failure drops the staging directory, so a later "already installed?"
//! check never sees a half-extracted tree.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, warn};

use crate::install_dir;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreation { path: PathBuf, source: io::Error },

    #[error("Failed to extract archive: {reason}")]
    Extraction { reason: String },

    #[error("Permission denied writing {}: {source}", path.display())]
    Permission { path: PathBuf, source: io::Error },

    #[error(
        "Failed to restore previous install to {}; it was kept at {}: {source}",
        dest.display(),
        kept.display()
    )]
    Restore {
        dest: PathBuf,
        kept: PathBuf,
        source: io::Error,
    },
}

impl ExtractError {
    fn corrupt(err: impl std::fmt::Display) -> Self {
        Self::Extraction {
            reason: err.to_string(),
        }
    }

    /// Sort an I/O failure while writing `path` into permission vs. archive trouble.
    fn writing(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                Self::Permission {
                    path: path.to_path_buf(),
                    source,
                }
            }
            _ => Self::corrupt(format!("{}: {source}", path.display())),
        }
    }
}

/// What to do when the destination already holds an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Leave an existing non-empty destination alone and report success.
    #[default]
    SkipIfPresent,
    /// Replace the destination, even if it is already populated.
    Force,
}

/// Information about an extracted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Path relative to the installation directory
    pub relative_path: PathBuf,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Whether any execute bit is set
    pub is_executable: bool,
}

/// Result of [`install_archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The archive was extracted into the destination.
    Installed(Vec<ExtractedFile>),
    /// The destination was already populated; nothing was extracted.
    AlreadyInstalled,
}

impl InstallOutcome {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Installed(_))
    }

    /// Extracted files, empty when the install was skipped.
    pub fn files(&self) -> &[ExtractedFile] {
        match self {
            Self::Installed(files) => files,
            Self::AlreadyInstalled => &[],
        }
    }
}

/// Install a gzip-compressed tar archive held in memory into `dest`.
///
/// # Errors
///
/// - [`ExtractError::DirectoryCreation`] if the parent or staging directory cannot be created
/// - [`ExtractError::Extraction`] if the archive is corrupt, truncated, not a gzip tar,
///   contains unsafe paths, or contains no files
/// - [`ExtractError::Permission`] if files cannot be written or moved into place
pub fn install_archive(
    archive: &[u8],
    dest: &Path,
    mode: InstallMode,
) -> Result<InstallOutcome, ExtractError> {
    if mode == InstallMode::SkipIfPresent && install_dir::is_populated(dest) {
        debug!(dest = %dest.display(), "destination already populated, skipping extraction");
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|source| ExtractError::DirectoryCreation {
        path: parent.to_path_buf(),
        source,
    })?;

    let staging = tempfile::Builder::new()
        .prefix(".relbin-staging-")
        .tempdir_in(parent)
        .map_err(|source| ExtractError::DirectoryCreation {
            path: parent.to_path_buf(),
            source,
        })?;

    let files = extract_tar_gz(archive, staging.path())?;
    if files.is_empty() {
        return Err(ExtractError::corrupt("archive contains no files"));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(staging.path(), fs::Permissions::from_mode(0o755))
            .map_err(|source| ExtractError::writing(staging.path(), source))?;
    }

    promote(&staging, parent, dest)?;
    debug!(dest = %dest.display(), files = files.len(), "archive installed");

    Ok(InstallOutcome::Installed(
        files
            .into_iter()
            .map(|f| ExtractedFile {
                absolute_path: dest.join(&f.relative_path),
                ..f
            })
            .collect(),
    ))
}

/// Move the staged tree to `dest`, retiring any previous installation.
///
/// The previous tree is only deleted after the new one is in place; if the
/// final rename fails it is put back (see [`restore`]).
fn promote(staging: &TempDir, parent: &Path, dest: &Path) -> Result<(), ExtractError> {
    let retired = if install_dir::exists(dest) {
        let holder = tempfile::Builder::new()
            .prefix(".relbin-retired-")
            .tempdir_in(parent)
            .map_err(|source| ExtractError::DirectoryCreation {
                path: parent.to_path_buf(),
                source,
            })?;
        let previous = holder.path().join("previous");
        fs::rename(dest, &previous).map_err(|source| ExtractError::writing(dest, source))?;
        Some((holder, previous))
    } else {
        None
    };

    if let Err(source) = fs::rename(staging.path(), dest) {
        if let Some((holder, previous)) = retired {
            warn!(dest = %dest.display(), error = %source, "install rename failed, restoring previous tree");
            restore(holder, &previous, dest)?;
        }
        return Err(ExtractError::writing(dest, source));
    }

    // `retired` drops here, deleting the old tree.
    Ok(())
}

/// Move a retired tree at `previous` back to `dest`.
///
/// If that fails the holder directory is kept on disk instead of being
/// dropped, and the error names where the previous install now lives.
fn restore(holder: TempDir, previous: &Path, dest: &Path) -> Result<(), ExtractError> {
    match fs::rename(previous, dest) {
        Ok(()) => Ok(()),
        Err(source) => {
            let kept = holder.keep().join("previous");
            warn!(dest = %dest.display(), kept = %kept.display(), error = %source, "could not restore previous install");
            Err(ExtractError::Restore {
                dest: dest.to_path_buf(),
                kept,
                source,
            })
        }
    }
}

/// Unpack a `.tar.gz` stream into `root`, returning every non-directory entry.
fn extract_tar_gz(archive: &[u8], root: &Path) -> Result<Vec<ExtractedFile>, ExtractError> {
    let mut tar = tar::Archive::new(GzDecoder::new(archive));
    let mut extracted_files = Vec::new();

    for entry in tar.entries().map_err(ExtractError::corrupt)? {
        let mut entry = entry.map_err(ExtractError::corrupt)?;
        let entry_path = entry.path().map_err(ExtractError::corrupt)?.into_owned();
        let relative_path = sanitize(&entry_path)?;
        if relative_path.as_os_str().is_empty() {
            continue;
        }

        let entry_type = entry.header().entry_type();
        if entry_type.is_symlink() || entry_type.is_hard_link() {
            let target = entry
                .link_name()
                .map_err(ExtractError::corrupt)?
                .ok_or_else(|| ExtractError::corrupt("link entry without a target"))?;
            // Symlinks resolve against their own directory, hard links against the root.
            let base = if entry_type.is_symlink() {
                relative_path.parent().unwrap_or(Path::new(""))
            } else {
                Path::new("")
            };
            if !link_stays_inside(base, &target) {
                return Err(ExtractError::corrupt(format!(
                    "Invalid link in archive: {} -> {}",
                    entry_path.display(),
                    target.display()
                )));
            }
        }

        let absolute_path = root.join(&relative_path);
        // `unpack_in` refuses to write through links that lead outside `root`.
        let unpacked = entry
            .unpack_in(root)
            .map_err(|source| ExtractError::writing(&absolute_path, source))?;
        if !unpacked {
            return Err(ExtractError::corrupt(format!(
                "Invalid path in archive: {}",
                entry_path.display()
            )));
        }
        if entry_type.is_dir() {
            continue;
        }

        let is_executable = entry
            .header()
            .mode()
            .map(|m| m & 0o111 != 0)
            .unwrap_or(false);

        extracted_files.push(ExtractedFile {
            relative_path,
            absolute_path,
            is_executable,
        });
    }

    // Drain the rest of the gzip stream so a truncated trailer or CRC
    // mismatch is still detected after the tar end marker.
    let mut rest = tar.into_inner();
    io::copy(&mut rest, &mut io::sink()).map_err(ExtractError::corrupt)?;

    Ok(extracted_files)
}

/// Reduce an entry path to plain components; reject anything that could
/// escape the extraction root.
fn sanitize(path: &Path) -> Result<PathBuf, ExtractError> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractError::corrupt(format!(
                    "Invalid path in archive: {}",
                    path.display()
                )));
            }
        }
    }
    Ok(clean)
}

/// True if `target`, resolved from the directory `base` (relative to the
/// extraction root), never climbs above the root.
fn link_stays_inside(base: &Path, target: &Path) -> bool {
    let mut depth = base.components().count();
    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}
