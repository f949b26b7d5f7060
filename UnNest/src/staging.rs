//! Staging-directory lifecycle and safe commit into the destination
//!
//! Extraction never writes to the final destination directly. Each archive
//! is unpacked into a disposable [`StagingDir`]; only after the extractor
//! reports success is the staged tree committed. The commit walk is the
//! second line of defense: even if something unexpected landed in staging,
//! only regular files whose resolved target stays inside the destination
//! root are moved.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A disposable staging directory, removed on drop on every exit path.
#[derive(Debug)]
pub struct StagingDir {
    dir: TempDir,
}

impl StagingDir {
    /// Create a fresh staging directory under the system temp location.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("unnest-").tempdir()?;
        Ok(Self { dir })
    }

    /// The staging root path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Summary of a commit pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitSummary {
    /// Files moved into the destination.
    pub moved: usize,
    /// Entries skipped (symlinks, special files, escapes, move failures).
    pub skipped: usize,
}

/// Move every staged regular file into `destination_root`.
///
/// Directories are created on demand along the relative path. Symlinks and
/// non-regular entries are skipped with a warning. Every target path is
/// resolved and checked for containment inside the destination before the
/// move; a file that cannot be moved is skipped, not fatal.
pub fn commit_staged(staging_root: &Path, destination_root: &Path) -> Result<CommitSummary> {
    fs::create_dir_all(destination_root)?;
    let resolved_root = destination_root.canonicalize()?;
    let mut summary = CommitSummary::default();

    for entry in WalkDir::new(staging_root).min_depth(1) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(staging_root)
            .map_err(|e| Error::InvalidPath(e.to_string()))?
            .to_path_buf();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(resolved_root.join(&rel))?;
            continue;
        }
        if file_type.is_symlink() || !file_type.is_file() {
            tracing::warn!("Skipping non-regular staged entry: {}", entry.path().display());
            summary.skipped += 1;
            continue;
        }

        match place_file(entry.path(), &rel, &resolved_root) {
            Ok(()) => summary.moved += 1,
            Err(e) => {
                tracing::error!(
                    "Failed moving {} into {}: {e}",
                    entry.path().display(),
                    destination_root.display()
                );
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Move one staged file to `resolved_root/rel`, verifying containment of
/// the fully resolved target first.
fn place_file(staged: &Path, rel: &Path, resolved_root: &Path) -> Result<()> {
    let target = resolved_root.join(rel);
    let parent = target
        .parent()
        .ok_or_else(|| Error::InvalidPath(target.display().to_string()))?;
    fs::create_dir_all(parent)?;

    // Resolve the (now existing) parent; a symlink planted along the staged
    // relative path would redirect it outside the destination.
    let resolved_parent = parent.canonicalize()?;
    if !resolved_parent.starts_with(resolved_root) {
        return Err(Error::InvalidPath(format!(
            "target escapes destination: {}",
            target.display()
        )));
    }
    let resolved_target = resolved_parent.join(
        target
            .file_name()
            .ok_or_else(|| Error::InvalidPath(target.display().to_string()))?,
    );

    if resolved_target.exists() {
        tracing::info!("Overwriting existing file: {}", resolved_target.display());
        fs::remove_file(&resolved_target)?;
    }
    move_file(staged, &resolved_target)?;
    Ok(())
}

/// Rename, falling back to copy+unlink when the staging area lives on a
/// different filesystem than the destination.
fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(src, dst)?;
            fs::remove_file(src)
        }
    }
}

/// Remove `dir` if it exists and is empty; used to undo a destination
/// created for an extraction that then failed.
pub fn remove_dir_if_empty(dir: &Path) {
    if !dir.is_dir() {
        return;
    }
    match fs::read_dir(dir) {
        Ok(mut entries) => {
            if entries.next().is_none() {
                if let Err(e) = fs::remove_dir(dir) {
                    tracing::debug!("Could not remove empty {}: {e}", dir.display());
                }
            }
        }
        Err(e) => tracing::debug!("Could not inspect {}: {e}", dir.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_dir_is_removed_on_drop() {
        let staging = StagingDir::new().unwrap();
        let path = staging.path().to_path_buf();
        assert!(path.is_dir());
        drop(staging);
        assert!(!path.exists());
    }

    #[test]
    fn commit_preserves_the_staged_tree_shape() {
        let staging = tempfile::tempdir().unwrap();
        fs::create_dir_all(staging.path().join("docs")).unwrap();
        fs::write(staging.path().join("top.txt"), b"top").unwrap();
        fs::write(staging.path().join("docs/deep.txt"), b"deep").unwrap();

        let dest = tempfile::tempdir().unwrap();
        let out = dest.path().join("result");
        let summary = commit_staged(staging.path(), &out).unwrap();

        assert_eq!(summary.moved, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(fs::read(out.join("top.txt")).unwrap(), b"top");
        assert_eq!(fs::read(out.join("docs/deep.txt")).unwrap(), b"deep");
        // moved, not copied
        assert!(!staging.path().join("top.txt").exists());
    }

    #[test]
    fn commit_overwrites_existing_files() {
        let staging = tempfile::tempdir().unwrap();
        fs::write(staging.path().join("file.txt"), b"new").unwrap();

        let dest = tempfile::tempdir().unwrap();
        fs::write(dest.path().join("file.txt"), b"old").unwrap();

        let summary = commit_staged(staging.path(), dest.path()).unwrap();
        assert_eq!(summary.moved, 1);
        assert_eq!(fs::read(dest.path().join("file.txt")).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn commit_skips_symlinks_in_staging() {
        let staging = tempfile::tempdir().unwrap();
        fs::write(staging.path().join("real.txt"), b"data").unwrap();
        std::os::unix::fs::symlink("/etc/passwd", staging.path().join("evil")).unwrap();

        let dest = tempfile::tempdir().unwrap();
        let summary = commit_staged(staging.path(), dest.path()).unwrap();

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.skipped, 1);
        assert!(dest.path().join("real.txt").exists());
        assert!(!dest.path().join("evil").exists());
    }

    #[cfg(unix)]
    #[test]
    fn commit_refuses_targets_redirected_outside_the_destination() {
        // A directory symlink inside the destination would carry staged
        // files outside the root once resolved.
        let outside = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dest.path().join("sub")).unwrap();

        let staging = tempfile::tempdir().unwrap();
        fs::create_dir_all(staging.path().join("sub")).unwrap();
        fs::write(staging.path().join("sub/payload.txt"), b"x").unwrap();

        let summary = commit_staged(staging.path(), dest.path()).unwrap();
        assert_eq!(summary.moved, 0);
        assert_eq!(summary.skipped, 1);
        assert!(!outside.path().join("payload.txt").exists());
    }

    #[test]
    fn remove_dir_if_empty_only_removes_empty_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        let full = dir.path().join("full");
        fs::create_dir(&empty).unwrap();
        fs::create_dir(&full).unwrap();
        fs::write(full.join("keep.txt"), b"x").unwrap();

        remove_dir_if_empty(&empty);
        remove_dir_if_empty(&full);
        assert!(!empty.exists());
        assert!(full.exists());
    }
}
