//! ZIP extraction into a staging directory
//!
//! Two-pass protocol: every member name is validated before any entry is
//! written. Symlinks (detected through the unix mode bits in the external
//! attributes) and other non-regular entries are skipped.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use super::member::{MemberKind, ensure_all_safe};
use crate::error::{Error, Result};

/// Extract a ZIP archive into `staging`.
///
/// Fails with [`Error::UnsafeMember`] before writing anything if any entry
/// name is unsafe, and with [`Error::CorruptArchive`] if the stream cannot
/// be parsed.
pub fn extract_zip(archive: &Path, staging: &Path) -> Result<()> {
    let corrupt = |e: &dyn std::fmt::Display| Error::CorruptArchive {
        format: super::ArchiveFormat::Zip,
        path: archive.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file)).map_err(|e| corrupt(&e))?;

    ensure_all_safe(zip.file_names().map(str::to_string).collect::<Vec<_>>())?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| corrupt(&e))?;
        let target: PathBuf = staging.join(entry.name());

        let kind = classify(entry.is_dir(), entry.unix_mode());
        if !kind.is_extractable() {
            tracing::debug!("Skipping {kind:?} zip member: {}", entry.name());
            continue;
        }
        if kind == MemberKind::Directory {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
            restore_mode(&target, entry.unix_mode());
        }
    }

    Ok(())
}

/// Map a zip entry onto the shared member model.
fn classify(is_dir: bool, unix_mode: Option<u32>) -> MemberKind {
    if is_dir {
        return MemberKind::Directory;
    }
    // Symlinks are stored as files whose unix mode carries S_IFLNK.
    if unix_mode.is_some_and(|mode| mode & 0o170000 == 0o120000) {
        return MemberKind::Symlink;
    }
    MemberKind::RegularFile
}

/// Best-effort permission restore; a chmod failure is not fatal.
fn restore_mode(target: &Path, mode: Option<u32>) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = mode {
            let bits = mode & 0o777;
            if bits != 0 {
                if let Err(e) = fs::set_permissions(target, fs::Permissions::from_mode(bits)) {
                    tracing::debug!("Could not restore mode on {}: {e}", target.display());
                }
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = (target, mode);
    }
}
