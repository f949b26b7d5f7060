//! RAR extraction (optional capability, feature `rar`)
//!
//! Read-only, via the `unrar` bindings. Data is read into memory per entry
//! and written by us instead of letting the library place files, so the
//! staging layout stays under our control.

use std::fs;
use std::path::{Path, PathBuf};

use unrar::Archive;

use super::member::ensure_all_safe;
use crate::error::{Error, Result};

/// Extract a RAR archive into `staging`.
pub fn extract_rar(archive: &Path, staging: &Path) -> Result<()> {
    let corrupt = |e: &dyn std::fmt::Display| Error::CorruptArchive {
        format: super::ArchiveFormat::Rar,
        path: archive.to_path_buf(),
        message: e.to_string(),
    };

    // Pass 1: listing, validate every member name.
    let listing = Archive::new(archive)
        .open_for_listing()
        .map_err(|e| corrupt(&e))?;
    let mut names = Vec::new();
    for header in listing {
        let header = header.map_err(|e| corrupt(&e))?;
        names.push(header.filename.to_string_lossy().into_owned());
    }
    ensure_all_safe(&names)?;

    // Pass 2: processing, write regular files and directories.
    let mut reader = Archive::new(archive)
        .open_for_processing()
        .map_err(|e| corrupt(&e))?;
    while let Some(header) = reader.read_header().map_err(|e| corrupt(&e))? {
        let rel: PathBuf = header.entry().filename.clone();
        let target = staging.join(&rel);

        reader = if header.entry().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let (data, rest) = header.read().map_err(|e| corrupt(&e))?;
            fs::write(&target, data)?;
            rest
        } else if header.entry().is_directory() {
            fs::create_dir_all(&target)?;
            header.skip().map_err(|e| corrupt(&e))?
        } else {
            tracing::debug!("Skipping non-regular rar member: {}", rel.display());
            header.skip().map_err(|e| corrupt(&e))?
        };
    }

    Ok(())
}
