//! 7-Zip extraction (optional capability, feature `sevenz`)

use std::fs::{self, File};
use std::io;
use std::path::Path;

use sevenz_rust::{Password, SevenZReader};

use super::member::ensure_all_safe;
use crate::error::{Error, Result};

/// Extract a 7z archive into `staging`.
///
/// Entry names are validated up front, like every other format. 7z does not
/// model symlinks or special files in a way `sevenz-rust` surfaces, so the
/// entry dispatch is directory-or-file.
pub fn extract_7z(archive: &Path, staging: &Path) -> Result<()> {
    let corrupt = |e: &dyn std::fmt::Display| Error::CorruptArchive {
        format: super::ArchiveFormat::SevenZ,
        path: archive.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = SevenZReader::open(archive, Password::empty()).map_err(|e| corrupt(&e))?;

    let names: Vec<String> = reader
        .archive()
        .files
        .iter()
        .map(|entry| entry.name().to_string())
        .collect();
    ensure_all_safe(&names)?;

    let staging = staging.to_path_buf();
    reader
        .for_each_entries(|entry, stream| {
            let target = staging.join(entry.name());
            if entry.is_directory() {
                fs::create_dir_all(&target).map_err(sevenz_rust::Error::io)?;
                return Ok(true);
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(sevenz_rust::Error::io)?;
            }
            let mut out = File::create(&target).map_err(sevenz_rust::Error::io)?;
            io::copy(stream, &mut out).map_err(sevenz_rust::Error::io)?;
            Ok(true)
        })
        .map_err(|e| corrupt(&e))?;

    Ok(())
}
