//! Tar-family extraction with transparent decompression
//!
//! The compression codec (gzip, bzip2, xz, or none) is sniffed from the
//! stream's magic bytes rather than trusted from the suffix, so `.tar`
//! files that are secretly compressed still decode. Extraction uses the
//! same two-pass validate-then-write protocol as the other formats; tar
//! streams cannot seek, so each pass reopens the archive.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tar::{Archive, EntryType};
use xz2::read::XzDecoder;

use super::member::{MemberKind, is_safe_member_name};
use crate::error::{Error, Result};

/// Compression codec wrapped around a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TarCodec {
    Plain,
    Gzip,
    Bzip2,
    Xz,
}

/// Sniff the codec from the first bytes of the file.
fn sniff_codec(path: &Path) -> Result<TarCodec> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 6];
    let mut filled = 0;
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(match &magic[..filled] {
        [0x1F, 0x8B, ..] => TarCodec::Gzip,
        [b'B', b'Z', b'h', ..] => TarCodec::Bzip2,
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00] => TarCodec::Xz,
        _ => TarCodec::Plain,
    })
}

/// Open the archive with the right decoder in front of it.
fn open_reader(path: &Path, codec: TarCodec) -> Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    Ok(match codec {
        TarCodec::Plain => Box::new(file),
        TarCodec::Gzip => Box::new(GzDecoder::new(file)),
        TarCodec::Bzip2 => Box::new(BzDecoder::new(file)),
        TarCodec::Xz => Box::new(XzDecoder::new(file)),
    })
}

/// Extract a tar archive (plain or compressed) into `staging`.
pub fn extract_tar(archive: &Path, staging: &Path) -> Result<()> {
    let corrupt = |e: &dyn std::fmt::Display| Error::CorruptArchive {
        format: super::ArchiveFormat::Tar,
        path: archive.to_path_buf(),
        message: e.to_string(),
    };

    let codec = sniff_codec(archive)?;

    // Pass 1: every member name must be safe before anything is written.
    let mut reader = Archive::new(open_reader(archive, codec)?);
    for entry in reader.entries().map_err(|e| corrupt(&e))? {
        let entry = entry.map_err(|e| corrupt(&e))?;
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        if !is_safe_member_name(&name) {
            return Err(Error::UnsafeMember { name });
        }
    }

    // Pass 2: write regular files and directories, skip everything else.
    let mut reader = Archive::new(open_reader(archive, codec)?);
    for entry in reader.entries().map_err(|e| corrupt(&e))? {
        let mut entry = entry.map_err(|e| corrupt(&e))?;
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let target: PathBuf = staging.join(&name);

        let kind = member_kind(entry.header().entry_type());
        if !kind.is_extractable() {
            tracing::debug!("Skipping {kind:?} tar member: {name}");
            continue;
        }
        if kind == MemberKind::Directory {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out).map_err(|e| corrupt(&e))?;
            restore_mode(&target, entry.header().mode().ok());
        }
    }

    Ok(())
}

/// Map a tar entry type onto the shared member model.
fn member_kind(kind: EntryType) -> MemberKind {
    match kind {
        EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse => {
            MemberKind::RegularFile
        }
        EntryType::Directory => MemberKind::Directory,
        EntryType::Symlink => MemberKind::Symlink,
        EntryType::Link => MemberKind::HardLink,
        _ => MemberKind::Special,
    }
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
