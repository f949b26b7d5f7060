//! Archive format classification by filename suffix
//!
//! Classification is purely name-based: a file is an archive candidate when
//! its name ends in a recognized suffix. Compound suffixes win over their
//! tails, so `backup.tar.gz` is a tar archive, not a single gzip stream.

use std::fmt;
use std::path::Path;

/// A detected archive family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// ZIP archive (`.zip`).
    Zip,
    /// Tar archive, plain or compressed (`.tar`, `.tar.gz`, `.tgz`,
    /// `.tar.bz2`, `.tbz`, `.tar.xz`, `.txz`). The codec is sniffed from the
    /// stream at open time.
    Tar,
    /// Single gzip-compressed file (`.gz` when not part of `.tar.gz`).
    GzipSingle,
    /// Single bzip2-compressed file (`.bz2` when not part of `.tar.bz2`).
    Bzip2Single,
    /// 7-Zip archive (`.7z`).
    SevenZ,
    /// RAR archive (`.rar`).
    Rar,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::GzipSingle => "gzip",
            Self::Bzip2Single => "bzip2",
            Self::SevenZ => "7z",
            Self::Rar => "rar",
        };
        f.write_str(name)
    }
}

/// Recognized suffixes, most specific first. Order matters: every compound
/// suffix must precede its own tail (`.tar.gz` before `.gz`).
const SUFFIX_TABLE: &[(&str, ArchiveFormat)] = &[
    (".tar.gz", ArchiveFormat::Tar),
    (".tar.bz2", ArchiveFormat::Tar),
    (".tar.xz", ArchiveFormat::Tar),
    (".tgz", ArchiveFormat::Tar),
    (".tbz", ArchiveFormat::Tar),
    (".txz", ArchiveFormat::Tar),
    (".tar", ArchiveFormat::Tar),
    (".zip", ArchiveFormat::Zip),
    (".7z", ArchiveFormat::SevenZ),
    (".rar", ArchiveFormat::Rar),
    (".gz", ArchiveFormat::GzipSingle),
    (".bz2", ArchiveFormat::Bzip2Single),
];

impl ArchiveFormat {
    /// Classify a bare file name (case-insensitive, longest suffix wins).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        SUFFIX_TABLE
            .iter()
            .find(|(suffix, _)| lower.ends_with(suffix))
            .map(|&(_, format)| format)
    }

    /// Classify a path by its final component.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::from_file_name)
    }
}

/// The recognized suffix of a file name, if any (longest match).
///
/// Used by the naming policy to strip `.tar.gz` as a unit instead of just
/// `.gz`.
pub fn recognized_suffix(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    SUFFIX_TABLE
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|&(suffix, _)| suffix)
}
