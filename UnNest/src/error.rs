//! Error types for `UnNest`

use std::path::PathBuf;

use thiserror::Error;

use crate::archive::ArchiveFormat;

/// The error type for `UnNest` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Validation Errors ====================
    /// An archive member name would escape the extraction root.
    ///
    /// Raised before any bytes are written; the whole archive is rejected.
    #[error("unsafe member name: {name:?}")]
    UnsafeMember {
        /// The offending member name, exactly as stored in the archive.
        name: String,
    },

    // ==================== Archive Errors ====================
    /// The suffix is recognized but no decoder for the format is available
    /// in this build.
    #[error("no decoder available for {format} archives")]
    UnsupportedFormat {
        /// The format without a decoder.
        format: ArchiveFormat,
    },

    /// The decoder could not parse the archive stream.
    #[error("corrupt {format} archive {}: {message}", path.display())]
    CorruptArchive {
        /// The detected format of the archive.
        format: ArchiveFormat,
        /// Path to the unreadable archive.
        path: PathBuf,
        /// The decoder's error message.
        message: String,
    },

    /// The path does not carry a recognized archive suffix.
    #[error("not a recognized archive: {}", path.display())]
    NotAnArchive {
        /// The path that failed classification.
        path: PathBuf,
    },

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `UnNest` operations.
pub type Result<T> = std::result::Result<T, Error>;
