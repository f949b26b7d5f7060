//! # UnNest
//!
//! Secure recursive archive extraction: locate archives in a file or
//! directory tree, validate every member against path-traversal and symlink
//! attacks, extract only safe regular content, and recurse into archives
//! found inside extracted output until none remain.
//!
//! ## Supported Formats
//!
//! - **zip**
//! - **tar** - plain or gzip/bzip2/xz compressed (codec sniffed from the stream)
//! - **gzip / bzip2** - single-stream compressed files
//! - **7z** - optional, feature `sevenz` (default on)
//! - **rar** - optional, feature `rar` (default off, needs native unrar)
//!
//! ## Quick Start
//!
//! ```no_run
//! use unnest::unpack::{UnpackOptions, Unpacker};
//!
//! let mut unpacker = Unpacker::new(UnpackOptions::new());
//! let report = unpacker.run(&["downloads/bundle.tar.gz".into()]);
//! for outcome in &report.outcomes {
//!     println!("{}: {:?}", outcome.archive.display(), outcome.status);
//! }
//! ```
//!
//! Top-level archives unpack into a `YYMMDD-HH-MM-SS_<name>/` folder next to
//! themselves (or under an output base); archives discovered inside
//! extracted output keep their natural `<name>/` folder. Sources are deleted
//! after successful extraction unless `keep_originals` is set.
//!
//! ## Safety Model
//!
//! Member names are validated before any bytes are written, and one unsafe
//! name rejects the whole archive. Extraction lands in a disposable staging
//! directory; only regular files whose resolved destination stays inside the
//! output root are committed. Symlinks, hard links, and special files inside
//! archives are never materialized.
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `unnest` command-line binary
//! - `sevenz` - 7z decoding via `sevenz-rust`
//! - `rar` - rar decoding via `unrar`

pub mod archive;
pub mod error;
pub mod identity;
pub mod naming;
pub mod staging;
pub mod unpack;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::archive::{ArchiveFormat, DecoderRegistry, MemberKind, is_safe_member_name};
    pub use crate::error::{Error, Result};
    pub use crate::identity::{FileIdentity, IdentityTracker, file_identity};
    pub use crate::naming::output_folder_name;
    pub use crate::staging::{CommitSummary, StagingDir, commit_staged};
    pub use crate::unpack::{
        ArchiveOutcome, ArchiveStatus, SkipReason, UnpackOptions, UnpackReport, Unpacker,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
