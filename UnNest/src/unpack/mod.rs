//! Recursive unpack orchestration
//!
//! The [`Unpacker`] drives the whole process: walk inputs, classify archive
//! candidates, extract through staging, commit, apply the source-deletion
//! policy, and recurse into freshly produced output until no archives
//! remain.

mod driver;
mod options;
mod report;

pub use driver::{ProgressCallback, Unpacker};
pub use options::UnpackOptions;
pub use report::{ArchiveOutcome, ArchiveStatus, SkipReason, UnpackReport};
