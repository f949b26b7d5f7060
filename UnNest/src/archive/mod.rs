//! Archive classification, member validation, and per-format extraction
//!
//! Each format extractor writes only validated regular files and directories
//! into a caller-provided staging directory; nothing in this module ever
//! touches a final destination.

mod format;
mod member;
mod registry;
mod stream;
mod tar;
mod zip;

#[cfg(feature = "rar")]
mod rar;
#[cfg(feature = "sevenz")]
mod sevenz;

pub use format::{ArchiveFormat, recognized_suffix};
pub use member::{MemberKind, ensure_all_safe, is_safe_member_name};
pub use registry::{DecoderFn, DecoderRegistry};

pub use self::stream::extract_single_stream;
pub use self::tar::extract_tar;
pub use self::zip::extract_zip;

#[cfg(feature = "rar")]
pub use self::rar::extract_rar;
#[cfg(feature = "sevenz")]
pub use self::sevenz::extract_7z;
