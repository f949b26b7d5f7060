//! Decoder capability registry
//!
//! Maps each [`ArchiveFormat`] to its decoder, resolved once when the
//! registry is built. Formats whose decoding capability was not compiled in
//! (7z without the `sevenz` feature, rar without `rar`) are simply absent,
//! which the driver reports as an unsupported-format skip.

use std::collections::HashMap;
use std::path::Path;

use super::ArchiveFormat;
use crate::error::Result;

/// A format decoder: extracts the archive at the first path into the
/// staging directory at the second.
pub type DecoderFn = fn(&Path, &Path) -> Result<()>;

/// The set of decoders available in this build.
#[derive(Debug)]
pub struct DecoderRegistry {
    decoders: HashMap<ArchiveFormat, DecoderFn>,
}

fn decode_gzip_single(archive: &Path, staging: &Path) -> Result<()> {
    super::stream::extract_single_stream(archive, staging, ArchiveFormat::GzipSingle)
}

fn decode_bzip2_single(archive: &Path, staging: &Path) -> Result<()> {
    super::stream::extract_single_stream(archive, staging, ArchiveFormat::Bzip2Single)
}

impl DecoderRegistry {
    /// Build the registry from the capabilities compiled into this binary.
    pub fn with_available() -> Self {
        let mut decoders: HashMap<ArchiveFormat, DecoderFn> = HashMap::new();
        decoders.insert(ArchiveFormat::Zip, super::zip::extract_zip as DecoderFn);
        decoders.insert(ArchiveFormat::Tar, super::tar::extract_tar as DecoderFn);
        decoders.insert(ArchiveFormat::GzipSingle, decode_gzip_single as DecoderFn);
        decoders.insert(ArchiveFormat::Bzip2Single, decode_bzip2_single as DecoderFn);
        #[cfg(feature = "sevenz")]
        decoders.insert(ArchiveFormat::SevenZ, super::sevenz::extract_7z as DecoderFn);
        #[cfg(feature = "rar")]
        decoders.insert(ArchiveFormat::Rar, super::rar::extract_rar as DecoderFn);
        Self { decoders }
    }

    /// The decoder for a format, if one is available.
    pub fn get(&self, format: ArchiveFormat) -> Option<DecoderFn> {
        self.decoders.get(&format).copied()
    }

    /// Whether a decoder for this format was compiled in.
    pub fn supports(&self, format: ArchiveFormat) -> bool {
        self.decoders.contains_key(&format)
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_available()
    }
}
