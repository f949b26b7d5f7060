//! Single-stream gzip/bzip2 extraction
//!
//! A bare `.gz` or `.bz2` file (one that is not a compressed tar) holds
//! exactly one payload. Decoding produces a single file in the staging
//! directory, named by stripping the compression suffix, with `.out`
//! appended when there is no suffix to strip.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;

use super::ArchiveFormat;
use crate::error::{Error, Result};

/// Decode a single-stream compressed file into `staging`.
///
/// `format` must be [`ArchiveFormat::GzipSingle`] or
/// [`ArchiveFormat::Bzip2Single`].
pub fn extract_single_stream(
    archive: &Path,
    staging: &Path,
    format: ArchiveFormat,
) -> Result<()> {
    let file_name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidPath(archive.display().to_string()))?;

    let (suffix, mut reader): (&str, Box<dyn Read>) = match format {
        ArchiveFormat::GzipSingle => (
            ".gz",
            Box::new(GzDecoder::new(BufReader::new(File::open(archive)?))),
        ),
        ArchiveFormat::Bzip2Single => (
            ".bz2",
            Box::new(BzDecoder::new(BufReader::new(File::open(archive)?))),
        ),
        other => return Err(Error::UnsupportedFormat { format: other }),
    };

    let target = staging.join(single_output_name(file_name, suffix));
    let mut out = File::create(&target)?;
    io::copy(&mut reader, &mut out).map_err(|e| Error::CorruptArchive {
        format,
        path: archive.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Name for the decoded payload: strip the compression suffix, or fall back
/// to a deterministic `.out` suffix when there is nothing to strip.
fn single_output_name(file_name: &str, suffix: &str) -> String {
    let lower = file_name.to_lowercase();
    if lower.ends_with(suffix) && file_name.len() > suffix.len() {
        file_name[..file_name.len() - suffix.len()].to_string()
    } else {
        format!("{file_name}.out")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    #[test]
    fn output_name_strips_the_compression_suffix() {
        assert_eq!(single_output_name("kernel.img.gz", ".gz"), "kernel.img");
        assert_eq!(single_output_name("LOG.GZ", ".gz"), "LOG");
        assert_eq!(single_output_name("dump.bz2", ".bz2"), "dump");
        assert_eq!(single_output_name("noext", ".gz"), "noext.out");
        // a name that is only the suffix would strip to nothing
        assert_eq!(single_output_name(".gz", ".gz"), ".gz.out");
    }

    #[test]
    fn decodes_a_gzip_stream_to_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("notes.txt.gz");
        let mut encoder =
            GzEncoder::new(File::create(&archive).unwrap(), Compression::default());
        encoder.write_all(b"remember the milk").unwrap();
        encoder.finish().unwrap();

        let staging = tempfile::tempdir().unwrap();
        extract_single_stream(&archive, staging.path(), ArchiveFormat::GzipSingle).unwrap();
        assert_eq!(
            fs::read(staging.path().join("notes.txt")).unwrap(),
            b"remember the milk"
        );
    }

    #[test]
    fn truncated_streams_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.gz");
        fs::write(&archive, b"\x1f\x8b\x08 definitely truncated").unwrap();

        let staging = tempfile::tempdir().unwrap();
        let err = extract_single_stream(&archive, staging.path(), ArchiveFormat::GzipSingle)
            .unwrap_err();
        assert!(matches!(err, Error::CorruptArchive { .. }));
    }
}
