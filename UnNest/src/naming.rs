//! Output directory naming for extracted archives
//!
//! Top-level archives (those supplied directly by the caller) get a capture
//! timestamp prefixed to their folder name; archives discovered inside
//! previously extracted output keep their natural name, preserving the
//! structure of the unpacked tree.

use chrono::Local;

use crate::archive::recognized_suffix;

/// Format of the capture timestamp prefix, e.g. `250827-14-03-22`.
const TIMESTAMP_FORMAT: &str = "%y%m%d-%H-%M-%S";

/// Derive the output folder name for an archive file name.
///
/// The longest recognized archive suffix is stripped (`.tar.gz` before
/// `.gz`); unrecognized names lose their last extension, or gain
/// `_extracted` when there is nothing to strip. When `top_level` is true
/// the result is prefixed with the current timestamp.
pub fn output_folder_name(file_name: &str, top_level: bool) -> String {
    let base = strip_archive_suffix(file_name);
    if top_level {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        format!("{timestamp}_{base}")
    } else {
        base
    }
}

/// The folder base name: file name minus its archive suffix.
fn strip_archive_suffix(file_name: &str) -> String {
    if let Some(suffix) = recognized_suffix(file_name) {
        let stripped = &file_name[..file_name.len() - suffix.len()];
        if !stripped.is_empty() {
            return stripped.to_string();
        }
    } else if let Some(dot) = file_name.rfind('.') {
        if dot > 0 {
            return file_name[..dot].to_string();
        }
    }
    format!("{file_name}_extracted")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_suffixes_are_stripped_as_a_unit() {
        assert_eq!(strip_archive_suffix("bundle.tar.gz"), "bundle");
        assert_eq!(strip_archive_suffix("bundle.tgz"), "bundle");
        assert_eq!(strip_archive_suffix("photos.zip"), "photos");
        assert_eq!(strip_archive_suffix("data.v2.tar.bz2"), "data.v2");
    }

    #[test]
    fn unrecognized_names_lose_their_last_extension() {
        assert_eq!(strip_archive_suffix("archive.dat"), "archive");
        assert_eq!(strip_archive_suffix("a.b.c"), "a.b");
    }

    #[test]
    fn bare_names_get_the_extracted_fallback() {
        assert_eq!(strip_archive_suffix("archive"), "archive_extracted");
        // stripping would leave nothing usable
        assert_eq!(strip_archive_suffix(".zip"), ".zip_extracted");
        assert_eq!(strip_archive_suffix(".hidden"), ".hidden_extracted");
    }

    #[test]
    fn nested_names_carry_no_timestamp() {
        assert_eq!(output_folder_name("inner.zip", false), "inner");
    }

    #[test]
    fn top_level_names_are_timestamp_prefixed() {
        let name = output_folder_name("bundle.tar.gz", true);
        // YYMMDD-HH-MM-SS_bundle
        let (prefix, base) = name.split_once('_').unwrap();
        assert_eq!(base, "bundle");
        assert_eq!(prefix.len(), 15);
        let digits: String = prefix.chars().filter(char::is_ascii_digit).collect();
        assert_eq!(digits.len(), 12);
        assert_eq!(prefix.matches('-').count(), 3);
    }
}
