//! Archive member model and name validation
//!
//! Every format decoder reduces its entries to the same [`MemberKind`] shape
//! so the extraction loop can dispatch uniformly, and every member name is
//! checked with [`is_safe_member_name`] before a single byte is written.
//! Validation is all-or-nothing per archive: one bad name rejects the whole
//! archive, so a destination is never left partially populated.

use crate::error::{Error, Result};

/// The kind of an entry inside an archive.
///
/// Only `RegularFile` and `Directory` are ever materialized; everything else
/// is skipped silently during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Regular file with a byte stream.
    RegularFile,
    /// Directory entry.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Hard link to another member.
    HardLink,
    /// Device node, FIFO, socket, or other special file.
    Special,
}

impl MemberKind {
    /// Whether this member kind is written to the staging area.
    pub fn is_extractable(self) -> bool {
        matches!(self, Self::RegularFile | Self::Directory)
    }
}

/// Decide whether a raw archive member name is safe to materialize on disk.
///
/// A name is rejected when it:
/// - is empty,
/// - is absolute (`/...`) or looks like a Windows drive path (`C:...`),
/// - contains a backslash (Windows-style separators on a POSIX target),
/// - contains a `..` path segment.
pub fn is_safe_member_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name.starts_with('/') {
        return false;
    }
    let bytes = name.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        return false;
    }
    if name.contains('\\') {
        return false;
    }
    if name.split('/').any(|segment| segment == "..") {
        return false;
    }
    true
}

/// Validate every member name up front, before extraction begins.
///
/// Returns [`Error::UnsafeMember`] naming the first offender, in which case
/// the caller must abort the whole archive with zero bytes written.
pub fn ensure_all_safe<I, S>(names: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for name in names {
        let name = name.as_ref();
        if !is_safe_member_name(name) {
            return Err(Error::UnsafeMember {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_files_and_directories_are_extractable() {
        assert!(MemberKind::RegularFile.is_extractable());
        assert!(MemberKind::Directory.is_extractable());
        assert!(!MemberKind::Symlink.is_extractable());
        assert!(!MemberKind::HardLink.is_extractable());
        assert!(!MemberKind::Special.is_extractable());
    }

    #[test]
    fn plain_relative_names_are_safe() {
        assert!(is_safe_member_name("readme.txt"));
        assert!(is_safe_member_name("docs/manual.pdf"));
        assert!(is_safe_member_name("a/b/c/d"));
        assert!(is_safe_member_name("dir/")); // trailing slash from zip dir entries
        assert!(is_safe_member_name("..hidden")); // dots inside a segment are fine
        assert!(is_safe_member_name("a/..b/c"));
    }

    #[test]
    fn parent_segments_are_rejected() {
        assert!(!is_safe_member_name(".."));
        assert!(!is_safe_member_name("../etc/passwd"));
        assert!(!is_safe_member_name("safe/../../escape"));
        assert!(!is_safe_member_name("deep/ok/.."));
    }

    #[test]
    fn absolute_and_drive_paths_are_rejected() {
        assert!(!is_safe_member_name("/etc/passwd"));
        assert!(!is_safe_member_name("C:/windows/system32"));
        assert!(!is_safe_member_name("c:relative"));
    }

    #[test]
    fn backslashes_and_empty_names_are_rejected() {
        assert!(!is_safe_member_name(""));
        assert!(!is_safe_member_name("dir\\file.txt"));
        assert!(!is_safe_member_name("..\\escape"));
    }

    #[test]
    fn ensure_all_safe_names_the_first_offender() {
        let err = ensure_all_safe(["ok.txt", "../bad", "later"]).unwrap_err();
        match err {
            Error::UnsafeMember { name } => assert_eq!(name, "../bad"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(ensure_all_safe(["a", "b/c"]).is_ok());
    }
}
