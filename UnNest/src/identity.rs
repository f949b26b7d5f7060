//! Filesystem identity tracking for processed archives
//!
//! Two paths that resolve to the same device and inode are the same archive;
//! tracking identities breaks cycles and keeps hard-linked duplicates from
//! being extracted twice. On filesystems without stat identity the archive
//! is treated as always-unseen, a conservative degradation.

use std::collections::HashSet;
use std::path::Path;

/// A `(device, inode)` pair identifying a file independent of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    dev: u64,
    ino: u64,
}

/// Resolve the identity of the real file behind `path`, if the platform
/// supports it.
pub fn file_identity(path: &Path) -> Option<FileIdentity> {
    let resolved = path.canonicalize().ok()?;
    let metadata = std::fs::metadata(resolved).ok()?;
    identity_of(&metadata)
}

#[cfg(unix)]
fn identity_of(metadata: &std::fs::Metadata) -> Option<FileIdentity> {
    use std::os::unix::fs::MetadataExt;
    Some(FileIdentity {
        dev: metadata.dev(),
        ino: metadata.ino(),
    })
}

#[cfg(not(unix))]
fn identity_of(_metadata: &std::fs::Metadata) -> Option<FileIdentity> {
    None
}

/// Append-only set of archive identities handled in the current run.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    seen: HashSet<FileIdentity>,
}

impl IdentityTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this identity has already been processed.
    pub fn seen(&self, identity: FileIdentity) -> bool {
        self.seen.contains(&identity)
    }

    /// Record an identity as processed.
    pub fn mark_seen(&mut self, identity: FileIdentity) {
        self.seen.insert(identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn hard_links_share_an_identity() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("archive.zip");
        let alias = dir.path().join("alias.zip");
        std::fs::write(&original, b"data").unwrap();
        std::fs::hard_link(&original, &alias).unwrap();

        let a = file_identity(&original).unwrap();
        let b = file_identity(&alias).unwrap();
        assert_eq!(a, b);

        let other = dir.path().join("other.zip");
        std::fs::write(&other, b"data").unwrap();
        assert_ne!(a, file_identity(&other).unwrap());
    }

    #[test]
    fn missing_paths_have_no_identity() {
        assert!(file_identity(Path::new("/no/such/file/anywhere")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn tracker_remembers_marked_identities() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.tar");
        std::fs::write(&file, b"x").unwrap();
        let id = file_identity(&file).unwrap();

        let mut tracker = IdentityTracker::new();
        assert!(!tracker.seen(id));
        tracker.mark_seen(id);
        assert!(tracker.seen(id));
    }
}
