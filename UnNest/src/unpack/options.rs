//! Configuration for recursive unpack runs

use std::path::PathBuf;

/// Options controlling a recursive unpack run.
///
/// # Example
///
/// ```no_run
/// use unnest::unpack::{UnpackOptions, Unpacker};
///
/// let options = UnpackOptions::new()
///     .with_keep_originals(true)
///     .with_max_depth(8);
/// let mut unpacker = Unpacker::new(options);
/// let report = unpacker.run(&["downloads/bundle.tar.gz".into()]);
/// println!("extracted {} archives", report.extracted);
/// ```
#[derive(Debug, Clone)]
pub struct UnpackOptions {
    /// Base directory for the output of top-level archive *files*.
    /// If `None`, each archive unpacks next to itself. Archives found while
    /// walking a directory tree always unpack in place.
    pub output_base: Option<PathBuf>,

    /// Keep source archives after successful extraction.
    /// Default: false (delete after extraction).
    pub keep_originals: bool,

    /// Log intended mutations instead of performing them.
    pub dry_run: bool,

    /// Maximum extraction nesting depth; deeper archives are skipped with a
    /// warning. Guards against archives that regenerate themselves.
    pub max_depth: u32,

    /// Maximum number of extraction attempts per run.
    pub max_archives: usize,
}

impl UnpackOptions {
    /// Create options with the default policy: delete sources, real run,
    /// depth 16, at most 10 000 archives.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output_base: None,
            keep_originals: false,
            dry_run: false,
            max_depth: 16,
            max_archives: 10_000,
        }
    }

    /// Set the output base directory for top-level archive files.
    #[must_use]
    pub fn with_output_base(mut self, base: Option<PathBuf>) -> Self {
        self.output_base = base;
        self
    }

    /// Set whether source archives are kept after extraction.
    #[must_use]
    pub fn with_keep_originals(mut self, keep: bool) -> Self {
        self.keep_originals = keep;
        self
    }

    /// Set dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the maximum extraction nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the per-run cap on extraction attempts.
    #[must_use]
    pub fn with_max_archives(mut self, max: usize) -> Self {
        self.max_archives = max;
        self
    }
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_delete_sources_and_bound_recursion() {
        let options = UnpackOptions::new();
        assert!(!options.keep_originals);
        assert!(!options.dry_run);
        assert!(options.output_base.is_none());
        assert_eq!(options.max_depth, 16);
        assert_eq!(options.max_archives, 10_000);
    }
}
