//! Recursive unpack driver
//!
//! Walks the input tree with an explicit worklist, classifies files by
//! suffix, extracts archive candidates through staging, commits them, and
//! recurses into freshly produced output. Anything produced by extraction
//! is nested content: its output folder carries no timestamp prefix, no
//! matter how the run was started.
//!
//! In dry-run mode archives are still staged and validated (staging is
//! disposable), but commits, deletions, and destination creation are
//! replaced by logged intentions. Each staged tree is retained for the rest
//! of the run so nested archives are discovered and reported against their
//! would-be destinations, giving a dry run the same decision sequence as a
//! real one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveFormat, DecoderRegistry};
use crate::error::Error;
use crate::identity::{IdentityTracker, file_identity};
use crate::naming::output_folder_name;
use crate::staging::{StagingDir, commit_staged, remove_dir_if_empty};
use crate::unpack::options::UnpackOptions;
use crate::unpack::report::{ArchiveOutcome, ArchiveStatus, SkipReason, UnpackReport};

/// Progress callback, invoked once per archive outcome as it is decided.
pub type ProgressCallback<'a> = &'a (dyn Fn(&ArchiveOutcome) + Sync + Send);

/// One entry on the traversal worklist.
#[derive(Debug)]
struct WorkItem {
    /// Where the file or directory actually is.
    path: PathBuf,
    /// Reported location, when `path` lives inside retained dry-run staging.
    logical: Option<PathBuf>,
    /// False only for paths supplied directly by the caller.
    nested: bool,
    /// Extraction nesting level (0 for caller-supplied paths).
    depth: u32,
    /// Output base override; set only for top-level archive files.
    output_base: Option<PathBuf>,
}

impl WorkItem {
    /// The path this item is reported as.
    fn display_path(&self) -> &Path {
        self.logical.as_deref().unwrap_or(&self.path)
    }
}

/// The recursive extraction engine.
pub struct Unpacker {
    options: UnpackOptions,
    registry: DecoderRegistry,
    tracker: IdentityTracker,
    attempts: usize,
    // Dry-run only: staged trees kept alive so nested archives stay
    // discoverable until the run ends.
    retained_staging: Vec<StagingDir>,
}

impl Unpacker {
    /// Create an unpacker with the capabilities compiled into this build.
    pub fn new(options: UnpackOptions) -> Self {
        Self {
            options,
            registry: DecoderRegistry::with_available(),
            tracker: IdentityTracker::new(),
            attempts: 0,
            retained_staging: Vec::new(),
        }
    }

    /// Process all inputs recursively and report per-archive outcomes.
    pub fn run(&mut self, inputs: &[PathBuf]) -> UnpackReport {
        self.run_with_progress(inputs, &|_| {})
    }

    /// Like [`run`](Self::run), invoking `progress` for every outcome as it
    /// is decided.
    pub fn run_with_progress(
        &mut self,
        inputs: &[PathBuf],
        progress: ProgressCallback,
    ) -> UnpackReport {
        let mut report = UnpackReport::new();
        let mut stack: Vec<WorkItem> = Vec::new();

        // Depth-first: reverse so the first input is processed first.
        for input in inputs.iter().rev() {
            if !input.exists() {
                tracing::error!("Input not found: {}", input.display());
                note(
                    &mut report,
                    progress,
                    ArchiveOutcome {
                        archive: input.clone(),
                        status: ArchiveStatus::Failed("input not found".to_string()),
                    },
                );
                continue;
            }
            // A file handed to us directly must be an archive; unrecognized
            // files found while walking a directory are silently irrelevant.
            if input.is_file() && ArchiveFormat::from_path(input).is_none() {
                let e = Error::NotAnArchive {
                    path: input.clone(),
                };
                tracing::error!("{e}");
                note(
                    &mut report,
                    progress,
                    ArchiveOutcome {
                        archive: input.clone(),
                        status: ArchiveStatus::Failed(e.to_string()),
                    },
                );
                continue;
            }
            // The output base applies to archives handed to us directly;
            // archives found inside a directory tree unpack in place.
            let output_base = if input.is_file() {
                self.options.output_base.clone()
            } else {
                None
            };
            stack.push(WorkItem {
                path: input.clone(),
                logical: None,
                nested: false,
                depth: 0,
                output_base,
            });
        }

        while let Some(item) = stack.pop() {
            if item.path.is_dir() {
                push_children(&item, &mut stack);
                continue;
            }
            if let Some(format) = ArchiveFormat::from_path(&item.path) {
                self.process_archive(item, format, &mut stack, &mut report, progress);
            }
            // Any other regular file is irrelevant to the walk.
        }

        self.retained_staging.clear();
        report
    }

    /// Handle one archive candidate end to end.
    fn process_archive(
        &mut self,
        item: WorkItem,
        format: ArchiveFormat,
        stack: &mut Vec<WorkItem>,
        report: &mut UnpackReport,
        progress: ProgressCallback,
    ) {
        // Not named `display`: the tracing macros pull their field helper of
        // that name into scope and would shadow the local.
        let shown = item.display_path().to_path_buf();
        let outcome = |status: ArchiveStatus| ArchiveOutcome {
            archive: shown.clone(),
            status,
        };

        if item.depth > self.options.max_depth || self.attempts >= self.options.max_archives {
            tracing::warn!(
                "Recursion limit reached, not extracting: {}",
                shown.display()
            );
            note(report, progress, outcome(ArchiveStatus::Skipped(SkipReason::LimitReached)));
            return;
        }

        let identity = file_identity(&item.path);
        if let Some(id) = identity {
            if self.tracker.seen(id) {
                tracing::debug!("Already processed: {}", shown.display());
                note(
                    report,
                    progress,
                    outcome(ArchiveStatus::Skipped(SkipReason::AlreadyProcessed)),
                );
                return;
            }
        }

        let Some(file_name) = item.path.file_name().and_then(|n| n.to_str()) else {
            note(
                report,
                progress,
                outcome(ArchiveStatus::Failed("invalid file name".to_string())),
            );
            return;
        };
        let folder = output_folder_name(file_name, !item.nested);
        let destination = destination_parent(&item).join(&folder);

        // A staged dry-run item's logical destination never exists on disk;
        // the sibling directory in staging is the collision signal there.
        let staged_collision = item.logical.is_some()
            && item
                .path
                .parent()
                .is_some_and(|parent| parent.join(&folder).exists());
        if destination.exists() || staged_collision {
            tracing::warn!(
                "Output folder exists, skipping {}: {}",
                shown.display(),
                destination.display()
            );
            note(
                report,
                progress,
                outcome(ArchiveStatus::Skipped(SkipReason::DestinationExists)),
            );
            return;
        }

        let Some(decoder) = self.registry.get(format) else {
            tracing::info!(
                "No {format} decoder in this build, skipping: {}",
                shown.display()
            );
            note(
                report,
                progress,
                outcome(ArchiveStatus::Skipped(SkipReason::UnsupportedFormat)),
            );
            return;
        };

        self.attempts += 1;
        let staging = match StagingDir::new() {
            Ok(staging) => staging,
            Err(e) => {
                tracing::error!("Could not create staging directory: {e}");
                note(report, progress, outcome(ArchiveStatus::Failed(e.to_string())));
                return;
            }
        };

        tracing::info!("Extracting {} -> {}", shown.display(), destination.display());
        if let Err(e) = decoder(&item.path, staging.path()) {
            match &e {
                Error::UnsafeMember { .. } => {
                    tracing::error!("Rejected {}: {e}", shown.display());
                }
                _ => tracing::error!("Extraction failed for {}: {e}", shown.display()),
            }
            remove_dir_if_empty(&destination);
            note(report, progress, outcome(ArchiveStatus::Failed(e.to_string())));
            return;
        }

        if self.options.dry_run {
            self.finish_dry_run(&item, staging, &destination, identity, stack);
            note(report, progress, outcome(ArchiveStatus::Extracted { destination }));
            return;
        }

        match commit_staged(staging.path(), &destination) {
            Ok(summary) => {
                if summary.skipped > 0 {
                    tracing::warn!(
                        "{} staged entries skipped while committing {}",
                        summary.skipped,
                        destination.display()
                    );
                }
                if !self.options.keep_originals {
                    match fs::remove_file(&item.path) {
                        Ok(()) => {
                            tracing::info!("Removed original archive: {}", shown.display());
                        }
                        Err(e) => tracing::warn!(
                            "Could not remove original {}: {e}",
                            shown.display()
                        ),
                    }
                }
                if let Some(id) = identity {
                    self.tracker.mark_seen(id);
                }
                // Everything produced by extraction is nested content.
                stack.push(WorkItem {
                    path: destination.clone(),
                    logical: None,
                    nested: true,
                    depth: item.depth + 1,
                    output_base: None,
                });
                note(report, progress, outcome(ArchiveStatus::Extracted { destination }));
            }
            Err(e) => {
                tracing::error!("Failed to commit {}: {e}", destination.display());
                remove_dir_if_empty(&destination);
                note(report, progress, outcome(ArchiveStatus::Failed(e.to_string())));
            }
        }
    }

    /// Dry-run tail: log the intended mutations, keep the staged tree alive,
    /// and schedule nested discovery inside it.
    fn finish_dry_run(
        &mut self,
        item: &WorkItem,
        staging: StagingDir,
        destination: &Path,
        identity: Option<crate::identity::FileIdentity>,
        stack: &mut Vec<WorkItem>,
    ) {
        tracing::info!(
            "[dry-run] Would commit staged contents to {}",
            destination.display()
        );
        if !self.options.keep_originals {
            tracing::info!(
                "[dry-run] Would remove original archive: {}",
                item.display_path().display()
            );
        }
        if let Some(id) = identity {
            self.tracker.mark_seen(id);
        }
        let staging_root = staging.path().to_path_buf();
        self.retained_staging.push(staging);
        stack.push(WorkItem {
            path: staging_root,
            logical: Some(destination.to_path_buf()),
            nested: true,
            depth: item.depth + 1,
            output_base: None,
        });
    }
}

/// Where the output folder for this archive goes.
fn destination_parent(item: &WorkItem) -> PathBuf {
    if let Some(base) = &item.output_base {
        return base.clone();
    }
    item.display_path()
        .parent()
        .map_or_else(PathBuf::new, Path::to_path_buf)
}

/// Expand a directory item into child work items, preserving the nesting
/// flag. Children are pushed in reverse name order so the stack pops them
/// alphabetically.
fn push_children(item: &WorkItem, stack: &mut Vec<WorkItem>) {
    let entries = match fs::read_dir(&item.path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Cannot list directory {}: {e}", item.path.display());
            return;
        }
    };
    let mut children: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    children.sort();

    for child in children.into_iter().rev() {
        let logical = match (&item.logical, child.file_name()) {
            (Some(logical), Some(name)) => Some(logical.join(name)),
            _ => None,
        };
        stack.push(WorkItem {
            path: child,
            logical,
            nested: item.nested,
            depth: item.depth,
            output_base: None,
        });
    }
}

/// Record an outcome and notify the progress callback.
fn note(report: &mut UnpackReport, progress: ProgressCallback, outcome: ArchiveOutcome) {
    progress(&outcome);
    report.record(outcome);
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, data) in entries {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn missing_inputs_are_reported_failed() {
        let mut unpacker = Unpacker::new(UnpackOptions::new());
        let report = unpacker.run(&[PathBuf::from("/no/such/input.zip")]);
        assert_eq!(report.failed, 1);
        assert!(matches!(
            report.outcomes[0].status,
            ArchiveStatus::Failed(_)
        ));
    }

    #[test]
    fn archive_cap_skips_with_limit_reason() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("f.txt", b"x")]);

        let mut unpacker = Unpacker::new(UnpackOptions::new().with_max_archives(0));
        let report = unpacker.run(&[archive.clone()]);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            report.outcomes[0].status,
            ArchiveStatus::Skipped(SkipReason::LimitReached)
        );
        // the source is untouched
        assert!(archive.exists());
    }

    #[cfg(not(feature = "rar"))]
    #[test]
    fn unsupported_formats_are_skipped_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("locked.rar");
        fs::write(&archive, b"Rar!\x1a\x07\x00").unwrap();

        let mut unpacker = Unpacker::new(UnpackOptions::new());
        let report = unpacker.run(&[archive.clone()]);
        assert_eq!(report.skipped, 1);
        assert_eq!(
            report.outcomes[0].status,
            ArchiveStatus::Skipped(SkipReason::UnsupportedFormat)
        );
        assert!(archive.exists());
    }

    #[test]
    fn non_archive_file_inputs_are_reported_failed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, b"plain").unwrap();

        let mut unpacker = Unpacker::new(UnpackOptions::new());
        let report = unpacker.run(&[file.clone()]);
        assert_eq!(report.failed, 1);
        match &report.outcomes[0].status {
            ArchiveStatus::Failed(message) => {
                assert!(message.contains("not a recognized archive"));
            }
            other => panic!("unexpected status: {other:?}"),
        }
        assert!(file.exists());
    }

    #[test]
    fn irrelevant_files_produce_no_outcome() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"plain").unwrap();

        let mut unpacker = Unpacker::new(UnpackOptions::new());
        let report = unpacker.run(&[dir.path().to_path_buf()]);
        assert!(report.outcomes.is_empty());
    }
}
