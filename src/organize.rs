//! Sequential organizing pipeline
//!
//! Drives the per-file flow: walk the source tree, classify each file,
//! resolve its capture moment, derive the destination, and hand the move to
//! the conflict resolver. Files are processed strictly one at a time in walk
//! order; per-file failures are converted into quarantine moves and never
//! abort the run.

use crate::capture::{self, CaptureSource};
use crate::classify::classify;
use crate::dest::{DestinationCandidate, build_destination};
use crate::error::{Error, Result};
use crate::resolve::{ConflictOutcome, resolve_and_move};
use crate::walk::walk_files;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Why a file was routed to quarantine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuarantineReason {
    /// Extension maps to no recognized media kind
    Unrecognized,
    /// The file name carries no extension at all
    NoExtension,
    /// A filesystem operation failed mid-processing
    ProcessingFailure(String),
}

impl fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuarantineReason::Unrecognized => write!(f, "unrecognized file type"),
            QuarantineReason::NoExtension => write!(f, "no file extension"),
            QuarantineReason::ProcessingFailure(msg) => write!(f, "processing failure: {}", msg),
        }
    }
}

/// Terminal outcome for a single visited file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Moved into the date-organized destination tree
    Relocated { destination: PathBuf },
    /// Deleted because an identical copy already existed
    DuplicateDiscarded { existing: PathBuf },
    /// Moved into the quarantine directory
    Quarantined {
        destination: PathBuf,
        reason: QuarantineReason,
    },
    /// Left in place; even the quarantine move failed
    Failed { error: String },
}

/// Record of one processed file
#[derive(Debug, Clone)]
pub struct FileReport {
    /// Original path in the source tree
    pub source: PathBuf,
    /// What happened to it
    pub outcome: FileOutcome,
}

/// Running counters for a single organizing run
#[derive(Debug, Default, Clone)]
pub struct OrganizeStats {
    pub relocated: usize,
    pub duplicates: usize,
    pub quarantined: usize,
    pub failed: usize,
    pub unreadable_dirs: usize,
}

impl OrganizeStats {
    pub fn summary(&self) -> String {
        format!(
            "Relocated: {}, Duplicates: {}, Quarantined: {}, Failed: {}, Unreadable dirs: {}",
            self.relocated, self.duplicates, self.quarantined, self.failed, self.unreadable_dirs
        )
    }
}

/// Main organizer for sorting a source tree into the destination library
pub struct Organizer {
    destination: PathBuf,
    quarantine: PathBuf,
    stats: OrganizeStats,
}

impl Organizer {
    /// Create an organizer targeting the given destination and quarantine
    /// roots
    pub fn new(destination: PathBuf, quarantine: PathBuf) -> Self {
        Self {
            destination,
            quarantine,
            stats: OrganizeStats::default(),
        }
    }

    /// Organize every file under `source`
    ///
    /// Fails fast only when the source directory itself is missing;
    /// everything past that point is a per-file outcome.
    pub fn run(&mut self, source: &Path) -> Result<Vec<FileReport>> {
        if !source.is_dir() {
            return Err(Error::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        info!(source = %source.display(), "Scanning source tree");

        let mut reports = Vec::new();
        for entry in walk_files(source) {
            match entry {
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory");
                    self.stats.unreadable_dirs += 1;
                }
                Ok(path) => {
                    debug!(path = %path.display(), "Processing file");
                    let outcome = self.place_file(&path);
                    self.tally(&outcome);
                    reports.push(FileReport {
                        source: path,
                        outcome,
                    });
                }
            }
        }

        info!("{}", self.stats.summary());
        Ok(reports)
    }

    /// Decide where a single file belongs and move it there
    fn place_file(&self, path: &Path) -> FileOutcome {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let classification = match classify(&name) {
            Ok(c) => c,
            Err(e) => {
                warn!(?path, error = %e, "Cannot classify file");
                return self.quarantine_file(path, &name, QuarantineReason::NoExtension);
            }
        };

        let Some(category) = classification.kind.category() else {
            debug!(?path, extension = %classification.extension, "Unrecognized media kind");
            return self.quarantine_file(path, &name, QuarantineReason::Unrecognized);
        };

        let moment = capture::resolve(path, classification.kind);
        let candidate = build_destination(
            &self.destination,
            category,
            &moment.timestamp,
            &classification.extension,
        );

        match resolve_and_move(path, &candidate) {
            Ok(ConflictOutcome::DuplicateDiscard { existing }) => {
                FileOutcome::DuplicateDiscarded { existing }
            }
            Ok(outcome) => {
                let destination = outcome.final_path().to_path_buf();
                info!(
                    source = %path.display(),
                    destination = %destination.display(),
                    fallback_time = moment.source == CaptureSource::RunTime,
                    "Relocated file"
                );
                FileOutcome::Relocated { destination }
            }
            Err(e) => {
                error!(?path, error = %e, "Relocation failed, rerouting to quarantine");
                self.quarantine_file(path, &name, QuarantineReason::ProcessingFailure(e.to_string()))
            }
        }
    }

    /// Move a file into the flat quarantine directory under its original
    /// name, deduplicating against whatever is already there
    fn quarantine_file(&self, path: &Path, name: &str, reason: QuarantineReason) -> FileOutcome {
        let candidate = DestinationCandidate::from_original_name(self.quarantine.clone(), name);

        match resolve_and_move(path, &candidate) {
            Ok(ConflictOutcome::DuplicateDiscard { existing }) => {
                FileOutcome::DuplicateDiscarded { existing }
            }
            Ok(outcome) => FileOutcome::Quarantined {
                destination: outcome.final_path().to_path_buf(),
                reason,
            },
            Err(e) => {
                error!(?path, error = %e, "Quarantine move failed, file left in place");
                FileOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn tally(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Relocated { .. } => self.stats.relocated += 1,
            FileOutcome::DuplicateDiscarded { .. } => self.stats.duplicates += 1,
            FileOutcome::Quarantined { .. } => self.stats.quarantined += 1,
            FileOutcome::Failed { .. } => self.stats.failed += 1,
        }
    }

    /// Counters for the run so far
    pub fn stats(&self) -> &OrganizeStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    struct Fixture {
        _root: tempfile::TempDir,
        source: PathBuf,
        destination: PathBuf,
        quarantine: PathBuf,
    }

    fn fixture() -> Fixture {
        let root = tempdir().unwrap();
        let source = root.path().join("source");
        let destination = root.path().join("library");
        let quarantine = root.path().join("unprocessed");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&destination).unwrap();
        fs::create_dir_all(&quarantine).unwrap();
        Fixture {
            _root: root,
            source,
            destination,
            quarantine,
        }
    }

    fn write_file(path: &Path, contents: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn run(fx: &Fixture) -> (Vec<FileReport>, OrganizeStats) {
        let mut organizer = Organizer::new(fx.destination.clone(), fx.quarantine.clone());
        let reports = organizer.run(&fx.source).unwrap();
        let stats = organizer.stats().clone();
        (reports, stats)
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let fx = fixture();
        let mut organizer = Organizer::new(fx.destination.clone(), fx.quarantine.clone());
        assert!(matches!(
            organizer.run(&fx.source.join("absent")),
            Err(Error::SourceNotFound { .. })
        ));
    }

    #[test]
    fn test_unrecognized_file_goes_to_quarantine_under_original_name() {
        let fx = fixture();
        write_file(&fx.source.join("doc.txt"), b"text");

        let (reports, stats) = run(&fx);

        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].outcome,
            FileOutcome::Quarantined {
                destination: fx.quarantine.join("doc.txt"),
                reason: QuarantineReason::Unrecognized,
            }
        );
        assert!(fx.quarantine.join("doc.txt").exists());
        assert!(!fx.source.join("doc.txt").exists());
        assert_eq!(stats.quarantined, 1);

        // No category directories were created for it
        assert!(!fx.destination.join("Photos").exists());
        assert!(!fx.destination.join("Videos").exists());
    }

    #[test]
    fn test_file_without_extension_goes_to_quarantine() {
        let fx = fixture();
        write_file(&fx.source.join("README"), b"no dot");

        let (reports, _) = run(&fx);

        assert_eq!(
            reports[0].outcome,
            FileOutcome::Quarantined {
                destination: fx.quarantine.join("README"),
                reason: QuarantineReason::NoExtension,
            }
        );
    }

    #[test]
    fn test_image_lands_under_photos() {
        let fx = fixture();
        // No EXIF payload, so the capture moment falls back to run time
        write_file(&fx.source.join("img001.jpg"), b"jpeg-ish bytes");

        let (reports, stats) = run(&fx);

        assert_eq!(stats.relocated, 1);
        let FileOutcome::Relocated { destination } = &reports[0].outcome else {
            panic!("expected relocation, got {:?}", reports[0].outcome);
        };
        assert!(destination.starts_with(fx.destination.join("Photos")));
        assert!(destination.to_string_lossy().ends_with(".jpg"));
        assert!(destination.exists());
        assert!(!fx.source.join("img001.jpg").exists());
        // Nothing went to quarantine
        assert_eq!(fs::read_dir(&fx.quarantine).unwrap().count(), 0);
    }

    #[test]
    fn test_video_lands_under_videos_with_runtime_fallback() {
        let fx = fixture();
        write_file(&fx.source.join("clip.mov"), b"not a real movie");

        let (reports, _) = run(&fx);

        let FileOutcome::Relocated { destination } = &reports[0].outcome else {
            panic!("expected relocation, got {:?}", reports[0].outcome);
        };
        assert!(destination.starts_with(fx.destination.join("Videos")));
        assert!(destination.to_string_lossy().ends_with(".mov"));
    }

    #[test]
    fn test_extension_is_lowercased_in_destination() {
        let fx = fixture();
        write_file(&fx.source.join("IMG_0042.JPG"), b"bytes");

        let (reports, _) = run(&fx);

        let FileOutcome::Relocated { destination } = &reports[0].outcome else {
            panic!("expected relocation, got {:?}", reports[0].outcome);
        };
        assert!(destination.to_string_lossy().ends_with(".jpg"));
    }

    #[test]
    fn test_identical_quarantine_occupant_discards_source() {
        let fx = fixture();
        write_file(&fx.source.join("doc.txt"), b"same");
        write_file(&fx.quarantine.join("doc.txt"), b"same");

        let (reports, stats) = run(&fx);

        assert_eq!(
            reports[0].outcome,
            FileOutcome::DuplicateDiscarded {
                existing: fx.quarantine.join("doc.txt"),
            }
        );
        assert_eq!(stats.duplicates, 1);
        assert_eq!(fs::read_dir(&fx.quarantine).unwrap().count(), 1);
    }

    #[test]
    fn test_distinct_quarantine_occupant_gets_marker() {
        let fx = fixture();
        write_file(&fx.source.join("doc.txt"), b"new content");
        write_file(&fx.quarantine.join("doc.txt"), b"old content");

        let (reports, _) = run(&fx);

        assert_eq!(
            reports[0].outcome,
            FileOutcome::Quarantined {
                destination: fx.quarantine.join("doc.00.txt"),
                reason: QuarantineReason::Unrecognized,
            }
        );
        // The original occupant is untouched
        assert_eq!(fs::read(fx.quarantine.join("doc.txt")).unwrap(), b"old content");
        assert_eq!(
            fs::read(fx.quarantine.join("doc.00.txt")).unwrap(),
            b"new content"
        );
    }

    #[test]
    fn test_nested_source_directories_are_drained() {
        let fx = fixture();
        write_file(&fx.source.join("a.txt"), b"a");
        write_file(&fx.source.join("nested").join("b.txt"), b"b");
        write_file(&fx.source.join("nested").join("deeper").join("c.txt"), b"c");

        let (reports, stats) = run(&fx);

        assert_eq!(reports.len(), 3);
        assert_eq!(stats.quarantined, 3);
        for name in ["a.txt", "b.txt", "c.txt"] {
            assert!(fx.quarantine.join(name).exists());
        }
    }

    #[test]
    fn test_stats_summary_mentions_each_counter() {
        let stats = OrganizeStats {
            relocated: 3,
            duplicates: 2,
            quarantined: 1,
            failed: 0,
            unreadable_dirs: 0,
        };
        let summary = stats.summary();
        assert!(summary.contains("Relocated: 3"));
        assert!(summary.contains("Duplicates: 2"));
        assert!(summary.contains("Quarantined: 1"));
    }
}
