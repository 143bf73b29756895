//! Capture moment extraction
//!
//! This module provides functionality to determine when a media file was
//! captured:
//! - EXIF metadata for images ("when photographed")
//! - FFprobe metadata for videos ("when encoded")
//! - Current local time when no metadata is available

pub mod exif;
pub mod video;

use crate::classify::MediaKind;
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use tracing::{debug, warn};

/// Source of the capture moment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// Extracted from EXIF metadata
    Exif,
    /// Extracted from video metadata via FFprobe
    VideoMetadata,
    /// No metadata available; current time at processing
    RunTime,
}

/// A resolved capture moment
#[derive(Debug, Clone)]
pub struct CaptureMoment {
    /// The capture timestamp, in local time
    pub timestamp: NaiveDateTime,
    /// Where the timestamp came from
    pub source: CaptureSource,
}

/// Probe a file for its capture timestamp
///
/// Returns `None` when the metadata is absent, malformed, or the probe
/// itself fails; all three cases are treated uniformly by the caller.
pub fn probe(path: &Path, kind: MediaKind) -> Option<NaiveDateTime> {
    let probed = match kind {
        MediaKind::Image => exif::extract_capture_time(path),
        MediaKind::Video => video::extract_encoded_time(path),
        MediaKind::Unrecognized => return None,
    };

    match probed {
        Ok(timestamp) => {
            debug!(?path, %timestamp, "Extracted capture moment");
            Some(timestamp)
        }
        Err(e) => {
            debug!(?path, error = %e, "No capture moment available");
            None
        }
    }
}

/// Resolve the capture moment for a file, falling back to the current
/// local time when the probe yields nothing
pub fn resolve(path: &Path, kind: MediaKind) -> CaptureMoment {
    match probe(path, kind) {
        Some(timestamp) => CaptureMoment {
            timestamp,
            source: match kind {
                MediaKind::Image => CaptureSource::Exif,
                _ => CaptureSource::VideoMetadata,
            },
        },
        None => {
            warn!(?path, "Using current time as capture moment fallback");
            CaptureMoment {
                timestamp: Local::now().naive_local(),
                source: CaptureSource::RunTime,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_probe_skips_unrecognized() {
        assert!(probe(Path::new("doc.txt"), MediaKind::Unrecognized).is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_run_time() {
        // A jpg with no EXIF payload has no capture moment
        let mut file = NamedTempFile::with_suffix(".jpg").unwrap();
        file.write_all(b"not an image").unwrap();
        file.flush().unwrap();

        let before = Local::now().naive_local();
        let moment = resolve(file.path(), MediaKind::Image);
        let after = Local::now().naive_local();

        assert_eq!(moment.source, CaptureSource::RunTime);
        assert!(moment.timestamp >= before && moment.timestamp <= after);
    }
}
