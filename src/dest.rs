//! Destination path derivation from category and capture moment
//!
//! The destination directory groups files by month with both a sortable
//! numeric key and a readable month name (`Photos/2023.05 May`); the file
//! stem is a full timestamp down to milliseconds plus month and weekday
//! names (`2023.05.14 10.00.00.000 May Sunday`), which keeps names unique
//! to the millisecond and self-describing.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// A computed destination for a single move attempt
///
/// The stem and extension are held separately so that conflict resolution
/// can derive marker-suffixed siblings (`stem.00.ext`, `stem.01.ext`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationCandidate {
    /// Directory the file should land in
    pub directory: PathBuf,
    /// File name without extension
    pub stem: String,
    /// Extension including the leading dot; may be empty
    pub extension: String,
}

impl DestinationCandidate {
    /// Candidate preserving an original file name, split at the last dot
    ///
    /// Used for quarantine routing, where files keep their own names.
    pub fn from_original_name(directory: PathBuf, name: &str) -> Self {
        let (stem, extension) = match name.rfind('.') {
            Some(dot) => (name[..dot].to_string(), name[dot..].to_string()),
            None => (name.to_string(), String::new()),
        };
        Self {
            directory,
            stem,
            extension,
        }
    }

    /// Full path of the unmarked candidate
    pub fn path(&self) -> PathBuf {
        self.directory
            .join(format!("{}{}", self.stem, self.extension))
    }

    /// Full path with a two-digit disambiguation marker inserted before
    /// the extension
    pub fn marked_path(&self, marker: u32) -> PathBuf {
        self.directory
            .join(format!("{}.{:02}{}", self.stem, marker, self.extension))
    }
}

/// Build the destination for a categorized file from its capture moment
///
/// Pure function: no filesystem access, always succeeds.
pub fn build_destination(
    root: &Path,
    category: &str,
    capture: &NaiveDateTime,
    extension: &str,
) -> DestinationCandidate {
    let month_dir = capture.format("%Y.%m %B").to_string();
    let stem = capture.format("%Y.%m.%d %H.%M.%S.%3f %B %A").to_string();

    DestinationCandidate {
        directory: root.join(category).join(month_dir),
        stem,
        extension: extension.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_build_destination_layout() {
        let capture = NaiveDate::from_ymd_opt(2023, 5, 14)
            .unwrap()
            .and_hms_milli_opt(10, 0, 0, 0)
            .unwrap();

        let candidate = build_destination(Path::new("/library"), "Photos", &capture, ".jpg");

        assert_eq!(
            candidate.directory,
            PathBuf::from("/library/Photos/2023.05 May")
        );
        assert_eq!(candidate.stem, "2023.05.14 10.00.00.000 May Sunday");
        assert_eq!(
            candidate.path(),
            PathBuf::from("/library/Photos/2023.05 May/2023.05.14 10.00.00.000 May Sunday.jpg")
        );
    }

    #[test]
    fn test_milliseconds_are_zero_padded() {
        let capture = NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 58, 7)
            .unwrap();

        let candidate = build_destination(Path::new("/out"), "Videos", &capture, ".mp4");
        assert_eq!(candidate.stem, "2024.12.31 23.59.58.007 December Tuesday");
    }

    #[test]
    fn test_marked_path_inserts_marker_before_extension() {
        let candidate =
            DestinationCandidate::from_original_name(PathBuf::from("/quarantine"), "photo.jpg");

        assert_eq!(candidate.path(), PathBuf::from("/quarantine/photo.jpg"));
        assert_eq!(
            candidate.marked_path(0),
            PathBuf::from("/quarantine/photo.00.jpg")
        );
        assert_eq!(
            candidate.marked_path(13),
            PathBuf::from("/quarantine/photo.13.jpg")
        );
    }

    #[test]
    fn test_original_name_without_extension() {
        let candidate =
            DestinationCandidate::from_original_name(PathBuf::from("/quarantine"), "README");

        assert_eq!(candidate.path(), PathBuf::from("/quarantine/README"));
        assert_eq!(
            candidate.marked_path(0),
            PathBuf::from("/quarantine/README.00")
        );
    }
}
