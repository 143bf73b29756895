//! Video encode time extraction via FFprobe

use crate::error::{Error, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, trace};

/// Metadata keys to try for the encode date
const ENCODE_DATE_KEYS: &[&str] = &[
    "creation_time",
    "com.apple.quicktime.creationdate",
    "date",
    "date_recorded",
];

/// Cached FFprobe availability check
static FFPROBE_AVAILABLE: OnceLock<bool> = OnceLock::new();

fn is_ffprobe_available() -> bool {
    *FFPROBE_AVAILABLE.get_or_init(|| Command::new("ffprobe").arg("-version").output().is_ok())
}

/// Extract the encode time from video metadata using FFprobe
///
/// Video containers store the encode time in UTC; the result is converted
/// to the local system timezone so it lines up with EXIF times.
pub fn extract_encoded_time(path: &Path) -> Result<NaiveDateTime> {
    if !is_ffprobe_available() {
        return Err(Error::FfprobeNotFound);
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!("Failed to execute ffprobe: {}", e),
        })?;

    if !output.status.success() {
        return Err(Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!(
                "FFprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ),
        });
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    trace!(?path, "FFprobe output: {}", json_str);

    let json: serde_json::Value =
        serde_json::from_str(&json_str).map_err(|e| Error::VideoMetadata {
            path: path.to_path_buf(),
            message: format!("Failed to parse FFprobe JSON: {}", e),
        })?;

    let mut utc_time: Option<NaiveDateTime> = None;

    // Format-level tags first
    if let Some(tags) = json.get("format").and_then(|f| f.get("tags")) {
        utc_time = find_encode_time(tags);
        if utc_time.is_some() {
            debug!(?path, "Found encode time in format tags");
        }
    }

    // Then per-stream tags
    if utc_time.is_none()
        && let Some(streams) = json.get("streams").and_then(|s| s.as_array())
    {
        for stream in streams {
            if let Some(tags) = stream.get("tags") {
                utc_time = find_encode_time(tags);
                if utc_time.is_some() {
                    debug!(?path, "Found encode time in stream tags");
                    break;
                }
            }
        }
    }

    let utc_time = utc_time.ok_or_else(|| Error::VideoMetadata {
        path: path.to_path_buf(),
        message: "No encode time found in video metadata".to_string(),
    })?;

    Ok(to_local(utc_time))
}

/// Look up the first parseable encode date key in a tag object
fn find_encode_time(tags: &serde_json::Value) -> Option<NaiveDateTime> {
    for key in ENCODE_DATE_KEYS {
        for tag_key in [*key, &key.to_uppercase()] {
            if let Some(value) = tags.get(tag_key).and_then(|v| v.as_str())
                && let Some(dt) = parse_metadata_datetime(value)
            {
                return Some(dt);
            }
        }
    }
    None
}

/// Parse a container metadata datetime string into a UTC-naive timestamp
fn parse_metadata_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // ISO 8601 with explicit offset or Z
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
    ];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    None
}

/// Shift a UTC-naive timestamp into the local system timezone
fn to_local(utc_time: NaiveDateTime) -> NaiveDateTime {
    let offset = Local::now().offset().local_minus_utc();
    utc_time + chrono::Duration::seconds(offset as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_metadata_datetime() {
        // ISO 8601 with Z
        let dt = parse_metadata_datetime("2024-01-15T14:30:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);

        // With milliseconds
        let dt = parse_metadata_datetime("2024-01-15T14:30:00.123Z").unwrap();
        assert_eq!(dt.year(), 2024);

        // With timezone offset, converted to UTC
        let dt = parse_metadata_datetime("2024-01-15T14:30:00+08:00").unwrap();
        assert_eq!(dt.hour(), 6);
        assert_eq!(dt.minute(), 30);

        // Space separator
        let dt = parse_metadata_datetime("2024-01-15 14:30:00").unwrap();
        assert_eq!(dt.year(), 2024);

        assert!(parse_metadata_datetime("invalid").is_none());
    }

    #[test]
    fn test_find_encode_time_prefers_creation_time() {
        let tags = serde_json::json!({
            "creation_time": "2024-01-15T14:30:00Z",
            "date": "2020-01-01T00:00:00Z",
        });
        let dt = find_encode_time(&tags).unwrap();
        assert_eq!(dt.year(), 2024);
    }

    #[test]
    fn test_find_encode_time_uppercase_key() {
        let tags = serde_json::json!({ "DATE": "2021-06-01T08:00:00Z" });
        let dt = find_encode_time(&tags).unwrap();
        assert_eq!(dt.year(), 2021);
    }
}
