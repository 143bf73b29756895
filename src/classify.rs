//! File name classification into media kinds
//!
//! Maps a file name to a [`MediaKind`] based on its extension. Disambiguation
//! markers left behind by earlier conflict resolution (`photo.00.jpg`) are
//! stripped before the extension is extracted, so a re-run over an already
//! organized tree classifies files the same way as the first pass.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Matches one or more `.NN` disambiguation markers directly before the
/// final extension
static MARKER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn marker_pattern() -> &'static Regex {
    MARKER_PATTERN.get_or_init(|| Regex::new(r"(?:\.\d{2})+(\.[^.]+)$").unwrap())
}

/// Coarse media kind driving categorization and metadata probing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image (jpg, jpeg, png)
    Image,
    /// Video clip (mov, mp4)
    Video,
    /// Anything else; routed to quarantine
    Unrecognized,
}

impl MediaKind {
    /// Category folder name for this kind, if it has one
    pub fn category(&self) -> Option<&'static str> {
        match self {
            MediaKind::Image => Some("Photos"),
            MediaKind::Video => Some("Videos"),
            MediaKind::Unrecognized => None,
        }
    }
}

/// Result of classifying a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The media kind derived from the extension
    pub kind: MediaKind,
    /// Lower-cased extension including the leading dot, e.g. `".jpg"`
    pub extension: String,
}

/// Classify a file name by its extension
///
/// Fails only when the name carries no `.` at all; every extension string
/// maps to exactly one kind.
pub fn classify(name: &str) -> Result<Classification> {
    let cleaned = marker_pattern().replace(name, "$1");

    let dot = cleaned.rfind('.').ok_or_else(|| Error::NoExtension {
        name: name.to_string(),
    })?;
    let extension = cleaned[dot..].to_lowercase();

    let kind = match extension.as_str() {
        ".jpg" | ".jpeg" | ".png" => MediaKind::Image,
        ".mov" | ".mp4" => MediaKind::Video,
        _ => MediaKind::Unrecognized,
    };

    Ok(Classification { kind, extension })
}
