//! Error types for the photo organizer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for photo organizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the photo organizer
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No extension found in file name {name:?}")]
    NoExtension { name: String },

    #[error("Source directory {path} does not exist")]
    SourceNotFound { path: PathBuf },

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("Failed to extract video metadata from {path}: {message}")]
    VideoMetadata { path: PathBuf, message: String },

    #[error("File hash computation failed for {path}: {message}")]
    HashComputation { path: PathBuf, message: String },

    #[error("Exhausted disambiguation markers for {path}")]
    MarkersExhausted { path: PathBuf },

    #[error("FFprobe not found. Please install FFmpeg and ensure ffprobe is in PATH")]
    FfprobeNotFound,
}
