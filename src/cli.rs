//! CLI argument parsing with clap

use clap::Parser;
use std::path::PathBuf;

/// Photo Organizer - sorts photos and videos into a date-organized library
///
/// Walks the source tree, classifies each file by extension, derives its
/// capture moment from EXIF or video metadata, and moves it into
/// `<DESTINATION>/<Category>/<YYYY.MM Month>/`. Files that cannot be
/// classified or relocated are moved into the quarantine directory under
/// their original names.
#[derive(Parser, Debug)]
#[command(name = "photo-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Destination root for the organized library
    pub destination: PathBuf,

    /// Quarantine directory for unrecognized or failed files
    pub unprocessed: PathBuf,

    /// Source directory to organize (must exist)
    pub source: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_positional_directories() {
        let cli = Cli::parse_from(["photo-organizer", "/dest", "/quarantine", "/src"]);
        assert_eq!(cli.destination, PathBuf::from("/dest"));
        assert_eq!(cli.unprocessed, PathBuf::from("/quarantine"));
        assert_eq!(cli.source, PathBuf::from("/src"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["photo-organizer", "/dest"]).is_err());
    }
}
