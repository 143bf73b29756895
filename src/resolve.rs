//! Conflict resolution and file relocation
//!
//! Decides, for a candidate destination that already exists, whether the
//! incoming file is a duplicate (discard the source) or distinct content
//! that needs a disambiguated name. Markers are two-digit indices inserted
//! before the extension (`name.00.ext`, `name.01.ext`, ...), tried in order
//! until a free slot or an exact duplicate is found.

use crate::dest::DestinationCandidate;
use crate::error::{Error, Result};
use crate::hash::file_digest;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Marker indices are two digits; after `.99` the name space is exhausted
const MARKER_LIMIT: u32 = 100;

/// Copy buffer size for cross-device move fallback
const COPY_BUFFER_SIZE: usize = 256 * 1024;

/// Terminal outcome of a resolve-and-move attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictOutcome {
    /// The candidate slot was free; the source was moved there
    NoConflict { destination: PathBuf },
    /// An identical copy already existed; the source was deleted
    DuplicateDiscard { existing: PathBuf },
    /// The slot held different content; the source landed under a
    /// marker-suffixed name
    DistinctRetarget { destination: PathBuf },
}

impl ConflictOutcome {
    /// The path now holding this file's bytes
    pub fn final_path(&self) -> &Path {
        match self {
            ConflictOutcome::NoConflict { destination } => destination,
            ConflictOutcome::DuplicateDiscard { existing } => existing,
            ConflictOutcome::DistinctRetarget { destination } => destination,
        }
    }
}

/// Move `source` to the candidate destination, resolving name collisions
///
/// Occupied slots are compared by whole-file digest: an exact match deletes
/// the source and keeps the occupant; different content advances to the
/// next marker-suffixed name. Exactly one filesystem mutation happens per
/// call (a move or a delete), and the source is never deleted unless the
/// duplicate check succeeded.
pub fn resolve_and_move(
    source: &Path,
    candidate: &DestinationCandidate,
) -> Result<ConflictOutcome> {
    let mut target = candidate.path();
    let mut marker: u32 = 0;

    loop {
        if !target.exists() {
            move_file(source, &target)?;
            return Ok(if marker == 0 {
                ConflictOutcome::NoConflict {
                    destination: target,
                }
            } else {
                info!(?source, destination = ?target, "Retargeted to disambiguated name");
                ConflictOutcome::DistinctRetarget {
                    destination: target,
                }
            });
        }

        if file_digest(source)? == file_digest(&target)? {
            debug!(?source, existing = ?target, "Exact duplicate, discarding source");
            fs::remove_file(source)?;
            return Ok(ConflictOutcome::DuplicateDiscard { existing: target });
        }

        if marker == MARKER_LIMIT {
            return Err(Error::MarkersExhausted {
                path: candidate.path(),
            });
        }
        target = candidate.marked_path(marker);
        marker += 1;
    }
}

/// Move a file, creating the destination directory as needed
///
/// Rename first; renames are atomic within a volume. Cross-device moves
/// fall back to copy-then-delete, so the source survives until the copy
/// is complete.
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let mtime = fs::metadata(source).and_then(|m| m.modified()).ok();

    if fs::rename(source, dest).is_err() {
        copy_file(source, dest)?;
        fs::remove_file(source)?;
    }

    // Preserve modification time across the copy fallback
    if let Some(mtime) = mtime {
        let _ = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime));
    }

    Ok(())
}

/// Copy file with buffered I/O
fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, src_file);
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, dest_file);

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    Ok(())
}
