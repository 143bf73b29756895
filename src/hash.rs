//! Content hashing for duplicate detection
//!
//! Duplicate detection compares whole-file BLAKE3 digests; a match is
//! treated as byte-for-byte identical content.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

/// Read buffer size for streaming hashing
const BUFFER_SIZE: usize = 1024 * 1024;

/// Compute the BLAKE3 digest of a file's full contents
pub fn file_digest(path: &Path) -> Result<blake3::Hash> {
    let file = File::open(path).map_err(|e| Error::HashComputation {
        path: path.to_path_buf(),
        message: format!("Failed to open file: {}", e),
    })?;

    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buffer).map_err(|e| Error::HashComputation {
            path: path.to_path_buf(),
            message: format!("Failed to read file: {}", e),
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    let digest = hasher.finalize();
    trace!(?path, digest = %digest.to_hex(), "Computed file digest");
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_same_content_same_digest() {
        let mut file1 = NamedTempFile::new().unwrap();
        file1.write_all(b"test content").unwrap();
        file1.flush().unwrap();

        let mut file2 = NamedTempFile::new().unwrap();
        file2.write_all(b"test content").unwrap();
        file2.flush().unwrap();

        assert_eq!(
            file_digest(file1.path()).unwrap(),
            file_digest(file2.path()).unwrap()
        );
    }

    #[test]
    fn test_different_content_different_digest() {
        let mut file1 = NamedTempFile::new().unwrap();
        file1.write_all(b"content 1").unwrap();
        file1.flush().unwrap();

        let mut file2 = NamedTempFile::new().unwrap();
        file2.write_all(b"content 2").unwrap();
        file2.flush().unwrap();

        assert_ne!(
            file_digest(file1.path()).unwrap(),
            file_digest(file2.path()).unwrap()
        );
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(file_digest(Path::new("/nonexistent/file.bin")).is_err());
    }
}
