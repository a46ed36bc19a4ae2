//! Best-effort secure file deletion
//!
//! Overwrites a file's contents with cryptographically random bytes before
//! unlinking it, so that casual recovery of the deleted data from the raw
//! device does not succeed.
//!
//! Limitation: this is a mitigation, not a guarantee. On copy-on-write,
//! log-structured, or wear-leveled storage (most SSDs, many modern
//! filesystems) the overwrite may land on fresh blocks while the old data
//! survives elsewhere. We state this rather than pretend otherwise.

use crate::error::{ErrorCategory, ErrorKind, Result, XorencError};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Overwrite chunk size in bytes
const CHUNK_LEN: usize = 4096;

/// Overwrite the file at `path` with random bytes and delete it.
///
/// The file's current length is overwritten in 4096-byte chunks of fresh
/// CSPRNG output, the write is synced to persistent storage, and only then
/// is the file removed.
///
/// A missing file is a no-op success: there is nothing to erase. Any other
/// failure (permissions, locks, I/O) is reported as `EraseFailed` and the
/// file is left in place; callers that reach this point after a successful
/// cryptographic step must surface it as a partial success rather than
/// masking the completed work.
pub fn erase(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(erase_error(path, "failed to stat", e)),
    };
    let length = metadata.len();

    {
        let mut file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| erase_error(path, "failed to open for overwrite", e))?;

        let mut buffer = [0u8; CHUNK_LEN];
        let mut remaining = length;
        while remaining > 0 {
            let current = remaining.min(CHUNK_LEN as u64) as usize;
            OsRng.fill_bytes(&mut buffer[..current]);
            file.write_all(&buffer[..current])
                .map_err(|e| erase_error(path, "failed to overwrite", e))?;
            remaining -= current as u64;
        }

        file.flush()
            .map_err(|e| erase_error(path, "failed to flush overwrite of", e))?;
        file.sync_all()
            .map_err(|e| erase_error(path, "failed to sync overwrite of", e))?;
    }

    fs::remove_file(path).map_err(|e| erase_error(path, "failed to delete", e))
}

fn erase_error(path: &Path, what: &str, err: std::io::Error) -> XorencError {
    XorencError::with_kind_and_source(
        ErrorCategory::Internal,
        ErrorKind::EraseFailed,
        format!("{} {}", what, path.display()),
        err,
    )
}
