//! In-place file encryption/decryption operations
//!
//! This module orchestrates the full pipeline: read the file, derive the key
//! from the passphrase and a per-file salt, apply the XOR keystream, replace
//! the source file with its transformed counterpart, and destroy the source.
//!
//! There is no integrity tag in the container, so decrypting with the wrong
//! passphrase cannot be detected: it silently yields wrong bytes of the
//! correct length. This is an inherent property of the legacy format.

use crate::container;
use crate::error::{ErrorCategory, ErrorKind, Result, XorencError};
use crate::keystream::{derive_key, xor_transform, SALT_LEN};
use crate::passphrase::PassphraseReader;
use crate::shred;
use rand::rngs::OsRng;
use rand::RngCore;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Suffix appended to encrypted files
pub const ENC_SUFFIX: &str = "enc";

/// Result of a completed operation.
///
/// Failures travel as `Err`; `SuccessWithWarning` covers the case where the
/// cryptographic work finished but the cleanup of the source file did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    SuccessWithWarning(String),
}

/// Encrypt a file in place with a passphrase
///
/// Reads the whole file at `input_path`, encrypts it under a key derived
/// from the passphrase and a fresh 16-byte salt, writes the container
/// (salt + ciphertext) to `input_path` with `.enc` appended, and then
/// removes the original file.
///
/// The original is removed only after the ciphertext has been fully computed
/// and durably written; any failure before that point leaves it intact. The
/// container is written via a tempfile in the same directory and atomically
/// renamed, so a partial `.enc` file is never left behind.
pub fn encrypt_file(
    input_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<Outcome> {
    let passphrase = passphrase_reader.read_passphrase()?;
    require_nonempty(&passphrase)?;

    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(&passphrase, &salt);
    let ciphertext = xor_transform(&plaintext, &*key);
    let output_path = encrypted_path(input_path);

    write_file_atomic(&output_path, &container::serialize(&salt, &ciphertext))?;

    fs::remove_file(input_path).map_err(|e| {
        XorencError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!(
                "encrypted file was written to {} but the original {} could not be deleted",
                output_path.display(),
                input_path.display()
            ),
            e,
        )
    })?;

    Ok(Outcome::Success)
}

/// Decrypt a file in place with a passphrase
///
/// Reads the container at `input_path`, splits off the salt, decrypts the
/// payload under the derived key, and writes the plaintext to the target
/// path: `input_path` with a trailing `.enc` stripped, or `output_path` when
/// the input does not carry the suffix (in which case `output_path` is
/// required).
///
/// After the plaintext is written, the encrypted source is destroyed with
/// [`shred::erase`]. An erase failure does not roll back the decryption; it
/// downgrades the result to [`Outcome::SuccessWithWarning`] so the caller can
/// report "decrypted, but could not remove the source file".
pub fn decrypt_file(
    input_path: &Path,
    output_path: Option<&Path>,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<Outcome> {
    let passphrase = passphrase_reader.read_passphrase()?;
    require_nonempty(&passphrase)?;

    let data = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let (salt, ciphertext) = container::deserialize(&data)?;

    let key = derive_key(&passphrase, &salt);
    let plaintext = xor_transform(ciphertext, &*key);

    let target = resolve_decrypted_path(input_path, output_path)?;
    write_file_secure(&target, &plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", target.display())))?;

    match shred::erase(input_path) {
        Ok(()) => Ok(Outcome::Success),
        Err(e) => Ok(Outcome::SuccessWithWarning(format!(
            "decrypted to {}, but could not remove the encrypted source file: {}",
            target.display(),
            e
        ))),
    }
}

/// The path the encrypted container is written to: the input path with
/// `.enc` appended.
pub fn encrypted_path(input_path: &Path) -> PathBuf {
    let mut os: OsString = input_path.as_os_str().to_os_string();
    os.push(".");
    os.push(ENC_SUFFIX);
    PathBuf::from(os)
}

/// Resolve where decrypted plaintext should be written.
///
/// A trailing `.enc` (case-insensitive, matching the legacy behavior) is
/// stripped; otherwise the caller must have supplied an explicit output path.
fn resolve_decrypted_path(input_path: &Path, output_path: Option<&Path>) -> Result<PathBuf> {
    let has_enc_suffix = input_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ENC_SUFFIX));

    if has_enc_suffix {
        Ok(input_path.with_extension(""))
    } else if let Some(output) = output_path {
        Ok(output.to_path_buf())
    } else {
        Err(XorencError::new(
            ErrorCategory::User,
            format!(
                "{} does not end in .{}; an explicit output path is required",
                input_path.display(),
                ENC_SUFFIX
            ),
        ))
    }
}

fn require_nonempty(passphrase: &Zeroizing<Vec<u8>>) -> Result<()> {
    if passphrase.is_empty() {
        return Err(XorencError::with_kind(
            ErrorCategory::User,
            ErrorKind::EmptyPassword,
            "passphrase must not be empty",
        ));
    }
    Ok(())
}

/// Write file atomically: tempfile in the target's directory, flush, fsync,
/// set restrictive permissions, rename into place.
fn write_file_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    // parent() is Some("") for a bare relative filename; tempfile needs a
    // real directory.
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        XorencError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to create tempfile",
            e,
        )
    })?;

    temp_file.write_all(contents).map_err(|e| {
        XorencError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write to tempfile",
            e,
        )
    })?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file.flush().map_err(|e| {
        XorencError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to flush tempfile",
            e,
        )
    })?;
    temp_file.as_file().sync_all().map_err(|e| {
        XorencError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = temp_file
            .as_file()
            .metadata()
            .map_err(|e| {
                XorencError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    "failed to get tempfile metadata",
                    e,
                )
            })?
            .permissions();
        perms.set_mode(0o600);
        temp_file.as_file().set_permissions(perms).map_err(|e| {
            XorencError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to set tempfile permissions",
                e,
            )
        })?;
    }
    temp_file.persist(path).map_err(|e| {
        XorencError::with_kind_and_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            format!("failed to rename to target file {}", path.display()),
            e,
        )
    })?;
    Ok(())
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| {
                XorencError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Io,
                    format!("failed to open {}", path.display()),
                    e,
                )
            })?;

        file.write_all(contents).map_err(|e| {
            XorencError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(|e| {
            XorencError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

fn read_error(path: &Path, err: io::Error) -> XorencError {
    let (category, kind) = if err.kind() == io::ErrorKind::NotFound {
        (ErrorCategory::User, ErrorKind::FileNotFound)
    } else {
        (ErrorCategory::Internal, ErrorKind::Io)
    };
    XorencError::with_kind_and_source(
        category,
        kind,
        format!("failed to read from {}", path.display()),
        err,
    )
}
