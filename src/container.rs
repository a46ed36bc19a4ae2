//! The on-disk `.enc` container format
//!
//! The binary format is:
//! - salt: 16 bytes
//! - ciphertext: variable length, same length as the original plaintext
//!
//! There is no magic number, no version field, and no checksum; the format
//! matches the legacy implementation exactly so files produced by either
//! remain decryptable by the other.

use crate::error::{ErrorCategory, ErrorKind, Result, XorencError};
use crate::keystream::SALT_LEN;

/// Serialize a container: salt first, then the transformed payload.
pub fn serialize(salt: &[u8; SALT_LEN], payload: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(SALT_LEN + payload.len());
    output.extend_from_slice(salt);
    output.extend_from_slice(payload);
    output
}

/// Split a container into its salt prefix and payload.
///
/// Anything shorter than the salt prefix cannot be a valid container and
/// fails with `MalformedContainer`.
pub fn deserialize(bytes: &[u8]) -> Result<([u8; SALT_LEN], &[u8])> {
    if bytes.len() < SALT_LEN {
        return Err(XorencError::with_kind(
            ErrorCategory::User,
            ErrorKind::MalformedContainer,
            format!(
                "encrypted file is {} bytes, shorter than the {}-byte salt prefix; \
                 likely truncated or not an encrypted file",
                bytes.len(),
                SALT_LEN
            ),
        ));
    }

    let salt: [u8; SALT_LEN] = bytes[..SALT_LEN]
        .try_into()
        .map_err(|_| {
            XorencError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::MalformedContainer,
                "failed to read salt",
            )
        })?;
    Ok((salt, &bytes[SALT_LEN..]))
}
