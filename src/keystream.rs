//! Key derivation and the repeating-keystream XOR transform
//!
//! The key is derived from the passphrase with PBKDF2-HMAC-SHA256 (10,000
//! iterations, 32-byte output) and applied to the file bytes by XORing each
//! byte with `key[i % key.len()]`.
//!
//! Security caveat: a repeating-keystream XOR is NOT a secure cipher. It
//! offers no integrity protection, leaks plaintext structure beyond the key
//! length, and is broken by known-plaintext or key-reuse attacks. It is
//! retained only for compatibility with the legacy `.enc` container format;
//! anyone needing real security should substitute an authenticated cipher
//! and accept the format break.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Length of salt in bytes
pub const SALT_LEN: usize = 16;

/// Length of derived key in bytes
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
const PBKDF2_ROUNDS: u32 = 10_000;

/// Derive a 32-byte key from a passphrase and salt using PBKDF2-HMAC-SHA256.
///
/// Deterministic: identical (passphrase, salt) pairs always yield the same
/// key. The result is wrapped in `Zeroizing` so the key material is wiped
/// when it goes out of scope at the end of the single operation using it.
///
/// An empty passphrase still derives a key rather than failing; rejecting
/// empty passphrases is the caller's job (see `file_ops`), since with a
/// cleartext salt the resulting key would be trivially known.
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ROUNDS, &mut *key);
    key
}

/// Apply the repeating-keystream XOR transform.
///
/// `output[i] = input[i] ^ key[i % key.len()]`. XOR is its own inverse, so
/// this single routine both encrypts and decrypts; the legacy implementation
/// carried an encrypt/decrypt flag whose two branches were bitwise identical.
///
/// Empty input yields empty output. An empty key is a programming error:
/// every caller passes the fixed-length key from [`derive_key`].
pub fn xor_transform(input: &[u8], key: &[u8]) -> Vec<u8> {
    debug_assert!(!key.is_empty());
    input
        .iter()
        .zip(key.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}
