//! xorenc - Passphrase-based in-place file encryption
//!
//! Implements the legacy `.enc` container format: a 16-byte random salt
//! followed by the file bytes XORed with a repeating PBKDF2-derived
//! keystream. The format carries no integrity tag, so decrypting with the
//! wrong passphrase silently yields wrong bytes of the correct length.

#![forbid(unsafe_code)]

pub mod container;
pub mod error;
pub mod file_ops;
pub mod keystream;
pub mod passphrase;
pub mod shred;
