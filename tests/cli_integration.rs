//! CLI integration tests
//!
//! Tests the command-line interface end-to-end.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Get path to the xorenc binary
fn xorenc_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps/
    path.push("xorenc");
    path
}

/// Run xorenc with passphrase from stdin
fn run_xorenc_with_passphrase(
    args: &[&str],
    passphrase: &str,
) -> Result<std::process::Output, std::io::Error> {
    let mut child = Command::new(xorenc_bin())
        .arg("--passphrase-stdin")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    {
        let stdin = child.stdin.as_mut().expect("failed to open stdin");
        // Ignore BrokenPipe errors - the command may exit before reading stdin
        // if it encounters an error (e.g., file not found)
        let _ = stdin.write_all(passphrase.as_bytes());
    }

    child.wait_with_output()
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let plain_path = temp_dir.path().join("hello.txt");
    let crypt_path = temp_dir.path().join("hello.txt.enc");

    fs::write(&plain_path, b"hello").unwrap();

    let output = run_xorenc_with_passphrase(
        &["encrypt", "-i", plain_path.to_str().unwrap()],
        "pw1",
    )
    .unwrap();
    assert!(
        output.status.success(),
        "encrypt failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // 16-byte salt + 5-byte ciphertext; original replaced by the container.
    assert_eq!(fs::read(&crypt_path).unwrap().len(), 21);
    assert!(!plain_path.exists());

    let output = run_xorenc_with_passphrase(
        &["decrypt", "-i", crypt_path.to_str().unwrap()],
        "pw1",
    )
    .unwrap();
    assert!(
        output.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(fs::read(&plain_path).unwrap(), b"hello");
    assert!(!crypt_path.exists());
}

#[test]
fn test_decrypt_with_wrong_passphrase_yields_garbage() {
    let temp_dir = TempDir::new().unwrap();
    let plain_path = temp_dir.path().join("hello.txt");
    let crypt_path = temp_dir.path().join("hello.txt.enc");

    fs::write(&plain_path, b"hello").unwrap();

    let output = run_xorenc_with_passphrase(
        &["encrypt", "-i", plain_path.to_str().unwrap()],
        "pw1",
    )
    .unwrap();
    assert!(output.status.success());

    // The format has no integrity tag, so a wrong passphrase is not an
    // error; it silently produces wrong bytes of the correct length.
    let output = run_xorenc_with_passphrase(
        &["decrypt", "-i", crypt_path.to_str().unwrap()],
        "pw2",
    )
    .unwrap();
    assert!(output.status.success());

    let recovered = fs::read(&plain_path).unwrap();
    assert_eq!(recovered.len(), 5);
    assert_ne!(recovered, b"hello");
}

#[test]
fn test_encrypt_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("no-such-file.txt");

    let output = run_xorenc_with_passphrase(
        &["encrypt", "-i", missing.to_str().unwrap()],
        "pw",
    )
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr was: {}", stderr);
}

#[test]
fn test_decrypt_truncated_container_fails() {
    let temp_dir = TempDir::new().unwrap();
    let crypt_path = temp_dir.path().join("short.enc");
    fs::write(&crypt_path, vec![0u8; 7]).unwrap();

    let output = run_xorenc_with_passphrase(
        &["decrypt", "-i", crypt_path.to_str().unwrap()],
        "pw",
    )
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr was: {}", stderr);
    // The truncated input must be left untouched.
    assert!(crypt_path.exists());
}

#[test]
fn test_decrypt_without_enc_suffix_requires_output() {
    let temp_dir = TempDir::new().unwrap();
    let crypt_path = temp_dir.path().join("mystery.bin");
    fs::write(&crypt_path, vec![0u8; 20]).unwrap();

    let output = run_xorenc_with_passphrase(
        &["decrypt", "-i", crypt_path.to_str().unwrap()],
        "pw",
    )
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("output path"),
        "stderr was: {}",
        stderr
    );
}

#[test]
fn test_decrypt_with_explicit_output() {
    let temp_dir = TempDir::new().unwrap();
    let plain_path = temp_dir.path().join("data.txt");
    let crypt_path = temp_dir.path().join("data.txt.enc");
    let renamed_path = temp_dir.path().join("mystery.bin");
    let out_path = temp_dir.path().join("recovered.txt");

    fs::write(&plain_path, b"payload").unwrap();
    let output = run_xorenc_with_passphrase(
        &["encrypt", "-i", plain_path.to_str().unwrap()],
        "pw",
    )
    .unwrap();
    assert!(output.status.success());
    fs::rename(&crypt_path, &renamed_path).unwrap();

    let output = run_xorenc_with_passphrase(
        &[
            "decrypt",
            "-i",
            renamed_path.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
        ],
        "pw",
    )
    .unwrap();
    assert!(
        output.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(fs::read(&out_path).unwrap(), b"payload");
    assert!(!renamed_path.exists());
}

#[test]
fn test_empty_passphrase_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let plain_path = temp_dir.path().join("hello.txt");
    fs::write(&plain_path, b"hello").unwrap();

    let output = run_xorenc_with_passphrase(
        &["encrypt", "-i", plain_path.to_str().unwrap()],
        "",
    )
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("passphrase"), "stderr was: {}", stderr);
    // Nothing destructive happened.
    assert!(plain_path.exists());
}

#[test]
fn test_subcommand_aliases() {
    let temp_dir = TempDir::new().unwrap();
    let plain_path = temp_dir.path().join("alias.txt");
    let crypt_path = temp_dir.path().join("alias.txt.enc");

    fs::write(&plain_path, b"short forms").unwrap();

    let output =
        run_xorenc_with_passphrase(&["e", "-i", plain_path.to_str().unwrap()], "pw").unwrap();
    assert!(output.status.success());

    let output =
        run_xorenc_with_passphrase(&["d", "-i", crypt_path.to_str().unwrap()], "pw").unwrap();
    assert!(output.status.success());

    assert_eq!(fs::read(&plain_path).unwrap(), b"short forms");
}

#[test]
fn test_binary_roundtrip_preserves_all_byte_values() {
    let temp_dir = TempDir::new().unwrap();
    let plain_path = temp_dir.path().join("bytes.bin");
    let crypt_path = temp_dir.path().join("bytes.bin.enc");

    let plaintext: Vec<u8> = (0..=255).collect();
    fs::write(&plain_path, &plaintext).unwrap();

    let output = run_xorenc_with_passphrase(
        &["encrypt", "-i", plain_path.to_str().unwrap()],
        "pw",
    )
    .unwrap();
    assert!(output.status.success());
    assert_eq!(fs::read(&crypt_path).unwrap().len(), 16 + 256);

    let output = run_xorenc_with_passphrase(
        &["decrypt", "-i", crypt_path.to_str().unwrap()],
        "pw",
    )
    .unwrap();
    assert!(output.status.success());

    assert_eq!(fs::read(&plain_path).unwrap(), plaintext);
}
