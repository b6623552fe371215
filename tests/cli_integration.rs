//! CLI integration tests
//!
//! Tests the command-line interface end-to-end.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Run zbox with passphrase from stdin
fn run_zbox_with_passphrase(
    args: &[&str],
    passphrase: &str,
) -> Result<std::process::Output, std::io::Error> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_zbox"))
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
    drop(child.stdin.take());

    child.wait_with_output()
}

/// Get path to testdata directory
fn testdata_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("testdata");
    path.push(filename);
    path
}

fn path_arg(path: &std::path::Path) -> &str {
    path.to_str().unwrap()
}

/// Decrypt a container produced by the JavaScript implementation.
#[test]
fn test_decrypt_known_container() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("hello-decrypted.txt");

    let result = run_zbox_with_passphrase(
        &[
            "decrypt",
            "-i",
            path_arg(&testdata_path("hello.txt.encrypted")),
            "-o",
            path_arg(&output),
        ],
        "test",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let decrypted = fs::read(&output).unwrap();
    let expected = fs::read(testdata_path("hello.txt")).unwrap();
    assert_eq!(decrypted, expected);
}

#[test]
fn test_encrypt_decrypt_default_paths() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("hello.txt");
    let encrypted = temp_dir.path().join("hello.txt.encrypted");
    fs::write(&plaintext, "Hello, World!").unwrap();

    let result = run_zbox_with_passphrase(&["encrypt", "-i", path_arg(&plaintext)], "test").unwrap();
    assert!(
        result.status.success(),
        "encrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(encrypted.is_file());
    assert!(String::from_utf8_lossy(&result.stdout).contains("encrypted:"));

    let result = run_zbox_with_passphrase(&["d", "-i", path_arg(&encrypted)], "test").unwrap();
    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let decrypted = temp_dir.path().join("hello.txt.encrypted.decrypted");
    assert_eq!(fs::read_to_string(&decrypted).unwrap(), "Hello, World!");

    fs::remove_file(&plaintext).unwrap();
    let result = run_zbox_with_passphrase(
        &["d", "-i", path_arg(&encrypted), "-e", ".encrypted"],
        "test",
    )
    .unwrap();
    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert_eq!(fs::read_to_string(&plaintext).unwrap(), "Hello, World!");
}

#[test]
fn test_wrong_passphrase_fails() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("secret.txt");
    let encrypted = temp_dir.path().join("secret.txt.encrypted");
    let decrypted = temp_dir.path().join("secret.out");
    fs::write(&plaintext, "Secret message").unwrap();

    let result =
        run_zbox_with_passphrase(&["encrypt", "-i", path_arg(&plaintext)], "correct-key").unwrap();
    assert!(result.status.success());

    let result = run_zbox_with_passphrase(
        &["decrypt", "-i", path_arg(&encrypted), "-o", path_arg(&decrypted)],
        "wrong-key",
    )
    .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("bad passphrase"),
        "Expected error message about the passphrase, got: {}",
        stderr
    );
    assert!(!decrypted.exists());
}

#[test]
fn test_overwrite_flag() {
    let temp_dir = TempDir::new().unwrap();
    let plaintext = temp_dir.path().join("a.txt");
    let encrypted = temp_dir.path().join("a.txt.encrypted");
    fs::write(&plaintext, "New content").unwrap();
    fs::write(&encrypted, "Old encrypted content").unwrap();

    let result = run_zbox_with_passphrase(&["encrypt", "-i", path_arg(&plaintext)], "k").unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("already exists"));
    assert_eq!(fs::read_to_string(&encrypted).unwrap(), "Old encrypted content");

    let result = run_zbox_with_passphrase(
        &["encrypt", "-i", path_arg(&plaintext), "--overwrite"],
        "k",
    )
    .unwrap();
    assert!(
        result.status.success(),
        "encrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert_eq!(fs::read(&encrypted).unwrap()[0], 64);
}

#[test]
fn test_directory_with_skipped_entry_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("file1.txt"), "Content 1").unwrap();
    fs::write(src.join("sub").join("file2.txt"), "Content 2").unwrap();

    let result = run_zbox_with_passphrase(&["encrypt", "-i", path_arg(&src)], "k").unwrap();
    assert!(result.status.success());

    let encrypted = temp_dir.path().join("src.encrypted");
    fs::write(encrypted.join("stray.txt"), "plain text").unwrap();

    let out = temp_dir.path().join("restored");
    let result = run_zbox_with_passphrase(
        &["decrypt", "-i", path_arg(&encrypted), "-o", path_arg(&out)],
        "k",
    )
    .unwrap();

    assert!(
        result.status.success(),
        "decrypt failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("skipped 1 entries"), "got: {}", stderr);
    assert!(stderr.contains("stray.txt"), "got: {}", stderr);
    assert_eq!(
        fs::read_to_string(out.join("file1.txt.encrypted.decrypted")).unwrap(),
        "Content 1"
    );
}

#[test]
fn test_no_recursive_flag() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir_all(src.join("sub")).unwrap();
    fs::write(src.join("file1.txt"), "Content 1").unwrap();
    fs::write(src.join("sub").join("file2.txt"), "Content 2").unwrap();

    let result = run_zbox_with_passphrase(
        &["encrypt", "-i", path_arg(&src), "--no-recursive", "-e", ".secret"],
        "k",
    )
    .unwrap();
    assert!(result.status.success());

    let encrypted = temp_dir.path().join("src.secret");
    assert!(encrypted.join("file1.txt.secret").is_file());
    assert!(encrypted.join("sub").is_dir());
    assert!(!encrypted.join("sub").join("file2.txt.secret").exists());
}

#[test]
fn test_decrypt_nonexistent_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let nonexistent = temp_dir.path().join("nonexistent.encrypted");
    let output = temp_dir.path().join("output.txt");

    let result = run_zbox_with_passphrase(
        &["decrypt", "-i", path_arg(&nonexistent), "-o", path_arg(&output)],
        "test",
    )
    .unwrap();

    assert!(!result.status.success());
    assert!(!output.exists());
}

#[test]
fn test_check_command() {
    let result = Command::new(env!("CARGO_BIN_EXE_zbox"))
        .args(["check", path_arg(&testdata_path("hello.txt.encrypted"))])
        .output()
        .unwrap();
    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains(": encrypted"));

    let result = Command::new(env!("CARGO_BIN_EXE_zbox"))
        .args([
            "check",
            path_arg(&testdata_path("hello.txt.encrypted")),
            path_arg(&testdata_path("hello.txt")),
        ])
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains(": not encrypted"));
}
