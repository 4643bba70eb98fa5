use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::tempdir;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fmdcrypt"));
    cmd.env_remove("FMDCRYPT_PASSWORD")
        .env_remove("FMDCRYPT_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn packet_plaintext() -> String {
    std::fs::read_to_string(fixture("packet.txt")).unwrap()
}

#[test]
fn unlock_with_correct_password() {
    bin()
        .env("FMDCRYPT_PASSWORD", "correct-horse")
        .arg("--key")
        .arg(fixture("wrapped_key.b64"))
        .arg("unlock")
        .assert()
        .success()
        .stdout(predicate::str::contains("private key unlocked"));
}

#[test]
fn unlock_reads_password_from_stdin() {
    bin()
        .arg("--key")
        .arg(fixture("wrapped_key_hunter2.b64"))
        .arg("unlock")
        .write_stdin("hunter2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("private key unlocked"));
}

#[test]
fn wrong_password_shows_generic_message() {
    bin()
        .env("FMDCRYPT_PASSWORD", "wrong")
        .arg("--key")
        .arg(fixture("wrapped_key.b64"))
        .arg("unlock")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not unlock"))
        .stderr(predicate::str::contains("decryption failed").not());
}

#[test]
fn corrupted_key_shows_same_message() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("key.b64");

    let mut encoded = std::fs::read_to_string(fixture("wrapped_key.b64")).unwrap();
    // flip a character well inside the ciphertext
    let idx = 200;
    let replacement = if &encoded[idx..idx + 1] == "A" { "B" } else { "A" };
    encoded.replace_range(idx..idx + 1, replacement);
    std::fs::write(&path, encoded).unwrap();

    bin()
        .env("FMDCRYPT_PASSWORD", "correct-horse")
        .arg("--key")
        .arg(&path)
        .arg("unlock")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not unlock"));
}

#[test]
fn truncated_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("key.b64");
    // 27 bytes
    std::fs::write(&path, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap();

    bin()
        .env("FMDCRYPT_PASSWORD", "correct-horse")
        .arg("--key")
        .arg(&path)
        .arg("unlock")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not unlock"));
}

#[test]
fn missing_key_file_fails() {
    let dir = tempdir().unwrap();

    bin()
        .env("FMDCRYPT_PASSWORD", "pw")
        .arg("--key")
        .arg(dir.path().join("missing.b64"))
        .arg("unlock")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read wrapped key"));
}

#[test]
fn decrypt_packet_from_file() {
    bin()
        .env("FMDCRYPT_PASSWORD", "correct-horse")
        .arg("--key")
        .arg(fixture("wrapped_key.b64"))
        .arg("decrypt")
        .arg(fixture("packet.b64"))
        .assert()
        .success()
        .stdout(predicate::str::contains(packet_plaintext()));
}

#[test]
fn decrypt_packet_from_stdin() {
    let packet = std::fs::read_to_string(fixture("packet.b64")).unwrap();

    bin()
        .env("FMDCRYPT_PASSWORD", "correct-horse")
        .env("FMDCRYPT_KEY", fixture("wrapped_key.b64"))
        .arg("decrypt")
        .write_stdin(packet)
        .assert()
        .success()
        .stdout(predicate::str::contains(packet_plaintext()));
}

#[test]
fn decrypt_short_packet_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("packet.b64");
    std::fs::write(&path, "AAAA").unwrap();

    bin()
        .env("FMDCRYPT_PASSWORD", "correct-horse")
        .arg("--key")
        .arg(fixture("wrapped_key.b64"))
        .arg("decrypt")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("packet is 3 bytes"));
}

#[test]
fn login_hash_matches_reference() {
    bin()
        .env("FMDCRYPT_PASSWORD", "correct-horse")
        .arg("login-hash")
        .arg("--salt")
        .arg("AAAAAAAAAAAAAAAAAAAAAA==")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "$argon2id$v=19$m=131072,t=1,p=4$AAAAAAAAAAAAAAAAAAAAAA$9U+6dC37CP2MiDDYO0NVMcuA9cLD9HzCG1AUDU31VeI",
        ));
}

#[test]
fn login_hash_rejects_bad_salt() {
    bin()
        .env("FMDCRYPT_PASSWORD", "pw")
        .arg("login-hash")
        .arg("--salt")
        .arg("AAAA")
        .assert()
        .failure()
        .stderr(predicate::str::contains("salt must be 16 bytes"));
}

#[test]
fn salt_is_extracted_from_encoded_hash() {
    bin()
        .arg("salt")
        .arg("$argon2id$v=19$m=131072,t=1,p=4$AAAAAAAAAAAAAAAAAAAAAA$9U+6dC37CP2MiDDYO0NVMcuA9cLD9HzCG1AUDU31VeI")
        .assert()
        .success()
        .stdout(predicate::str::contains("AAAAAAAAAAAAAAAAAAAAAA=="));
}

#[test]
fn inspect_wrapped_key_prints_json() {
    let output = bin()
        .arg("inspect")
        .arg("wrapped-key")
        .arg(fixture("wrapped_key.b64"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["type"], "wrapped_key");
    assert_eq!(json["salt"], "AAAAAAAAAAAAAAAAAAAAAA==");
    assert_eq!(json["iv_len"], 12);
}

#[test]
fn inspect_packet_prints_json() {
    let output = bin()
        .arg("inspect")
        .arg("packet")
        .arg(fixture("packet.b64"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["type"], "packet");
    assert_eq!(json["encrypted_session_key_len"], 384);
    assert_eq!(
        json["ciphertext_len"],
        packet_plaintext().len() as u64 + 16
    );
}
