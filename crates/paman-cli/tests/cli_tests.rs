use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DB: &str = ".paman_database";

fn paman(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("paman").unwrap();
    cmd.current_dir(dir)
        .env_remove("PAMAN_DATABASE")
        .env_remove("PAMAN_LOG");
    cmd
}

/// Runs `-a` and returns the printed password.
fn add(dir: &Path, credential: &str) -> String {
    let output = paman(dir)
        .arg("-a")
        .arg(credential)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).unwrap().trim_end().to_string()
}

fn xor(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b ^ 170).collect()
}

#[test]
fn add_prints_password_and_stores_obscured_record() {
    let dir = tempdir().unwrap();
    let password = add(dir.path(), "example.com:alice");
    assert_eq!(password.len(), 16);
    assert!(password.bytes().all(|b| b.is_ascii_graphic()));

    let raw = fs::read(dir.path().join(DB)).unwrap();
    let expected = format!("example.com alice {password}\n");
    assert_eq!(xor(&raw), expected.as_bytes());
}

#[test]
fn duplicate_add_fails_and_keeps_one_record() {
    let dir = tempdir().unwrap();
    let password = add(dir.path(), "example.com:alice");
    let before = fs::read(dir.path().join(DB)).unwrap();

    paman(dir.path())
        .args(["add", "example.com:alice"])
        .assert()
        .failure()
        .stdout(format!("example.com alice {password}\n"))
        .stderr(predicate::str::contains("credential must be unique"));

    assert_eq!(fs::read(dir.path().join(DB)).unwrap(), before);
}

#[test]
fn add_without_username_fails_without_write() {
    let dir = tempdir().unwrap();
    add(dir.path(), "example.com:alice");
    let before = fs::read(dir.path().join(DB)).unwrap();

    paman(dir.path())
        .args(["-a", "example.org"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("username not set"));

    assert_eq!(fs::read(dir.path().join(DB)).unwrap(), before);
}

#[test]
fn list_and_search_print_plaintext() {
    let dir = tempdir().unwrap();
    let p1 = add(dir.path(), "a.com:alice");
    let p2 = add(dir.path(), "b.com:bob");
    let p3 = add(dir.path(), "a.org:alice");

    paman(dir.path())
        .arg("-l")
        .assert()
        .success()
        .stdout(format!(
            "a.com alice {p1}\nb.com bob {p2}\na.org alice {p3}\n"
        ));

    paman(dir.path())
        .args(["-s", "alice"])
        .assert()
        .success()
        .stdout(format!("a.com alice {p1}\na.org alice {p3}\n"));

    paman(dir.path())
        .args(["search", "zzz"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn export_writes_plain_file() {
    let dir = tempdir().unwrap();
    add(dir.path(), "a.com:alice");
    add(dir.path(), "b.com:bob");

    paman(dir.path()).arg("-e").assert().success();

    let plain = fs::read(dir.path().join(".paman_database_plain.txt")).unwrap();
    let raw = fs::read(dir.path().join(DB)).unwrap();
    assert_eq!(xor(&plain), raw);
}

#[test]
fn convert_twice_restores_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, b"hello\nworld\n").unwrap();

    paman(dir.path()).arg("-c").arg(&file).assert().success();
    assert_eq!(fs::read(&file).unwrap(), xor(b"hello\nworld\n"));

    paman(dir.path()).arg("convert").arg(&file).assert().success();
    assert_eq!(fs::read(&file).unwrap(), b"hello\nworld\n");
}

#[test]
fn convert_missing_file_fails() {
    let dir = tempdir().unwrap();
    paman(dir.path())
        .args(["-c", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn delete_requires_capital_y() {
    let dir = tempdir().unwrap();
    add(dir.path(), "a.com:alice");

    paman(dir.path())
        .arg("-d")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Do you want to delete"));
    assert!(dir.path().join(DB).exists());

    paman(dir.path())
        .arg("-d")
        .write_stdin("Y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(".paman_database deleted."));
    assert!(!dir.path().join(DB).exists());
}

#[test]
fn delete_with_yes_skips_prompt() {
    let dir = tempdir().unwrap();
    add(dir.path(), "a.com:alice");
    paman(dir.path())
        .args(["delete", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Do you want").not());
    assert!(!dir.path().join(DB).exists());
}

#[test]
fn database_flag_and_env_override_location() {
    let dir = tempdir().unwrap();
    paman(dir.path())
        .args(["--database", "vault.db", "-a", "a.com:alice"])
        .assert()
        .success();
    assert!(dir.path().join("vault.db").exists());
    assert!(!dir.path().join(DB).exists());

    paman(dir.path())
        .env("PAMAN_DATABASE", "vault.db")
        .args(["-s", "a.com"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("a.com alice "));
}

#[test]
fn version_and_bare_invocation() {
    let dir = tempdir().unwrap();
    paman(dir.path())
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("paman version "));

    paman(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
    assert!(!dir.path().join(DB).exists());
}
