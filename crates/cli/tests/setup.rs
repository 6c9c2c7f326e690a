use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn setup_installs_template() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("env.local"), "SHELF_SERVER__PORT=5001\n").unwrap();

    Command::cargo_bin("shelf")
        .unwrap()
        .args(["setup", "--environment", "local", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("Environment configured for local"));

    assert!(dir.path().join(".env").exists());
}

#[test]
fn setup_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("env.production"), "A=1\n").unwrap();
    std::fs::write(dir.path().join(".env"), "KEEP=1\n").unwrap();

    Command::cargo_bin("shelf")
        .unwrap()
        .args(["setup", "-e", "production", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(contains("--force"));

    assert_eq!(
        std::fs::read_to_string(dir.path().join(".env")).unwrap(),
        "KEEP=1\n"
    );
}

#[test]
fn setup_rejects_unknown_environment() {
    Command::cargo_bin("shelf")
        .unwrap()
        .args(["setup", "--environment", "development"])
        .assert()
        .failure()
        .stderr(contains("unsupported environment"));
}
