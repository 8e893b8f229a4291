//! End-to-end tests driving the `aba` binary over piped stdin

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn aba(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("aba").unwrap();
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd.env_remove("ABA_DATA_DIR").env_remove("RUST_LOG");
    cmd
}

/// Admin sets a password, creates alice, and alice sets hers
const BOOTSTRAP: &str = "\
login admin
AdminPass123
AdminPass123
ADU alice
LOU
login alice
TestPass123
TestPass123
";

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    aba(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--data-dir"));
}

#[test]
fn test_banner_and_clean_exit() {
    let dir = TempDir::new().unwrap();
    aba(&dir)
        .write_stdin("EXT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type \"help\" for a list of commands."))
        .stdout(predicate::str::contains("ABA> "))
        .stdout(predicate::str::ends_with("OK\nExiting ...\n"));
}

#[test]
fn test_bootstrap_and_whoami() {
    let dir = TempDir::new().unwrap();
    aba(&dir)
        .write_stdin(format!("{}WAI\nEXT\n", BOOTSTRAP))
        .assert()
        .success()
        .stdout(predicate::str::contains("Current user is alice"))
        .stdout(predicate::str::contains("AdminPass123").not())
        .stdout(predicate::str::contains("TestPass123").not());

    let accounts = std::fs::read_to_string(dir.path().join("data").join("accounts.txt")).unwrap();
    assert!(accounts.lines().any(|l| l.starts_with("admin:") && l.len() > 6));
    assert!(accounts.lines().any(|l| l.starts_with("alice:") && l.len() > 6));
    assert!(!accounts.contains("TestPass123"));
}

#[test]
fn test_duplicate_record_rejected() {
    let dir = TempDir::new().unwrap();
    aba(&dir)
        .write_stdin(format!(
            "{}ADR rec1 sn=Doe\nADR rec1 sn=Other\nRER rec1 sn\nEXT\n",
            BOOTSTRAP
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("rec1, sn=Doe"))
        .stdout(predicate::str::contains("sn=Other").not());
}

#[test]
fn test_admin_cannot_read_records() {
    let dir = TempDir::new().unwrap();
    aba(&dir)
        .write_stdin("login admin\nAdminPass123\nAdminPass123\nRER rec1\nEXT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Admin not authorized"));
}

#[test]
fn test_commands_need_a_session() {
    let dir = TempDir::new().unwrap();
    aba(&dir)
        .write_stdin("ADR rec1 sn=Doe\nbogus\nEXT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active login session"))
        .stdout(predicate::str::contains("Unrecognized command"));
}

#[test]
fn test_records_survive_restart() {
    let dir = TempDir::new().unwrap();
    aba(&dir)
        .write_stdin(format!("{}ADR rec1 sn=Doe \"city=New York\"\nEXT\n", BOOTSTRAP))
        .assert()
        .success();

    aba(&dir)
        .write_stdin("login alice\nTestPass123\nRER rec1 sn city\nEXT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("rec1, sn=Doe, city=New York"));
}

#[test]
fn test_wrong_password_is_audited() {
    let dir = TempDir::new().unwrap();
    aba(&dir).write_stdin(BOOTSTRAP).assert().success();

    aba(&dir)
        .write_stdin("login alice\nWrongPass1\nlogin admin\nAdminPass123\nRAL alice\nEXT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid credentials"))
        .stdout(predicate::str::contains(",LF,alice"))
        .stdout(predicate::str::contains(",L1,alice"));
}

#[test]
fn test_export_and_import() {
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("out.csv");
    let import_path = dir.path().join("in.csv");
    std::fs::write(&import_path, "rec2,Roe,Jane,,,,,,,,,\n").unwrap();

    aba(&dir)
        .write_stdin(format!(
            "{}ADR rec1 sn=Doe\nIMD {}\nEXD {}\nEXT\n",
            BOOTSTRAP,
            import_path.display(),
            export_path.display()
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 records (1 new, 0 replaced)"))
        .stdout(predicate::str::contains("Exported 2 records"));

    let exported = std::fs::read_to_string(&export_path).unwrap();
    assert!(exported.contains("rec1,Doe"));
    assert!(exported.contains("rec2,Roe,Jane"));
}
