use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("opc-cli")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("read"))
        .stdout(predicate::str::contains("write"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("--debug"));
}

#[test]
fn test_browse_help_shows_paging_flags() {
    cargo_bin_cmd!("opc-cli")
        .args(["browse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--offset"))
        .stdout(predicate::str::contains("[BRANCH_PATH]"));
}

#[test]
fn test_browse_requires_node_and_server() {
    cargo_bin_cmd!("opc-cli")
        .args(["browse", "localhost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<SERVER>"));
}

#[test]
fn test_read_requires_a_tag() {
    cargo_bin_cmd!("opc-cli")
        .args(["read", "localhost", "Sim"])
        .assert()
        .failure();
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("opc-cli")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
