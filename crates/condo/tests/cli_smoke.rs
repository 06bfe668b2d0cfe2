use assert_cmd::Command;
use predicates::prelude::*;

fn condo(home: &tempfile::TempDir) -> Command {
    let mut command = Command::cargo_bin("condo").expect("binary exists");
    command
        .current_dir(home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("CONDO_ROLE")
        .env_remove("CONDO_UNIT")
        .env_remove("CONDO_LOG");
    command
}

#[test]
fn help_displays_usage() {
    let home = tempfile::tempdir().unwrap();
    condo(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn slots_prints_json_listing() {
    let home = tempfile::tempdir().unwrap();
    condo(&home)
        .args(["slots", "--facility", "pool", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Swimming Pool\""))
        .stdout(predicate::str::contains("\"09:00\""))
        .stdout(predicate::str::contains("\"available\": false"));
}

#[test]
fn slots_honours_workspace_schedule() {
    let home = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(home.path().join(".condo")).unwrap();
    std::fs::write(
        home.path().join(".condo/config.toml"),
        "[reservations]\nopening_hour = 7\nclosing_hour = 10\n",
    )
    .unwrap();
    condo(&home)
        .args(["slots", "--facility", "gym"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Gym · "))
        .stdout(predicate::str::contains("07:00"))
        .stdout(predicate::str::contains("10:00").not());
}

#[test]
fn unknown_facility_fails() {
    let home = tempfile::tempdir().unwrap();
    condo(&home)
        .args(["slots", "--facility", "spa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown facility 'spa'"));
}

#[test]
fn completions_are_generated() {
    let home = tempfile::tempdir().unwrap();
    condo(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("condo"));
}
