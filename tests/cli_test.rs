use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("queuedesk"));
    cmd.arg("tests/fixtures/commands.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "account,current_serving,waiting,processing,issued,max_customers",
        ))
        // bakery: capacity 1, second admit refused
        .stdout(predicate::str::contains("bakery,1,1,1,2,1"))
        // florist: one served, the release of an unknown ticket changed nothing
        .stdout(predicate::str::contains("florist,1,0,1,1,2"))
        .stdout(predicate::str::contains("ghost").not())
        .stderr(predicate::str::contains("limit reached"))
        .stderr(predicate::str::contains("invalid entry"))
        .stderr(predicate::str::contains("Account not found: ghost"));

    Ok(())
}

#[test]
fn test_cli_missing_input_fails() {
    let mut cmd = Command::new(cargo_bin!("queuedesk"));
    cmd.arg("tests/fixtures/does_not_exist.csv");

    cmd.assert().failure();
}
