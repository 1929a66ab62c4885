use std::process::Command;

fn run(path: &str) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_tx-ledger"))
        .arg(path)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn run_fixture(fixture: &str) -> (String, String, bool) {
    run(&format!("tests/fixtures/{fixture}"))
}

#[test]
fn deposits_and_withdrawal() {
    let (stdout, _, success) = run_fixture("basic.csv");

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "client,available,held,total,locked",
            "1,3.5,0.0,3.5,false",
            "2,3.0,0.0,3.0,false",
        ]
    );
}

#[test]
fn dispute_then_resolve_restores_balance() {
    let (stdout, _, success) = run_fixture("dispute_resolve.csv");

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[1], "1,5.0,0.0,5.0,false");
}

#[test]
fn dispute_then_chargeback_locks_account() {
    let (stdout, _, success) = run_fixture("chargeback.csv");

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[1], "1,0.0,0.0,0.0,true");
}

#[test]
fn open_withdrawal_dispute_leaves_total_short() {
    // While a withdrawal dispute is open, total != available + held. The
    // exact numbers are pinned: behavioral parity matters more here than
    // accounting consistency.
    let (stdout, _, success) = run_fixture("open_dispute.csv");

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[1], "1,5.0,2.0,3.0,false");
}

#[test]
fn rows_without_tx_id_vanish() {
    let (stdout, stderr, success) = run_fixture("skipped_rows.csv");

    assert!(success);
    assert!(stderr.is_empty());
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[1], "1,3.0,0.0,3.0,false");
}

#[test]
fn bad_field_aborts_with_no_table() {
    let (stdout, stderr, success) = run_fixture("bad_field.csv");

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("client = 'one'"));
}

#[test]
fn missing_input_produces_no_table_but_succeeds() {
    let (stdout, stderr, success) = run("tests/fixtures/no_such_file.csv");

    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("cannot read input"));
}
