use assert_cmd::Command;

fn hash160_lanes() -> Command {
    Command::cargo_bin("hash160-lanes").expect("binary is built")
}

#[test]
fn help_lists_options() {
    let output = hash160_lanes().arg("--help").output().unwrap();
    assert!(output.status.success(), "--help should succeed");
    assert!(output.stderr.is_empty(), "help output should not write to stderr");
    let stdout = String::from_utf8(output.stdout).expect("stdout is UTF-8");
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--keys"));
    assert!(stdout.contains("--start-key"));
}

#[test]
fn small_run_exits_cleanly() {
    let output = hash160_lanes()
        .args(["--keys", "64", "--verify", "8"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("verified OK").count(), 16);
    assert!(stdout.contains("Total public keys processed: 64"));
}

#[test]
fn first_key_hash_is_printed() {
    let output = hash160_lanes()
        .args(["-n", "8", "--verify", "8", "--format", "compressed"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("751e76e8199196d454941c45d1b3a323f1433bd6"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    hash160_lanes()
        .arg("--definitely-not-a-flag")
        .assert()
        .code(2);
}

#[test]
fn out_of_range_key_is_a_runtime_error() {
    hash160_lanes()
        .args([
            "-n",
            "8",
            "--start-key",
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
        ])
        .assert()
        .code(3);
}
