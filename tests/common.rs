#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, always in test mode and isolated from the user's home.
pub fn tb() -> Command {
    let mut cmd = cargo_bin_cmd!("taxibook");
    let mut home: PathBuf = env::temp_dir();
    home.push("taxibook_test_home");
    cmd.env("TAXIBOOK_HOME", home);
    cmd.env_remove("TAXIBOOK_GOOGLE_TOKEN");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_taxibook.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Run a command against `db_path` in test mode and require success.
pub fn run_ok(db_path: &str, args: &[&str]) {
    tb().args(["--db", db_path, "--test"])
        .args(args)
        .assert()
        .success();
}

/// Initialize a DB and record one closed shift (2025-09-01) with three rides
/// and one fuel expense.
pub fn init_db_with_data(db_path: &str) {
    run_ok(db_path, &["init"]);

    run_ok(
        db_path,
        &["shift", "start", "--at", "2025-09-01 08:00", "--km", "1000"],
    );
    run_ok(db_path, &["shift", "break-start", "--at", "2025-09-01 12:00"]);
    run_ok(db_path, &["shift", "break-end", "--at", "2025-09-01 12:30"]);
    run_ok(
        db_path,
        &[
            "ride", "add", "12.50", "--at", "2025-09-01 09:00", "--pay", "cash", "--from", "Airport",
            "--to", "Centre",
        ],
    );
    run_ok(
        db_path,
        &["ride", "add", "20,00", "--tip", "2", "--at", "2025-09-01 10:15", "--pay", "card"],
    );
    run_ok(
        db_path,
        &["ride", "add", "7.50", "--at", "2025-09-01 15:40", "--pay", "app"],
    );
    run_ok(
        db_path,
        &["shift", "end", "--at", "2025-09-01 16:30", "--km", "1180"],
    );

    run_ok(
        db_path,
        &[
            "expense", "add", "--concept", "Fuel", "--date", "2025-09-02", "--total", "60.50",
            "--liters", "40",
        ],
    );
}
