use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db_with_data, run_ok, setup_test_db, tb, temp_out};

#[test]
fn test_shift_lifecycle_and_single_active_shift() {
    let db_path = setup_test_db("shift_lifecycle");
    run_ok(&db_path, &["init"]);

    tb().args(["--db", &db_path, "--test", "shift", "start", "--at", "2025-09-03 07:00", "--km", "500"])
        .assert()
        .success()
        .stdout(contains("Shift 1 started at 2025-09-03 07:00"));

    tb().args(["--db", &db_path, "--test", "shift", "start", "--at", "2025-09-03 08:00"])
        .assert()
        .failure()
        .stderr(contains("already active"));

    tb().args(["--db", &db_path, "--test", "shift", "status"])
        .assert()
        .success()
        .stdout(contains("Shift 1"))
        .stdout(contains("500 km"));

    tb().args(["--db", &db_path, "--test", "shift", "end", "--at", "2025-09-03 15:00", "--km", "620"])
        .assert()
        .success()
        .stdout(contains("08h 00m worked, 120 km"));

    tb().args(["--db", &db_path, "--test", "shift", "status"])
        .assert()
        .success()
        .stdout(contains("No active shift."));
}

#[test]
fn test_shift_start_continues_odometer() {
    let db_path = setup_test_db("shift_odometer");
    init_db_with_data(&db_path);

    tb().args(["--db", &db_path, "--test", "shift", "start", "--at", "2025-09-04 08:00"])
        .assert()
        .success()
        .stdout(contains("odometer 1180 km"));
}

#[test]
fn test_shift_end_rejects_lower_odometer() {
    let db_path = setup_test_db("shift_bad_km");
    run_ok(&db_path, &["init"]);
    run_ok(&db_path, &["shift", "start", "--at", "2025-09-03 07:00", "--km", "500"]);

    tb().args(["--db", &db_path, "--test", "shift", "end", "--at", "2025-09-03 15:00", "--km", "499"])
        .assert()
        .failure()
        .stderr(contains("lower than the initial"));
}

#[test]
fn test_shift_end_closes_running_break() {
    let db_path = setup_test_db("shift_open_break");
    run_ok(&db_path, &["init"]);
    run_ok(&db_path, &["shift", "start", "--at", "2025-09-05 06:00", "--km", "10"]);
    run_ok(&db_path, &["shift", "break-start", "--at", "2025-09-05 13:00"]);
    run_ok(&db_path, &["shift", "end", "--at", "2025-09-05 14:00", "--km", "50"]);

    tb().args(["--db", &db_path, "--test", "shift", "list", "--period", "2025-09"])
        .assert()
        .success()
        .stdout(contains("01h 00m"))
        .stdout(contains("07h 00m"));
}

#[test]
fn test_ride_requires_active_shift() {
    let db_path = setup_test_db("ride_no_shift");
    run_ok(&db_path, &["init"]);

    tb().args(["--db", &db_path, "--test", "ride", "add", "10.00"])
        .assert()
        .failure()
        .stderr(contains("No active shift"));
}

#[test]
fn test_ride_outside_shift_is_rejected() {
    let db_path = setup_test_db("ride_outside");
    init_db_with_data(&db_path);

    tb().args([
        "--db", &db_path, "--test", "ride", "add", "9.00", "--shift", "1", "--at", "2025-09-01 18:00",
    ])
    .assert()
    .failure()
    .stderr(contains("after shift 1 ended"));
}

#[test]
fn test_ride_list_and_invalid_payment() {
    let db_path = setup_test_db("ride_list");
    init_db_with_data(&db_path);

    tb().args(["--db", &db_path, "--test", "ride", "list", "--period", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("Airport"))
        .stdout(contains("3 rides, total 42.00 EUR"));

    run_ok(&db_path, &["shift", "start", "--at", "2025-09-06 08:00"]);
    tb().args(["--db", &db_path, "--test", "ride", "add", "5", "--pay", "bitcoin"])
        .assert()
        .failure()
        .stderr(contains("Invalid payment method"));
}

#[test]
fn test_shift_delete_removes_its_rides() {
    let db_path = setup_test_db("shift_delete");
    init_db_with_data(&db_path);

    tb().args(["--db", &db_path, "--test", "shift", "del", "1"])
        .assert()
        .success()
        .stdout(contains("together with 3 ride(s)"));

    tb().args(["--db", &db_path, "--test", "ride", "list", "--shift", "1"])
        .assert()
        .success()
        .stdout(contains("No rides found."));
}

#[test]
fn test_expense_derives_tax_from_base() {
    let db_path = setup_test_db("expense_base");
    run_ok(&db_path, &["init"]);

    tb().args([
        "--db", &db_path, "--test", "expense", "add", "--concept", "maint", "--base", "100",
        "--date", "2025-09-10",
    ])
    .assert()
    .success()
    .stdout(contains("Maintenance 121.00 EUR"))
    .stdout(contains("tax 21.00"));
}

#[test]
fn test_expense_mismatch_is_rejected() {
    let db_path = setup_test_db("expense_mismatch");
    run_ok(&db_path, &["init"]);

    tb().args([
        "--db", &db_path, "--test", "expense", "add", "--concept", "Fuel", "--base", "100",
        "--total", "130",
    ])
    .assert()
    .failure()
    .stderr(contains("do not reconcile"));
}

#[test]
fn test_expense_from_services_with_discount() {
    let db_path = setup_test_db("expense_services");
    run_ok(&db_path, &["init"]);

    tb().args([
        "--db", &db_path, "--test", "expense", "add", "--concept", "Maintenance", "--workshop",
        "Taller Pepe", "--service", "Oil=40", "--service", "Filter=10", "--discount", "5",
        "--date", "2025-09-11",
    ])
    .assert()
    .success()
    .stdout(contains("55.50 EUR"));
}

#[test]
fn test_vendor_autocomplete_and_ambiguity() {
    let db_path = setup_test_db("expense_autocomplete");
    run_ok(&db_path, &["init"]);
    run_ok(&db_path, &["ref", "add", "vendor", "Repsol Norte", "--tax-id", "b12345678"]);
    run_ok(&db_path, &["ref", "add", "vendor", "Repsol Sur"]);
    run_ok(&db_path, &["ref", "add", "vendor", "Cepsa"]);

    tb().args(["--db", &db_path, "--test", "ref", "suggest", "vendor", "rep"])
        .assert()
        .success()
        .stdout(contains("Repsol Norte").and(contains("Repsol Sur")))
        .stdout(contains("Cepsa").not());

    tb().args([
        "--db", &db_path, "--test", "expense", "add", "--concept", "Fuel", "--vendor", "rep",
        "--total", "50",
    ])
    .assert()
    .failure()
    .stderr(contains("Ambiguous Vendor"));

    tb().args([
        "--db", &db_path, "--test", "expense", "add", "--concept", "Fuel", "--vendor", "norte",
        "--total", "50", "--date", "2025-09-12",
    ])
    .assert()
    .success();

    tb().args(["--db", &db_path, "--test", "expense", "list", "--period", "2025-09"])
        .assert()
        .success()
        .stdout(contains("Repsol Norte"));

    tb().args(["--db", &db_path, "--test", "ref", "add", "vendor", "cepsa"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn test_summary_for_month() {
    let db_path = setup_test_db("summary_month");
    init_db_with_data(&db_path);

    tb().args(["--db", &db_path, "--test", "summary", "--period", "2025-09"])
        .assert()
        .success()
        .stdout(contains("Summary 2025-09-01 → 2025-09-30"))
        .stdout(contains("08h 00m"))
        .stdout(contains("Km driven      : 180"))
        .stdout(contains("Revenue        : 42.00 EUR"))
        .stdout(contains("60.50 EUR"))
        .stdout(contains("-18.50 EUR"))
        .stdout(contains("5.25 EUR"));
}

#[test]
fn test_scan_text_receipt_and_save() {
    let db_path = setup_test_db("scan_text");
    run_ok(&db_path, &["init"]);

    let receipt = temp_out("scan_receipt", "txt");
    fs::write(
        &receipt,
        "REPSOL ESTACION\nCIF: B12345678\nFACTURA: F-2025/001\nFecha 03/09/2025\nLitros 30,25 L\nIVA 21% 7,86\nTOTAL 45,30 EUR\n",
    )
    .expect("write receipt");

    tb().args(["--db", &db_path, "--test", "scan", "--text", &receipt, "--save"])
        .assert()
        .success()
        .stdout(contains("Amount  : 45.30"))
        .stdout(contains("Liters  : 30.25"))
        .stdout(contains("Date    : 2025-09-03"))
        .stdout(contains("Tax ID  : B12345678"))
        .stdout(contains("Invoice : F-2025/001"))
        .stdout(contains("Vendor  : Repsol"))
        .stdout(contains("(Fuel 45.30)"));

    // same invoice from the same tax id is refused
    tb().args(["--db", &db_path, "--test", "scan", "--text", &receipt, "--save"])
        .assert()
        .failure()
        .stderr(contains("already recorded"));
}

#[test]
fn test_log_print_and_db_info() {
    let db_path = setup_test_db("log_print");
    init_db_with_data(&db_path);

    tb().args(["--db", &db_path, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("shift_start"))
        .stdout(contains("ride_add"))
        .stdout(contains("migration_applied"));

    tb().args(["--db", &db_path, "--test", "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Rides:"))
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_config_theme_and_sync_flags() {
    let db_path = setup_test_db("config_flags");
    run_ok(&db_path, &["init"]);

    tb().args(["--db", &db_path, "--test", "config", "--theme", "light", "--set-sync", "on"])
        .assert()
        .success()
        .stdout(contains("Theme: light, Google Sheets sync: on"));

    tb().args(["--db", &db_path, "--test", "config", "--theme", "sepia"])
        .assert()
        .failure()
        .stderr(contains("Unknown theme"));
}

#[test]
fn test_auto_sync_failure_keeps_the_local_write() {
    let db_path = setup_test_db("auto_sync_fail");
    run_ok(&db_path, &["init"]);

    let mut home = std::env::temp_dir();
    home.push("taxibook_auto_sync_home");
    fs::create_dir_all(&home).expect("home dir");
    fs::write(
        home.join("taxibook.conf"),
        format!(
            "database: '{}'\nsetup_completed: true\nsync:\n  enabled: true\n  auto_sync: true\n",
            db_path
        ),
    )
    .expect("write config");

    // no credentials: the mirror fails, the shift is still stored
    tb().env("TAXIBOOK_HOME", &home)
        .args(["--db", &db_path, "shift", "start", "--km", "100"])
        .assert()
        .success()
        .stdout(contains("Saved locally").and(contains("No Google credentials")));

    tb().args(["--db", &db_path, "--test", "shift", "status"])
        .assert()
        .success()
        .stdout(contains("Odometer  : 100 km"));

    tb().args(["--db", &db_path, "--test", "log", "--print", "--op", "sync_failed"])
        .assert()
        .success()
        .stdout(contains("sync_failed"));
}

#[test]
fn test_sync_status_without_credentials_fails_cleanly() {
    let db_path = setup_test_db("sync_no_creds");
    run_ok(&db_path, &["init"]);

    tb().args(["--db", &db_path, "--test", "sync", "status"])
        .assert()
        .failure()
        .stderr(contains("No Google credentials"));
}

#[test]
fn test_backup_compressed() {
    let db_path = setup_test_db("backup_zip");
    init_db_with_data(&db_path);
    let out = temp_out("backup_zip", "sqlite");
    let zip = out.replace(".sqlite", ".zip");
    fs::remove_file(&zip).ok();

    tb().args(["--db", &db_path, "--test", "backup", "--file", &out, "--compress", "--force"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(std::path::Path::new(&zip).exists());
}
