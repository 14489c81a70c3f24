use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db_with_data, setup_test_db, tb, temp_out};

#[test]
fn test_export_rides_csv_uses_sheet_columns() {
    let db_path = setup_test_db("export_rides_csv");
    init_db_with_data(&db_path);
    let out = temp_out("export_rides_csv", "csv");

    tb().args([
        "--db", &db_path, "--test", "export", "--format", "csv", "--entity", "rides", "--file",
        &out, "--range", "2025-09", "--force",
    ])
    .assert()
    .success()
    .stdout(contains("CSV export completed (3 rows)"));

    let content = fs::read_to_string(&out).expect("read csv");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Time,Fare,Tip,Total,Payment,Origin,Destination,Shift ID,Notes,ID")
    );
    assert!(content.contains("2025-09-01,09:00,12.50,0.00,12.50,cash,Airport,Centre,1,,1"));
    assert!(content.contains("22.00,card"));
}

#[test]
fn test_export_shifts_json() {
    let db_path = setup_test_db("export_shifts_json");
    init_db_with_data(&db_path);
    let out = temp_out("export_shifts_json", "json");

    tb().args([
        "--db", &db_path, "--test", "export", "--format", "json", "--entity", "shifts", "--file",
        &out, "--force",
    ])
    .assert()
    .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read json")).expect("valid json");
    let first = &json[0];
    assert_eq!(first["Start"], "2025-09-01 08:00");
    assert_eq!(first["Km Total"], "180");
    assert_eq!(first["Break Minutes"], "30");
    assert_eq!(first["Worked Minutes"], "480");
}

#[test]
fn test_export_expenses_xlsx() {
    let db_path = setup_test_db("export_expenses_xlsx");
    init_db_with_data(&db_path);
    let out = temp_out("export_expenses_xlsx", "xlsx");

    tb().args([
        "--db", &db_path, "--test", "export", "--format", "xlsx", "--entity", "expenses", "--file",
        &out, "--force",
    ])
    .assert()
    .success();

    let bytes = fs::read(&out).expect("read xlsx");
    // xlsx files are zip containers
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_export_empty_range_writes_nothing() {
    let db_path = setup_test_db("export_empty");
    init_db_with_data(&db_path);
    let out = temp_out("export_empty", "csv");

    tb().args([
        "--db", &db_path, "--test", "export", "--entity", "rides", "--file", &out, "--range",
        "2024",
    ])
    .assert()
    .success()
    .stdout(contains("No rides found"));

    assert!(!std::path::Path::new(&out).exists());
}

#[test]
fn test_export_requires_absolute_path() {
    let db_path = setup_test_db("export_relative");
    init_db_with_data(&db_path);

    tb().args(["--db", &db_path, "--test", "export", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}
