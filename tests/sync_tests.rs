use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use taxibook::errors::{AppError, AppResult};
use taxibook::google::{Rows, SheetsApi};
use taxibook::models::shift::{Break, Shift};
use taxibook::sync::schema::{self, SHEETS};
use taxibook::db::pool::DbPool;
use taxibook::db::queries::settings::{LAST_SYNC, get_setting};
use taxibook::sync::{self, Snapshot, SyncService};

/// In-memory spreadsheet recording every call.
#[derive(Default)]
struct MockSheets {
    live_id: Option<String>,
    search_hit: Option<String>,
    sheets: RefCell<BTreeMap<String, Rows>>,
    calls: RefCell<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl MockSheets {
    fn with_id(id: &str) -> Self {
        let mock = MockSheets {
            live_id: Some(id.to_string()),
            ..MockSheets::default()
        };
        for sheet in &SHEETS {
            mock.sheets
                .borrow_mut()
                .insert(sheet.name.to_string(), vec![sheet.header_row()]);
        }
        mock
    }

    fn set_rows(&self, sheet: &str, rows: Vec<Vec<&str>>) {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(str::to_string).collect())
            .collect();
        self.sheets.borrow_mut().insert(sheet.to_string(), rows);
    }

    fn record(&self, call: String) -> AppResult<()> {
        let fail = self.fail_on.is_some_and(|f| call.starts_with(f));
        self.calls.borrow_mut().push(call);
        if fail {
            return Err(AppError::GoogleApi {
                status: 500,
                message: "backend error".into(),
            });
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("clear") || c.starts_with("update") || c.starts_with("append"))
            .collect()
    }
}

fn sheet_of(range: &str) -> String {
    range.split('!').next().unwrap_or(range).to_string()
}

/// "Shifts!A5:I5" → 5
fn first_row_of(range: &str) -> usize {
    let cells = range.split('!').nth(1).unwrap_or("A1");
    cells
        .split(':')
        .next()
        .unwrap_or("A1")
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .unwrap_or(1)
}

impl SheetsApi for MockSheets {
    fn spreadsheet_exists(&self, spreadsheet_id: &str) -> AppResult<bool> {
        self.record(format!("exists:{spreadsheet_id}"))?;
        Ok(self.live_id.as_deref() == Some(spreadsheet_id))
    }

    fn find_spreadsheet(&self, name: &str) -> AppResult<Option<String>> {
        self.record(format!("find:{name}"))?;
        Ok(self.search_hit.clone())
    }

    fn create_spreadsheet(&self, name: &str, sheets: &[&str]) -> AppResult<String> {
        self.record(format!("create:{name}"))?;
        let mut store = self.sheets.borrow_mut();
        for s in sheets {
            store.insert(s.to_string(), Vec::new());
        }
        Ok("created-1".to_string())
    }

    fn sheet_titles(&self, _spreadsheet_id: &str) -> AppResult<Vec<String>> {
        self.record("titles".to_string())?;
        Ok(self.sheets.borrow().keys().cloned().collect())
    }

    fn add_sheet(&self, _spreadsheet_id: &str, title: &str) -> AppResult<()> {
        self.record(format!("add:{title}"))?;
        self.sheets.borrow_mut().insert(title.to_string(), Vec::new());
        Ok(())
    }

    fn get_values(&self, _spreadsheet_id: &str, range: &str) -> AppResult<Rows> {
        self.record(format!("get:{range}"))?;
        Ok(self
            .sheets
            .borrow()
            .get(&sheet_of(range))
            .cloned()
            .unwrap_or_default())
    }

    fn update_values(&self, _spreadsheet_id: &str, range: &str, values: Rows) -> AppResult<()> {
        self.record(format!("update:{range}"))?;
        let mut store = self.sheets.borrow_mut();
        let rows = store.entry(sheet_of(range)).or_default();
        let start = first_row_of(range) - 1;
        for (i, row) in values.into_iter().enumerate() {
            if rows.len() <= start + i {
                rows.resize(start + i + 1, Vec::new());
            }
            rows[start + i] = row;
        }
        Ok(())
    }

    fn append_values(&self, _spreadsheet_id: &str, range: &str, values: Rows) -> AppResult<()> {
        self.record(format!("append:{range}"))?;
        self.sheets
            .borrow_mut()
            .entry(sheet_of(range))
            .or_default()
            .extend(values);
        Ok(())
    }

    fn clear_values(&self, _spreadsheet_id: &str, range: &str) -> AppResult<()> {
        self.record(format!("clear:{range}"))?;
        if let Some(rows) = self.sheets.borrow_mut().get_mut(&sheet_of(range)) {
            rows.clear();
        }
        Ok(())
    }

    fn delete_row(&self, _spreadsheet_id: &str, sheet: &str, row: usize) -> AppResult<()> {
        self.record(format!("delete:{sheet}:{row}"))?;
        if let Some(rows) = self.sheets.borrow_mut().get_mut(sheet) {
            rows.remove(row - 1);
        }
        Ok(())
    }
}

fn shift(id: i64) -> Shift {
    let day = NaiveDate::from_ymd_opt(2025, 9, 1).expect("date");
    Shift {
        id,
        start: day.and_hms_opt(8, 0, 0).expect("time"),
        end: Some(day.and_hms_opt(16, 0, 0).expect("time")),
        km_start: 100,
        km_end: Some(250),
        breaks: vec![Break {
            start: day.and_hms_opt(12, 0, 0).expect("time"),
            end: Some(day.and_hms_opt(12, 45, 0).expect("time")),
        }],
        notes: String::new(),
        created_at: String::new(),
    }
}

#[test]
fn find_row_scans_the_last_column_from_row_two() {
    let mock = MockSheets::with_id("sheet-1");
    mock.set_rows(
        schema::VENDORS,
        vec![
            vec!["Name", "Tax ID", "ID"],
            vec!["3", "", "1"],
            vec!["Cepsa", "A28003119", "3"],
        ],
    );
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    assert_eq!(service.find_row(schema::VENDORS, "3").expect("lookup"), Some(3));
    assert_eq!(service.find_row(schema::VENDORS, "1").expect("lookup"), Some(2));
    assert_eq!(service.find_row(schema::VENDORS, "9").expect("lookup"), None);
    // the header row is never a match
    assert_eq!(service.find_row(schema::VENDORS, "ID").expect("lookup"), None);
}

#[test]
fn find_row_uses_the_key_column_for_settings() {
    let mock = MockSheets::with_id("sheet-1");
    mock.set_rows(
        schema::SETTINGS,
        vec![
            vec!["Key", "Value"],
            vec!["spreadsheet_id", "sheet-1"],
            vec!["last_sync", "2025-09-01 10:00:00"],
        ],
    );
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    assert_eq!(service.find_row(schema::SETTINGS, "last_sync").expect("lookup"), Some(3));
    assert_eq!(service.find_row(schema::SETTINGS, "sheet-1").expect("lookup"), None);
}

#[test]
fn bulk_replace_clears_rewrites_headers_and_skips_empty_appends() {
    let mock = MockSheets::with_id("sheet-1");
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    let snapshot = Snapshot {
        shifts: vec![shift(1), shift(2)],
        ..Snapshot::default()
    };
    let written = service.bulk_replace(&snapshot).expect("bulk replace");
    assert_eq!(written, 2);

    let mut expected = Vec::new();
    for sheet in &SHEETS {
        expected.push(format!("clear:{}", sheet.full_range()));
        expected.push(format!("update:{}", sheet.header_range()));
        if sheet.name == schema::SHIFTS {
            expected.push(format!("append:{}", sheet.append_range()));
        }
    }
    assert_eq!(service.api().writes(), expected);

    let rows = service.api().sheets.borrow()[schema::SHIFTS].clone();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][4], "150");
    assert_eq!(rows[1][5], "45");
    assert_eq!(rows[1][6], "435");
    assert_eq!(rows[2][8], "2");
}

#[test]
fn failure_drops_the_cached_spreadsheet_id() {
    let mock = MockSheets {
        fail_on: Some("append"),
        search_hit: Some("found-7".to_string()),
        ..MockSheets::with_id("sheet-1")
    };
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    let snapshot = Snapshot {
        shifts: vec![shift(1)],
        ..Snapshot::default()
    };
    assert!(service.bulk_replace(&snapshot).is_err());
    assert_eq!(service.spreadsheet_id(), None);

    // next call resolves again: no cached id to verify, straight to the search
    service.find_row(schema::SHIFTS, "1").expect("lookup");
    let calls = service.api().calls();
    let after_failure: Vec<_> = calls
        .iter()
        .skip_while(|c| !c.starts_with("append"))
        .skip(1)
        .collect();
    assert_eq!(after_failure.first().map(|c| c.as_str()), Some("find:Taxibook"));
    assert_eq!(service.spreadsheet_id(), Some("found-7"));
}

#[test]
fn stale_id_falls_back_to_search_then_creation() {
    // cached id no longer exists and nothing is found: create + headers
    let mock = MockSheets::default();
    let mut service = SyncService::new(mock, "Taxibook", Some("gone".to_string()));

    let id = service.ensure_spreadsheet().expect("resolve");
    assert_eq!(id, "created-1");

    let calls = service.api().calls();
    assert_eq!(calls[0], "exists:gone");
    assert_eq!(calls[1], "find:Taxibook");
    assert_eq!(calls[2], "create:Taxibook");
    let headers = calls.iter().filter(|c| c.starts_with("update:")).count();
    assert_eq!(headers, SHEETS.len());

    let store = service.api().sheets.borrow();
    assert_eq!(store[schema::RIDES][0][0], "Date");
    assert_eq!(store[schema::SETTINGS][0], vec!["Key", "Value"]);
}

#[test]
fn found_spreadsheet_gets_missing_sheets_added() {
    let mock = MockSheets {
        search_hit: Some("found-1".to_string()),
        ..MockSheets::default()
    };
    mock.set_rows(schema::SHIFTS, vec![schema::SHEETS[0].headers.to_vec()]);
    let mut service = SyncService::new(mock, "Taxibook", None);

    assert_eq!(service.ensure_spreadsheet().expect("resolve"), "found-1");

    let calls = service.api().calls();
    assert!(!calls.iter().any(|c| c == "add:Shifts"));
    assert!(calls.iter().any(|c| c == "add:Rides"));
    assert!(calls.iter().any(|c| c == "add:Settings"));
    assert!(!calls.iter().any(|c| c.starts_with("create")));
}

#[test]
fn ensure_sheets_adds_only_what_is_missing() {
    let mock = MockSheets::with_id("sheet-1");
    mock.sheets.borrow_mut().remove(schema::WORKSHOPS);
    mock.sheets.borrow_mut().remove(schema::SETTINGS);
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    assert_eq!(service.ensure_sheets().expect("first pass"), 2);
    assert_eq!(service.ensure_sheets().expect("second pass"), 0);
    assert_eq!(service.spreadsheet_id(), Some("sheet-1"));
}

#[test]
fn deleted_sheet_is_recreated_by_the_next_write() {
    let mock = MockSheets::with_id("sheet-1");
    mock.sheets.borrow_mut().remove(schema::SHIFTS);
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    assert!(!service.delete_shift(3).expect("nothing to delete"));
    service.api().sheets.borrow_mut().remove(schema::SHIFTS);
    service.upsert_shift(&shift(3)).expect("append");

    assert_eq!(service.spreadsheet_id(), Some("sheet-1"));
    let adds = service
        .api()
        .calls()
        .into_iter()
        .filter(|c| c == "add:Shifts")
        .count();
    assert_eq!(adds, 2);
    let rows = service.api().sheets.borrow()[schema::SHIFTS].clone();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], SHEETS[0].header_row());
    assert_eq!(rows[1][8], "3");
}

#[test]
fn mark_synced_stamps_local_and_remote_settings() {
    let pool = DbPool::in_memory().expect("db");
    let mock = MockSheets::with_id("sheet-1");
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    sync::mark_synced(&pool.conn, &mut service).expect("stamp");

    let local = get_setting(&pool.conn, LAST_SYNC).expect("read").expect("stored");
    let rows = service.api().sheets.borrow()[schema::SETTINGS].clone();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], vec![LAST_SYNC.to_string(), local]);
}

#[test]
fn upsert_updates_in_place_or_appends() {
    let mock = MockSheets::with_id("sheet-1");
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    service.upsert_shift(&shift(5)).expect("append");
    service.upsert_shift(&shift(6)).expect("append");

    let mut edited = shift(5);
    edited.notes = "airport day".to_string();
    service.upsert_shift(&edited).expect("update");

    let calls = service.api().writes();
    assert_eq!(
        calls,
        vec![
            "append:Shifts!A1".to_string(),
            "append:Shifts!A1".to_string(),
            "update:Shifts!A2:I2".to_string(),
        ]
    );
    let rows = service.api().sheets.borrow()[schema::SHIFTS].clone();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][7], "airport day");
}

#[test]
fn setting_upsert_is_keyed_by_name() {
    let mock = MockSheets::with_id("sheet-1");
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));

    service.upsert_setting("last_sync", "2025-09-01 10:00:00").expect("append");
    service.upsert_setting("last_sync", "2025-09-02 18:30:00").expect("update");

    let rows = service.api().sheets.borrow()[schema::SETTINGS].clone();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], vec!["last_sync".to_string(), "2025-09-02 18:30:00".to_string()]);
}

#[test]
fn delete_removes_the_matching_row_only() {
    let mock = MockSheets::with_id("sheet-1");
    let mut service = SyncService::new(mock, "Taxibook", Some("sheet-1".to_string()));
    service.upsert_shift(&shift(1)).expect("append");
    service.upsert_shift(&shift(2)).expect("append");

    assert!(service.delete_shift(1).expect("delete"));
    assert!(!service.delete_shift(42).expect("noop"));

    let deletes: Vec<_> = service
        .api()
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("delete"))
        .collect();
    assert_eq!(deletes, vec!["delete:Shifts:2".to_string()]);
    assert_eq!(service.find_row(schema::SHIFTS, "2").expect("lookup"), Some(2));
}

#[test]
fn column_letters() {
    assert_eq!(schema::column_letter(0), "A");
    assert_eq!(schema::column_letter(14), "O");
    assert_eq!(schema::column_letter(26), "AA");
    assert_eq!(schema::SHEETS[2].full_range(), "Expenses!A1:O10000");
}
