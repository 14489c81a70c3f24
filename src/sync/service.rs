use super::rows::{self, Snapshot};
use super::schema::{self, SHEETS, SheetDef};
use crate::errors::{AppError, AppResult};
use crate::google::{Rows, SheetsApi};
use crate::models::expense::Expense;
use crate::models::reference::{RefKind, Reference};
use crate::models::ride::Ride;
use crate::models::shift::Shift;

/// Mirrors local records into a spreadsheet through a `SheetsApi`.
///
/// The spreadsheet id is cached between calls. Any failed operation drops
/// the cache, so the next call resolves the spreadsheet again (cached id,
/// then Drive search by name, then creation).
pub struct SyncService<A: SheetsApi> {
    api: A,
    spreadsheet_name: String,
    spreadsheet_id: Option<String>,
}

impl<A: SheetsApi> SyncService<A> {
    pub fn new(api: A, spreadsheet_name: impl Into<String>, cached_id: Option<String>) -> Self {
        Self {
            api,
            spreadsheet_name: spreadsheet_name.into(),
            spreadsheet_id: cached_id.filter(|id| !id.trim().is_empty()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.spreadsheet_id.as_deref()
    }

    pub fn spreadsheet_name(&self) -> &str {
        &self.spreadsheet_name
    }

    pub fn ensure_spreadsheet(&mut self) -> AppResult<String> {
        let resolved = self.resolve();
        if resolved.is_err() {
            self.spreadsheet_id = None;
        }
        resolved
    }

    fn resolve(&mut self) -> AppResult<String> {
        if let Some(id) = self.spreadsheet_id.clone() {
            if self.api.spreadsheet_exists(&id)? {
                return Ok(id);
            }
            self.spreadsheet_id = None;
        }

        if let Some(id) = self.api.find_spreadsheet(&self.spreadsheet_name)? {
            add_missing_sheets(&self.api, &id)?;
            self.spreadsheet_id = Some(id.clone());
            return Ok(id);
        }

        let id = self
            .api
            .create_spreadsheet(&self.spreadsheet_name, &schema::sheet_names())?;
        for sheet in &SHEETS {
            self.api
                .update_values(&id, &sheet.header_range(), vec![sheet.header_row()])?;
        }
        self.spreadsheet_id = Some(id.clone());
        Ok(id)
    }

    /// Run `op` against the resolved spreadsheet, forgetting the id on failure.
    fn guarded<T>(&mut self, op: impl FnOnce(&A, &str) -> AppResult<T>) -> AppResult<T> {
        let id = self.ensure_spreadsheet()?;
        let result = op(&self.api, &id);
        if result.is_err() {
            self.spreadsheet_id = None;
        }
        result
    }

    /// Add every schema sheet the spreadsheet lacks. Returns how many were added.
    pub fn ensure_sheets(&mut self) -> AppResult<usize> {
        self.guarded(|api, id| add_missing_sheets(api, id))
    }

    /// 1-based row holding `entity_id`, scanning from row 2.
    pub fn find_row(&mut self, sheet_name: &str, entity_id: &str) -> AppResult<Option<usize>> {
        let sheet = lookup(sheet_name)?;
        self.guarded(|api, id| find_in(api, id, sheet, entity_id))
    }

    fn upsert(&mut self, sheet_name: &str, entity_id: &str, row: Vec<String>) -> AppResult<()> {
        let sheet = lookup(sheet_name)?;
        self.guarded(|api, id| {
            if restore_sheet(api, id, sheet)? {
                return api.append_values(id, &sheet.append_range(), vec![row]);
            }
            match find_in(api, id, sheet, entity_id)? {
                Some(n) => api.update_values(id, &sheet.row_range(n), vec![row]),
                None => api.append_values(id, &sheet.append_range(), vec![row]),
            }
        })
    }

    fn remove(&mut self, sheet_name: &str, entity_id: &str) -> AppResult<bool> {
        let sheet = lookup(sheet_name)?;
        self.guarded(|api, id| {
            if restore_sheet(api, id, sheet)? {
                return Ok(false);
            }
            match find_in(api, id, sheet, entity_id)? {
                Some(n) => api.delete_row(id, sheet.name, n).map(|_| true),
                None => Ok(false),
            }
        })
    }

    pub fn upsert_shift(&mut self, shift: &Shift) -> AppResult<()> {
        self.upsert(schema::SHIFTS, &shift.id.to_string(), rows::shift_row(shift))
    }

    pub fn upsert_ride(&mut self, ride: &Ride) -> AppResult<()> {
        self.upsert(schema::RIDES, &ride.id.to_string(), rows::ride_row(ride))
    }

    pub fn upsert_expense(&mut self, expense: &Expense) -> AppResult<()> {
        self.upsert(schema::EXPENSES, &expense.id.to_string(), rows::expense_row(expense))
    }

    pub fn upsert_reference(&mut self, reference: &Reference) -> AppResult<()> {
        self.upsert(
            rows::reference_sheet(reference.kind),
            &reference.id.to_string(),
            rows::reference_row(reference),
        )
    }

    pub fn upsert_setting(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.upsert(schema::SETTINGS, key, rows::setting_row(key, value))
    }

    pub fn delete_shift(&mut self, id: i64) -> AppResult<bool> {
        self.remove(schema::SHIFTS, &id.to_string())
    }

    pub fn delete_ride(&mut self, id: i64) -> AppResult<bool> {
        self.remove(schema::RIDES, &id.to_string())
    }

    pub fn delete_expense(&mut self, id: i64) -> AppResult<bool> {
        self.remove(schema::EXPENSES, &id.to_string())
    }

    pub fn delete_reference(&mut self, kind: RefKind, id: i64) -> AppResult<bool> {
        self.remove(rows::reference_sheet(kind), &id.to_string())
    }

    /// Replace every sheet with the snapshot: clear, rewrite the header,
    /// append the rows (skipped when the collection is empty). Not atomic:
    /// an error leaves the sheets written so far in place.
    pub fn bulk_replace(&mut self, snapshot: &Snapshot) -> AppResult<usize> {
        self.guarded(|api, id| {
            add_missing_sheets(api, id)?;
            let mut written = 0;
            for sheet in &SHEETS {
                let data: Rows = snapshot.rows_for(sheet);
                if data.len() + 1 > schema::MAX_ROWS {
                    return Err(AppError::Sync(format!(
                        "{} has {} rows, more than the {} the mirror supports",
                        sheet.name,
                        data.len(),
                        schema::MAX_ROWS - 1
                    )));
                }
                api.clear_values(id, &sheet.full_range())?;
                api.update_values(id, &sheet.header_range(), vec![sheet.header_row()])?;
                if !data.is_empty() {
                    written += data.len();
                    api.append_values(id, &sheet.append_range(), data)?;
                }
            }
            Ok(written)
        })
    }

    /// Row count per sheet (header excluded), for `sync status`.
    pub fn row_counts(&mut self) -> AppResult<Vec<(&'static str, usize)>> {
        self.guarded(|api, id| {
            let titles = api.sheet_titles(id)?;
            let mut out = Vec::new();
            for sheet in &SHEETS {
                let count = if titles.iter().any(|t| t == sheet.name) {
                    api.get_values(id, sheet.name)?.len().saturating_sub(1)
                } else {
                    0
                };
                out.push((sheet.name, count));
            }
            Ok(out)
        })
    }
}

fn add_missing_sheets<A: SheetsApi>(api: &A, spreadsheet_id: &str) -> AppResult<usize> {
    let existing = api.sheet_titles(spreadsheet_id)?;
    let mut added = 0;
    for sheet in &SHEETS {
        if existing.iter().any(|t| t == sheet.name) {
            continue;
        }
        api.add_sheet(spreadsheet_id, sheet.name)?;
        api.update_values(spreadsheet_id, &sheet.header_range(), vec![sheet.header_row()])?;
        added += 1;
    }
    Ok(added)
}

/// Recreate `sheet` (with its header) when it was deleted remotely.
/// Returns true when the sheet had to be added, i.e. it is empty.
fn restore_sheet<A: SheetsApi>(api: &A, spreadsheet_id: &str, sheet: &SheetDef) -> AppResult<bool> {
    if api.sheet_titles(spreadsheet_id)?.iter().any(|t| t == sheet.name) {
        return Ok(false);
    }
    api.add_sheet(spreadsheet_id, sheet.name)?;
    api.update_values(spreadsheet_id, &sheet.header_range(), vec![sheet.header_row()])?;
    Ok(true)
}

fn lookup(name: &str) -> AppResult<&'static SheetDef> {
    schema::sheet(name).ok_or_else(|| AppError::Sync(format!("unknown sheet '{}'", name)))
}

fn find_in<A: SheetsApi>(
    api: &A,
    spreadsheet_id: &str,
    sheet: &SheetDef,
    entity_id: &str,
) -> AppResult<Option<usize>> {
    let col = sheet.id_column();
    let values = api.get_values(spreadsheet_id, sheet.name)?;
    Ok(values
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.get(col).is_some_and(|cell| cell == entity_id))
        .map(|(idx, _)| idx + 1))
}
