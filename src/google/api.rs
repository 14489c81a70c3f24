use crate::errors::AppResult;

/// Cell values as read from / written to a sheet, row-major.
pub type Rows = Vec<Vec<String>>;

/// The subset of Drive + Sheets the sync service relies on. `GoogleClient`
/// talks to the real API; tests plug in an in-memory implementation.
pub trait SheetsApi {
    /// `false` when the spreadsheet was deleted or is not visible to us.
    fn spreadsheet_exists(&self, spreadsheet_id: &str) -> AppResult<bool>;

    /// Drive search by exact title; first match wins.
    fn find_spreadsheet(&self, name: &str) -> AppResult<Option<String>>;

    /// Create a spreadsheet holding one sheet per title. Returns its id.
    fn create_spreadsheet(&self, name: &str, sheets: &[&str]) -> AppResult<String>;

    fn sheet_titles(&self, spreadsheet_id: &str) -> AppResult<Vec<String>>;

    fn add_sheet(&self, spreadsheet_id: &str, title: &str) -> AppResult<()>;

    /// Every non-empty row in `range` (trailing empty cells omitted).
    fn get_values(&self, spreadsheet_id: &str, range: &str) -> AppResult<Rows>;

    fn update_values(&self, spreadsheet_id: &str, range: &str, values: Rows) -> AppResult<()>;

    fn append_values(&self, spreadsheet_id: &str, range: &str, values: Rows) -> AppResult<()>;

    fn clear_values(&self, spreadsheet_id: &str, range: &str) -> AppResult<()>;

    /// Remove the 1-based `row` of `sheet`, shifting the rows below up.
    fn delete_row(&self, spreadsheet_id: &str, sheet: &str, row: usize) -> AppResult<()>;
}
