// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::{ExportTable, notify_export_success};
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export JSON pretty-printed.
pub(crate) fn export_json(table: &ExportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting {} to JSON: {}", table.title, path.display()));

    let json_data = serde_json::to_string_pretty(&table.to_json_records())?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", table.rows.len(), path);
    Ok(())
}

/// Export CSV with the header row first.
pub(crate) fn export_csv(table: &ExportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting {} to CSV: {}", table.title, path.display()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    wtr.write_record(&table.headers)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    for row in &table.rows {
        wtr.write_record(row)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    notify_export_success("CSV", table.rows.len(), path);
    Ok(())
}
