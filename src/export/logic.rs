// src/export/logic.rs

use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::xlsx::export_xlsx;
use crate::export::{ExportEntity, ExportFormat, ExportTable};
use crate::sync::Snapshot;
use crate::ui::messages::warning;
use crate::utils::date::parse_period;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Export one collection to `file`.
    ///
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or a period such as:
    ///   - `YYYY`
    ///   - `YYYY-MM`
    ///   - `YYYY-MM-DD`
    ///   - `YYYY-MM:YYYY-MM` (and the other range forms)
    ///
    /// Returns the number of exported rows; nothing is written when the
    /// selection is empty.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        entity: ExportEntity,
        file: &str,
        range: Option<&String>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let bounds = match range {
            None => None,
            Some(r) => parse_period(r)?,
        };

        let snapshot = Snapshot::load(&pool.conn, bounds)?;
        let table = ExportTable::from_snapshot(entity.sheet(), &snapshot);

        if table.is_empty() {
            warning(format!("No {} found for the selected range.", entity.as_str()));
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&table, path)?,
            ExportFormat::Json => export_json(&table, path)?,
            ExportFormat::Xlsx => export_xlsx(&table, path)?,
        }

        ttlog_quiet(
            &pool.conn,
            "export",
            file,
            &format!("{} {} rows as {}", table.rows.len(), entity.as_str(), format.as_str()),
        );

        Ok(table.rows.len())
    }
}
