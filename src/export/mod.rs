// src/export/mod.rs

mod excel_date;
mod fs_utils;
mod json_csv;
pub mod logic;
mod model;
mod xlsx;

pub use logic::ExportLogic;
pub use model::ExportTable;

use crate::sync::schema::{self, SheetDef};
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for every exporter.
pub(crate) fn notify_export_success(label: &str, rows: usize, path: &Path) {
    success(format!("{label} export completed ({rows} rows): {}", path.display()));
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Which collection to export. Columns match the mirror spreadsheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportEntity {
    Shifts,
    Rides,
    Expenses,
}

impl ExportEntity {
    pub fn sheet(&self) -> &'static SheetDef {
        // order of the fixed schema: Shifts, Rides, Expenses, ...
        match self {
            ExportEntity::Shifts => &schema::SHEETS[0],
            ExportEntity::Rides => &schema::SHEETS[1],
            ExportEntity::Expenses => &schema::SHEETS[2],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportEntity::Shifts => "shifts",
            ExportEntity::Rides => "rides",
            ExportEntity::Expenses => "expenses",
        }
    }
}
