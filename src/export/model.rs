// src/export/model.rs

use crate::sync::Snapshot;
use crate::sync::schema::SheetDef;
use serde_json::{Map, Value};

/// Flat header + rows view of one collection, fed by the mirror row mapping.
#[derive(Debug, Clone)]
pub struct ExportTable {
    pub title: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn from_snapshot(sheet: &SheetDef, snapshot: &Snapshot) -> Self {
        Self {
            title: sheet.name,
            headers: sheet.headers.to_vec(),
            rows: snapshot.rows_for(sheet),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One JSON object per row, keyed by header.
    pub(crate) fn to_json_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (header, cell) in self.headers.iter().zip(row) {
                    obj.insert(header.to_string(), Value::String(cell.clone()));
                }
                Value::Object(obj)
            })
            .collect()
    }
}
