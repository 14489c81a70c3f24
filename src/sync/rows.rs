//! Entity → sheet row projection. Shared by the Google mirror and the local
//! CSV/JSON/XLSX exporters so both always agree on the column layout.

use super::schema::{self, SheetDef};
use crate::db::queries::expenses::list_expenses;
use crate::db::queries::references::list_references;
use crate::db::queries::rides::list_rides;
use crate::db::queries::settings::list_settings;
use crate::db::queries::shifts::list_shifts;
use crate::errors::AppResult;
use crate::google::Rows;
use crate::models::expense::Expense;
use crate::models::reference::{RefKind, Reference};
use crate::models::ride::Ride;
use crate::models::shift::Shift;
use crate::utils::date::format_datetime;
use chrono::NaiveDate;
use rusqlite::Connection;

fn money(v: f64) -> String {
    format!("{:.2}", v)
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

pub fn shift_row(s: &Shift) -> Vec<String> {
    vec![
        format_datetime(&s.start),
        s.end.as_ref().map(format_datetime).unwrap_or_default(),
        s.km_start.to_string(),
        opt(s.km_end),
        if s.km_end.is_some() {
            s.total_km().to_string()
        } else {
            String::new()
        },
        s.break_minutes().to_string(),
        s.worked_minutes().to_string(),
        s.notes.clone(),
        s.id.to_string(),
    ]
}

pub fn ride_row(r: &Ride) -> Vec<String> {
    vec![
        r.timestamp.format("%Y-%m-%d").to_string(),
        r.timestamp.format("%H:%M").to_string(),
        money(r.fare),
        money(r.tip),
        money(r.total()),
        r.payment.label().to_string(),
        r.origin.clone(),
        r.destination.clone(),
        r.shift_id.to_string(),
        r.notes.clone(),
        r.id.to_string(),
    ]
}

pub fn expense_row(e: &Expense) -> Vec<String> {
    vec![
        e.date.format("%Y-%m-%d").to_string(),
        e.concept.clone(),
        e.vendor.clone().unwrap_or_default(),
        e.workshop.clone().unwrap_or_default(),
        money(e.base),
        money(e.tax_rate),
        money(e.tax),
        money(e.discount),
        money(e.total),
        e.liters.map(|l| format!("{:.2}", l)).unwrap_or_default(),
        e.tax_id.clone().unwrap_or_default(),
        e.invoice_number.clone().unwrap_or_default(),
        e.services_label(),
        e.notes.clone(),
        e.id.to_string(),
    ]
}

pub fn reference_row(r: &Reference) -> Vec<String> {
    match r.kind {
        RefKind::Vendor => vec![r.name.clone(), opt(r.tax_id.as_ref()), r.id.to_string()],
        RefKind::Concept => vec![r.name.clone(), r.id.to_string()],
        RefKind::Workshop => vec![r.name.clone(), opt(r.phone.as_ref()), r.id.to_string()],
    }
}

pub fn setting_row(key: &str, value: &str) -> Vec<String> {
    vec![key.to_string(), value.to_string()]
}

pub fn reference_sheet(kind: RefKind) -> &'static str {
    match kind {
        RefKind::Vendor => schema::VENDORS,
        RefKind::Concept => schema::CONCEPTS,
        RefKind::Workshop => schema::WORKSHOPS,
    }
}

/// Every local collection, loaded once for a full upload or an export.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub shifts: Vec<Shift>,
    pub rides: Vec<Ride>,
    pub expenses: Vec<Expense>,
    pub references: Vec<Reference>,
    pub settings: Vec<(String, String)>,
}

impl Snapshot {
    pub fn load(conn: &Connection, bounds: Option<(NaiveDate, NaiveDate)>) -> AppResult<Self> {
        let mut references = Vec::new();
        for kind in [RefKind::Vendor, RefKind::Concept, RefKind::Workshop] {
            references.extend(list_references(conn, kind)?);
        }

        Ok(Self {
            shifts: list_shifts(conn, bounds)?,
            rides: list_rides(conn, bounds)?,
            expenses: list_expenses(conn, bounds)?,
            references,
            settings: list_settings(conn)?,
        })
    }

    /// Data rows (no header) for one sheet of the schema.
    pub fn rows_for(&self, sheet: &SheetDef) -> Rows {
        let refs_of = |kind: RefKind| -> Rows {
            self.references
                .iter()
                .filter(|r| r.kind == kind)
                .map(reference_row)
                .collect()
        };

        match sheet.name {
            schema::SHIFTS => self.shifts.iter().map(shift_row).collect(),
            schema::RIDES => self.rides.iter().map(ride_row).collect(),
            schema::EXPENSES => self.expenses.iter().map(expense_row).collect(),
            schema::VENDORS => refs_of(RefKind::Vendor),
            schema::CONCEPTS => refs_of(RefKind::Concept),
            schema::WORKSHOPS => refs_of(RefKind::Workshop),
            schema::SETTINGS => self
                .settings
                .iter()
                .map(|(k, v)| setting_row(k, v))
                .collect(),
            _ => Vec::new(),
        }
    }
}
