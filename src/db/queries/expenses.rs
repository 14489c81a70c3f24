use super::{bounds_to_text, conversion_error, fmt_date, parse_date_col};
use crate::errors::{AppError, AppResult};
use crate::models::expense::{Expense, ServiceItem};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, date, concept, vendor, workshop, base, tax_rate, tax, discount, total, \
                       liters, tax_id, invoice_number, services, notes, created_at";

pub fn map_row(row: &Row) -> rusqlite::Result<Expense> {
    let date_raw: String = row.get("date")?;
    let services_raw: String = row.get("services")?;
    let services: Vec<ServiceItem> = serde_json::from_str(&services_raw)
        .map_err(|e| conversion_error(13, AppError::Json(e)))?;

    Ok(Expense {
        id: row.get("id")?,
        date: parse_date_col(1, &date_raw)?,
        concept: row.get("concept")?,
        vendor: row.get("vendor")?,
        workshop: row.get("workshop")?,
        base: row.get("base")?,
        tax_rate: row.get("tax_rate")?,
        tax: row.get("tax")?,
        discount: row.get("discount")?,
        total: row.get("total")?,
        liters: row.get("liters")?,
        tax_id: row.get("tax_id")?,
        invoice_number: row.get("invoice_number")?,
        services,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_expense(conn: &Connection, e: &Expense) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO expenses (date, concept, vendor, workshop, base, tax_rate, tax, discount, total,
                               liters, tax_id, invoice_number, services, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            fmt_date(&e.date),
            e.concept,
            e.vendor,
            e.workshop,
            e.base,
            e.tax_rate,
            e.tax,
            e.discount,
            e.total,
            e.liters,
            e.tax_id,
            e.invoice_number,
            serde_json::to_string(&e.services)?,
            e.notes,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_expense(conn: &Connection, id: i64) -> AppResult<Expense> {
    let sql = format!("SELECT {COLUMNS} FROM expenses WHERE id = ?1");
    conn.query_row(&sql, [id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Expense", id.to_string()))
}

pub fn list_expenses(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<Expense>> {
    let (from, to) = bounds_to_text(bounds);
    let sql = format!(
        "SELECT {COLUMNS} FROM expenses
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![from, to], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// An invoice already recorded for the same vendor tax ID (duplicate scan guard).
pub fn find_by_invoice(conn: &Connection, tax_id: &str, invoice: &str) -> AppResult<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM expenses WHERE tax_id = ?1 AND invoice_number = ?2 LIMIT 1",
            params![tax_id, invoice],
            |row| row.get(0),
        )
        .optional()?)
}

pub fn delete_expense(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::NotFound("Expense", id.to_string()));
    }
    Ok(())
}
