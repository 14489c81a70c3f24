use super::{bounds_to_text, conversion_error, fmt_dt, parse_dt_col};
use crate::errors::{AppError, AppResult};
use crate::models::shift::{Break, Shift};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, started_at, ended_at, km_start, km_end, breaks, notes, created_at";

pub fn map_row(row: &Row) -> rusqlite::Result<Shift> {
    let start_raw: String = row.get("started_at")?;
    let end_raw: Option<String> = row.get("ended_at")?;
    let breaks_raw: String = row.get("breaks")?;

    let breaks: Vec<Break> = serde_json::from_str(&breaks_raw)
        .map_err(|e| conversion_error(5, AppError::Json(e)))?;

    Ok(Shift {
        id: row.get("id")?,
        start: parse_dt_col(1, &start_raw)?,
        end: end_raw.as_deref().map(|s| parse_dt_col(2, s)).transpose()?,
        km_start: row.get("km_start")?,
        km_end: row.get("km_end")?,
        breaks,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_shift(conn: &Connection, shift: &Shift) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO shifts (started_at, ended_at, km_start, km_end, breaks, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            fmt_dt(&shift.start),
            shift.end.as_ref().map(fmt_dt),
            shift.km_start,
            shift.km_end,
            serde_json::to_string(&shift.breaks)?,
            shift.notes,
            if shift.created_at.is_empty() {
                Local::now().to_rfc3339()
            } else {
                shift.created_at.clone()
            },
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_shift(conn: &Connection, shift: &Shift) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE shifts
         SET started_at = ?1, ended_at = ?2, km_start = ?3, km_end = ?4, breaks = ?5, notes = ?6
         WHERE id = ?7",
        params![
            fmt_dt(&shift.start),
            shift.end.as_ref().map(fmt_dt),
            shift.km_start,
            shift.km_end,
            serde_json::to_string(&shift.breaks)?,
            shift.notes,
            shift.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound("Shift", shift.id.to_string()));
    }
    Ok(())
}

pub fn get_shift(conn: &Connection, id: i64) -> AppResult<Shift> {
    let sql = format!("SELECT {COLUMNS} FROM shifts WHERE id = ?1");
    conn.query_row(&sql, [id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Shift", id.to_string()))
}

pub fn active_shift(conn: &Connection) -> AppResult<Option<Shift>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM shifts WHERE ended_at IS NULL ORDER BY started_at DESC LIMIT 1"
    );
    Ok(conn.query_row(&sql, [], map_row).optional()?)
}

/// Shifts whose start falls inside the bounds (all when `None`), oldest first.
pub fn list_shifts(conn: &Connection, bounds: Option<(NaiveDate, NaiveDate)>) -> AppResult<Vec<Shift>> {
    let (from, to) = bounds_to_text(bounds);
    let sql = format!(
        "SELECT {COLUMNS} FROM shifts
         WHERE started_at >= ?1 AND started_at <= ?2
         ORDER BY started_at ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![from, to], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete a shift; its rides go with it (ON DELETE CASCADE).
pub fn delete_shift(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute("DELETE FROM shifts WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::NotFound("Shift", id.to_string()));
    }
    Ok(())
}
