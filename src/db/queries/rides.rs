use super::{bounds_to_text, conversion_error, fmt_dt, parse_dt_col};
use crate::errors::{AppError, AppResult};
use crate::models::payment::PaymentMethod;
use crate::models::ride::Ride;
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str =
    "id, shift_id, timestamp, fare, tip, payment, origin, destination, notes, created_at";

pub fn map_row(row: &Row) -> rusqlite::Result<Ride> {
    let ts_raw: String = row.get("timestamp")?;
    let pay_raw: String = row.get("payment")?;
    let payment = PaymentMethod::from_db_str(&pay_raw)
        .ok_or_else(|| conversion_error(5, AppError::InvalidPayment(pay_raw.clone())))?;

    Ok(Ride {
        id: row.get("id")?,
        shift_id: row.get("shift_id")?,
        timestamp: parse_dt_col(2, &ts_raw)?,
        fare: row.get("fare")?,
        tip: row.get("tip")?,
        payment,
        origin: row.get("origin")?,
        destination: row.get("destination")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_ride(conn: &Connection, ride: &Ride) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO rides (shift_id, timestamp, fare, tip, payment, origin, destination, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            ride.shift_id,
            fmt_dt(&ride.timestamp),
            ride.fare,
            ride.tip,
            ride.payment.to_db_str(),
            ride.origin,
            ride.destination,
            ride.notes,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_ride(conn: &Connection, ride: &Ride) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE rides
         SET shift_id = ?1, timestamp = ?2, fare = ?3, tip = ?4, payment = ?5,
             origin = ?6, destination = ?7, notes = ?8
         WHERE id = ?9",
        params![
            ride.shift_id,
            fmt_dt(&ride.timestamp),
            ride.fare,
            ride.tip,
            ride.payment.to_db_str(),
            ride.origin,
            ride.destination,
            ride.notes,
            ride.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound("Ride", ride.id.to_string()));
    }
    Ok(())
}

pub fn get_ride(conn: &Connection, id: i64) -> AppResult<Ride> {
    let sql = format!("SELECT {COLUMNS} FROM rides WHERE id = ?1");
    conn.query_row(&sql, [id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound("Ride", id.to_string()))
}

pub fn list_rides(conn: &Connection, bounds: Option<(NaiveDate, NaiveDate)>) -> AppResult<Vec<Ride>> {
    let (from, to) = bounds_to_text(bounds);
    let sql = format!(
        "SELECT {COLUMNS} FROM rides
         WHERE timestamp >= ?1 AND timestamp <= ?2
         ORDER BY timestamp ASC, id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![from, to], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn rides_for_shift(conn: &Connection, shift_id: i64) -> AppResult<Vec<Ride>> {
    let sql = format!("SELECT {COLUMNS} FROM rides WHERE shift_id = ?1 ORDER BY timestamp ASC, id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([shift_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_ride(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute("DELETE FROM rides WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::NotFound("Ride", id.to_string()));
    }
    Ok(())
}
