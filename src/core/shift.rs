use crate::db::log::ttlog_quiet;
use crate::db::queries::rides::rides_for_shift;
use crate::db::queries::shifts::{
    active_shift, delete_shift, get_shift, insert_shift, list_shifts, update_shift,
};
use crate::errors::{AppError, AppResult};
use crate::models::shift::{Break, Shift};
use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;

/// Fields that `shift edit` may change. `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct ShiftEdit {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub km_start: Option<i64>,
    pub km_end: Option<i64>,
    pub notes: Option<String>,
}

/// High-level business logic for the shift lifecycle.
pub struct ShiftLogic;

impl ShiftLogic {
    /// Open a new shift. Without `km_start` the odometer continues from the
    /// last closed shift.
    pub fn start(
        conn: &Connection,
        at: NaiveDateTime,
        km_start: Option<i64>,
        notes: &str,
    ) -> AppResult<Shift> {
        if let Some(active) = active_shift(conn)? {
            return Err(AppError::ShiftAlreadyActive(active.id));
        }

        let km_start = match km_start {
            Some(km) => km,
            None => last_odometer(conn)?.unwrap_or(0),
        };

        let mut shift = Shift {
            id: 0,
            start: at,
            end: None,
            km_start,
            km_end: None,
            breaks: Vec::new(),
            notes: notes.to_string(),
            created_at: Local::now().to_rfc3339(),
        };
        validate(&shift)?;

        shift.id = insert_shift(conn, &shift)?;
        ttlog_quiet(conn, "shift_start", &shift.id.to_string(), &format!("Shift started at {}", at));
        Ok(shift)
    }

    /// Close the active shift. A running break is closed at the same time;
    /// one started in the very minute the shift ends is dropped.
    pub fn end(conn: &Connection, at: NaiveDateTime, km_end: i64) -> AppResult<Shift> {
        let mut shift = active_shift(conn)?.ok_or(AppError::NoActiveShift)?;

        if let Some(pos) = shift.breaks.iter().position(|b| b.is_open()) {
            let started = shift.breaks[pos].start;
            if at < started {
                return Err(AppError::Validation(format!(
                    "Shift end {} is before the running break started ({})",
                    at, started
                )));
            }
            if at == started {
                shift.breaks.remove(pos);
            } else {
                shift.breaks[pos].end = Some(at);
            }
        }

        shift.end = Some(at);
        shift.km_end = Some(km_end);
        validate(&shift)?;

        update_shift(conn, &shift)?;
        ttlog_quiet(
            conn,
            "shift_end",
            &shift.id.to_string(),
            &format!("Shift closed at {} ({} km)", at, shift.total_km()),
        );
        Ok(shift)
    }

    pub fn break_start(conn: &Connection, at: NaiveDateTime) -> AppResult<Shift> {
        let mut shift = active_shift(conn)?.ok_or(AppError::NoActiveShift)?;

        if shift.open_break().is_some() {
            return Err(AppError::Validation("A break is already running.".into()));
        }

        shift.breaks.push(Break {
            start: at,
            end: None,
        });
        validate(&shift)?;

        update_shift(conn, &shift)?;
        Ok(shift)
    }

    pub fn break_end(conn: &Connection, at: NaiveDateTime) -> AppResult<Shift> {
        let mut shift = active_shift(conn)?.ok_or(AppError::NoActiveShift)?;

        let open = shift
            .breaks
            .iter_mut()
            .find(|b| b.is_open())
            .ok_or_else(|| AppError::Validation("No break is running.".into()))?;
        open.end = Some(at);
        validate(&shift)?;

        update_shift(conn, &shift)?;
        Ok(shift)
    }

    pub fn edit(conn: &Connection, id: i64, changes: ShiftEdit) -> AppResult<Shift> {
        let mut shift = get_shift(conn, id)?;

        if let Some(start) = changes.start {
            shift.start = start;
        }
        if let Some(end) = changes.end {
            shift.end = Some(end);
        }
        if let Some(km) = changes.km_start {
            shift.km_start = km;
        }
        if let Some(km) = changes.km_end {
            shift.km_end = Some(km);
        }
        if let Some(notes) = changes.notes {
            shift.notes = notes;
        }
        validate(&shift)?;

        // rides must stay inside the edited interval
        for ride in rides_for_shift(conn, id)? {
            let outside = ride.timestamp < shift.start
                || shift.end.is_some_and(|end| ride.timestamp > end);
            if outside {
                return Err(AppError::Validation(format!(
                    "Ride {} at {} would fall outside the shift",
                    ride.id, ride.timestamp
                )));
            }
        }

        update_shift(conn, &shift)?;
        ttlog_quiet(conn, "shift_edit", &id.to_string(), "Shift updated");
        Ok(shift)
    }

    /// Delete a shift together with its rides.
    pub fn delete(conn: &Connection, id: i64) -> AppResult<(Shift, Vec<i64>)> {
        let shift = get_shift(conn, id)?;
        let ride_ids = rides_for_shift(conn, id)?.iter().map(|r| r.id).collect();
        delete_shift(conn, id)?;
        ttlog_quiet(conn, "shift_del", &id.to_string(), "Shift deleted with its rides");
        Ok((shift, ride_ids))
    }
}

fn last_odometer(conn: &Connection) -> AppResult<Option<i64>> {
    Ok(list_shifts(conn, None)?
        .iter()
        .rev()
        .find_map(|s| s.km_end))
}

/// Structural checks shared by every shift mutation.
pub fn validate(shift: &Shift) -> AppResult<()> {
    if shift.km_start < 0 {
        return Err(AppError::Validation("Odometer readings cannot be negative.".into()));
    }

    if let Some(end) = shift.end
        && end <= shift.start
    {
        return Err(AppError::Validation(format!(
            "Shift end {} must be later than its start {}",
            end, shift.start
        )));
    }

    if let Some(km_end) = shift.km_end
        && km_end < shift.km_start
    {
        return Err(AppError::Validation(format!(
            "Final odometer {} is lower than the initial {}",
            km_end, shift.km_start
        )));
    }

    let mut open = 0;
    let mut previous_end = shift.start;
    for b in &shift.breaks {
        if b.start < previous_end {
            return Err(AppError::Validation(format!(
                "Break starting at {} overlaps the shift start or a previous break",
                b.start
            )));
        }
        match b.end {
            Some(end) => {
                if end <= b.start {
                    return Err(AppError::Validation(format!(
                        "Break ending at {} must end after it starts",
                        end
                    )));
                }
                if shift.end.is_some_and(|se| end > se) {
                    return Err(AppError::Validation(format!(
                        "Break ending at {} goes past the end of the shift",
                        end
                    )));
                }
                previous_end = end;
            }
            None => open += 1,
        }
    }

    let open_is_last = shift
        .breaks
        .iter()
        .position(Break::is_open)
        .is_none_or(|idx| idx + 1 == shift.breaks.len());

    if open > 1 || !open_is_last || (open == 1 && shift.end.is_some()) {
        return Err(AppError::Validation("Only the running break may be left open.".into()));
    }

    Ok(())
}
