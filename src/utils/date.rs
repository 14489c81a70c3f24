use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    // minute precision, like everything stored in the database
    let n = Local::now().naive_local();
    n.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(n)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Resolve a user supplied moment: full "YYYY-MM-DD HH:MM", a bare "HH:MM"
/// (today), or nothing (now).
pub fn resolve_moment(input: Option<&String>) -> AppResult<NaiveDateTime> {
    match input {
        None => Ok(now()),
        Some(s) => {
            if let Some(dt) = parse_datetime(s) {
                return Ok(dt);
            }
            if let Some(t) = crate::utils::time::parse_time(s) {
                return Ok(today().and_time(t));
            }
            Err(AppError::InvalidTime(s.to_string()))
        }
    }
}

fn month_last_day(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

fn bounds_of(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidDate(format!("Invalid period: {}", p));

    match p.len() {
        // YYYY-MM-DD
        10 => {
            let d = parse_date(p).ok_or_else(invalid)?;
            Ok((d, d))
        }
        // YYYY-MM
        7 => {
            let first = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
            let last = month_last_day(first.year(), first.month()).ok_or_else(invalid)?;
            Ok((first, last))
        }
        // YYYY
        4 => {
            let year: i32 = p.parse().map_err(|_| invalid())?;
            let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
            let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
            Ok((first, last))
        }
        _ => Err(invalid()),
    }
}

/// Parse --period / --range (year / month / day / interval).
///
/// Supports:
/// - `all` → None (no bounds)
/// - YYYY, YYYY-MM, YYYY-MM-DD
/// - any two of the above joined by ':' (e.g. `2025-01:2025-03-15`)
pub fn parse_period(p: &str) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    let p = p.trim();
    if p.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let (from, to) = match p.split_once(':') {
        Some((start, end)) => (bounds_of(start.trim())?.0, bounds_of(end.trim())?.1),
        None => bounds_of(p)?,
    };

    if from > to {
        return Err(AppError::InvalidDate(format!(
            "Period start {} is after end {}",
            from, to
        )));
    }
    Ok(Some((from, to)))
}

/// Period defaulting to the current month when not provided.
pub fn period_or_current_month(p: Option<&String>) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    match p {
        Some(p) => parse_period(p),
        None => {
            let t = today();
            parse_period(&format!("{:04}-{:02}", t.year(), t.month()))
        }
    }
}

