pub mod expenses;
pub mod references;
pub mod rides;
pub mod settings;
pub mod shifts;

use crate::errors::AppError;
use chrono::{NaiveDate, NaiveDateTime};

/// Wrap a domain parse failure into the error rusqlite expects from a row mapper.
pub(crate) fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

pub(crate) fn parse_dt_col(col: usize, raw: &str) -> rusqlite::Result<NaiveDateTime> {
    crate::utils::date::parse_datetime(raw)
        .ok_or_else(|| conversion_error(col, AppError::InvalidTime(raw.to_string())))
}

pub(crate) fn parse_date_col(col: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    crate::utils::date::parse_date(raw)
        .ok_or_else(|| conversion_error(col, AppError::InvalidDate(raw.to_string())))
}

pub(crate) fn fmt_dt(dt: &NaiveDateTime) -> String {
    crate::utils::date::format_datetime(dt)
}

pub(crate) fn fmt_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Inclusive `[from, to]` bounds turned into text comparable with stored values.
pub(crate) fn bounds_to_text(bounds: Option<(NaiveDate, NaiveDate)>) -> (String, String) {
    match bounds {
        Some((from, to)) => (fmt_date(&from), format!("{} 99:99", fmt_date(&to))),
        None => ("0000-00-00".to_string(), "9999-99-99".to_string()),
    }
}
