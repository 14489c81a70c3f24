//! Money helpers: rounding to cents and lenient parsing of user/OCR input.

use crate::errors::{AppError, AppResult};

pub const TOLERANCE: f64 = 0.01;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `true` when two amounts differ by at most one cent.
pub fn same_amount(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE + 1e-9
}

/// Parse an amount written either as `1.234,56` (European) or `1,234.56`.
/// The right-most separator is taken as the decimal mark when it is
/// followed by one or two digits.
pub fn parse_amount(input: &str) -> Option<f64> {
    let s: String = input
        .trim()
        .trim_start_matches(['€', '$'])
        .trim_end_matches(['€', '$'])
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if s.is_empty() {
        return None;
    }

    let last_sep = s.rfind([',', '.']);
    let normalized = match last_sep {
        Some(idx) if s.len() - idx - 1 <= 2 => {
            let (int_part, dec_part) = s.split_at(idx);
            let int_clean: String = int_part.chars().filter(|c| c.is_ascii_digit() || *c == '-').collect();
            format!("{}.{}", int_clean, &dec_part[1..])
        }
        Some(_) => s.chars().filter(|c| c.is_ascii_digit() || *c == '-').collect(),
        None => s,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_amount_arg(input: &str) -> AppResult<f64> {
    let value = parse_amount(input).ok_or_else(|| AppError::InvalidAmount(input.to_string()))?;
    if value < 0.0 {
        return Err(AppError::InvalidAmount(format!("{} (must be positive)", input)));
    }
    Ok(round2(value))
}

pub fn format_amount(value: f64, currency: &str) -> String {
    format!("{:.2} {}", value, currency)
}
