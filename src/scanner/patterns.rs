//! Regular expressions for the fields printed on Spanish fuel and workshop receipts.

use crate::utils::money::parse_amount;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3}(?:[.,]\d{3})+[.,]\d{2}|\d+[.,]\d{2})\b")
        .expect("valid amount regex")
});

// a bare "L" unit only counts after a decimal quantity, so postcodes are skipped
static LITERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(\d+[.,]\d{1,3})\s*(?:l|lt|lts|ltr)|(\d+(?:[.,]\d{1,3})?)\s*(?:litros|liters|litres))\b",
    )
    .expect("valid liters regex")
});

static LITERS_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:litros|liters|litres|volumen)\s*[:=]?\s*(\d+(?:[.,]\d{1,3})?)")
        .expect("valid liters label regex")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{4}|\d{2})\b").expect("valid date regex")
});

static TAX_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([ABCDEFGHJNPQRSUVW]-?\d{7}[0-9A-J]|\d{8}-?[A-Z]|[XYZ]\d{7}[A-Z])\b")
        .expect("valid tax id regex")
});

static INVOICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:factura|fra\.?|invoice|ticket|n[º°o]\.?)\s*(?:simplificada\s*)?(?:n[º°o]\.?|num\.?|n[uú]mero|#)?\s*[:.]?\s*([A-Z0-9][A-Z0-9/-]{2,})",
    )
    .expect("valid invoice regex")
});

/// The largest money-looking token: on a receipt that is the total.
/// Dates are blanked first so `12.05.2025` is not read as 12.05.
pub fn extract_amount(text: &str) -> Option<f64> {
    let without_dates = DATE_RE.replace_all(text, " ");
    AMOUNT_RE
        .captures_iter(&without_dates)
        .filter_map(|c| c.get(1))
        .filter_map(|m| parse_amount(m.as_str()))
        .fold(None, |best: Option<f64>, v| match best {
            Some(b) if b >= v => Some(b),
            _ => Some(v),
        })
}

/// Volume dispensed, written either "45,32 L" or "Litros: 45,32".
pub fn extract_liters(text: &str) -> Option<f64> {
    LITERS_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .chain(LITERS_LABEL_RE.captures_iter(text).filter_map(|c| c.get(1)))
        .filter_map(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .find(|v| *v > 0.0)
}

/// First plausible `dd/mm/yyyy` (or `dd-mm-yy`, `dd.mm.yyyy`) date.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    DATE_RE.captures_iter(text).find_map(|c| {
        let day: u32 = c[1].parse().ok()?;
        let month: u32 = c[2].parse().ok()?;
        let mut year: i32 = c[3].parse().ok()?;
        if c[3].len() == 2 {
            year += 2000;
        }
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Spanish NIF / CIF / NIE, normalised without separators.
pub fn extract_tax_id(text: &str) -> Option<String> {
    TAX_ID_RE.captures(text).map(|c| {
        c[1].chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase()
    })
}

pub fn extract_invoice_number(text: &str) -> Option<String> {
    INVOICE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase())
        // a bare word such as "SIMPLIFICADA" or "TOTAL" is not a number
        .find(|s| s.chars().any(|ch| ch.is_ascii_digit()))
}
