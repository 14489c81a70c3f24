//! Suggestions for the vendor / concept / workshop inputs.

use crate::errors::{AppError, AppResult};

/// Rank `items` against `query`: prefix matches first, then substring
/// matches, alphabetical inside each group. An empty query lists everything.
pub fn suggest<'a>(items: &'a [String], query: &str, limit: usize) -> Vec<&'a str> {
    let q = query.trim().to_lowercase();

    let mut prefix: Vec<&str> = Vec::new();
    let mut contains: Vec<&str> = Vec::new();

    for item in items {
        let lower = item.to_lowercase();
        if lower.starts_with(&q) {
            prefix.push(item);
        } else if lower.contains(&q) {
            contains.push(item);
        }
    }

    prefix.sort_by_key(|s| s.to_lowercase());
    contains.sort_by_key(|s| s.to_lowercase());

    prefix.into_iter().chain(contains).take(limit).collect()
}

/// Turn free text into a list entry: the exact (case-insensitive) match, or
/// the single suggestion. Text matching nothing is kept as typed; text
/// matching several entries is rejected.
pub fn resolve(label: &'static str, items: &[String], query: &str) -> AppResult<String> {
    let q = query.trim();
    if q.is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", label)));
    }

    let folded = q.to_lowercase();
    if let Some(exact) = items.iter().find(|i| i.to_lowercase() == folded) {
        return Ok(exact.clone());
    }

    let candidates = suggest(items, q, 5);
    match candidates.as_slice() {
        [] => Ok(q.to_string()),
        [only] => Ok(only.to_string()),
        many => Err(AppError::Ambiguous(label, q.to_string(), many.join(", "))),
    }
}
