//! Built-in keyword → vendor table for the usual fuel stations and suppliers.

use crate::models::reference::Reference;

const KNOWN_VENDORS: &[(&str, &str)] = &[
    ("repsol", "Repsol"),
    ("campsa", "Repsol"),
    ("cepsa", "Cepsa"),
    ("moeve", "Cepsa"),
    ("galp", "Galp"),
    ("shell", "Shell"),
    ("bp ", "BP"),
    ("petronor", "Petronor"),
    ("plenoil", "Plenoil"),
    ("ballenoil", "Ballenoil"),
    ("petroprix", "Petroprix"),
    ("avia", "Avia"),
    ("disa", "Disa"),
    ("carrefour", "Carrefour"),
    ("alcampo", "Alcampo"),
    ("costco", "Costco"),
    ("norauto", "Norauto"),
    ("midas", "Midas"),
    ("feu vert", "Feu Vert"),
    ("euromaster", "Euromaster"),
    ("confortauto", "Confortauto"),
    ("iberdrola", "Iberdrola"),
    ("endesa", "Endesa"),
    ("mapfre", "Mapfre"),
];

/// Identify the vendor: first by tax ID in the local list, then by a local
/// vendor name printed on the receipt, then by the built-in table.
pub fn identify(text: &str, tax_id: Option<&str>, known: &[Reference]) -> Option<String> {
    if let Some(tax_id) = tax_id
        && let Some(r) = known.iter().find(|r| {
            r.tax_id
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(tax_id))
        })
    {
        return Some(r.name.clone());
    }

    let lower = format!("{} ", text.to_lowercase());

    if let Some(r) = known
        .iter()
        .filter(|r| r.name.len() >= 3)
        .find(|r| lower.contains(&r.name.to_lowercase()))
    {
        return Some(r.name.clone());
    }

    KNOWN_VENDORS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, name)| name.to_string())
}
