//! Receipt scanning: OCR text in, structured expense fields out.

pub mod ocr;
pub mod patterns;
pub mod vendors;

use crate::core::expense::ExpenseDraft;
use crate::models::reference::Reference;
use chrono::NaiveDate;
use serde::Serialize;

/// Fields recognised on a receipt. Every field is best effort.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ScannedReceipt {
    pub amount: Option<f64>,
    pub liters: Option<f64>,
    pub date: Option<NaiveDate>,
    pub tax_id: Option<String>,
    pub invoice_number: Option<String>,
    pub vendor: Option<String>,
}

impl ScannedReceipt {
    pub fn is_empty(&self) -> bool {
        *self == ScannedReceipt::default()
    }

    /// Turn the scan into an expense draft. Fuel receipts are recognised by
    /// the presence of a liters figure.
    pub fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            date: self.date,
            concept: if self.liters.is_some() { "Fuel" } else { "Other" }.to_string(),
            vendor: self.vendor.clone(),
            total: self.amount,
            liters: self.liters,
            tax_id: self.tax_id.clone(),
            invoice_number: self.invoice_number.clone(),
            notes: "scanned".to_string(),
            ..ExpenseDraft::default()
        }
    }
}

/// Extract every field from OCR text. `known_vendors` (the local vendor
/// list) wins over the built-in lookup table.
pub fn scan_text(text: &str, known_vendors: &[Reference]) -> ScannedReceipt {
    let tax_id = patterns::extract_tax_id(text);

    ScannedReceipt {
        amount: patterns::extract_amount(text),
        liters: patterns::extract_liters(text),
        date: patterns::extract_date(text),
        invoice_number: patterns::extract_invoice_number(text),
        vendor: vendors::identify(text, tax_id.as_deref(), known_vendors),
        tax_id,
    }
}
