use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One itemised line of a workshop invoice (oil change, tyres, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub concept: String,
    pub vendor: Option<String>,
    pub workshop: Option<String>,
    pub base: f64,
    pub tax_rate: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
    pub liters: Option<f64>,
    pub tax_id: Option<String>,
    pub invoice_number: Option<String>,
    pub services: Vec<ServiceItem>, // ⇔ expenses.services (JSON)
    pub notes: String,
    pub created_at: String,
}

impl Expense {
    /// Render itemised services as a single cell: "Oil 45.00; Filter 12.50".
    pub fn services_label(&self) -> String {
        self.services
            .iter()
            .map(|s| format!("{} {:.2}", s.description, s.amount))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
