use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,    // C
    Card,    // T (tarjeta)
    App,     // A
    Account, // F (facturado a cuenta)
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::App,
        PaymentMethod::Account,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "C",
            PaymentMethod::Card => "T",
            PaymentMethod::App => "A",
            PaymentMethod::Account => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::App => "app",
            PaymentMethod::Account => "account",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "C" => Some(PaymentMethod::Cash),
            "T" => Some(PaymentMethod::Card),
            "A" => Some(PaymentMethod::App),
            "F" => Some(PaymentMethod::Account),
            _ => None,
        }
    }

    /// Helper: accept either the one-letter code or the label, any case.
    pub fn parse(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        Self::from_db_str(&trimmed.to_uppercase())
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|p| p.label().eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| {
                AppError::InvalidPayment(format!(
                    "'{}'. Use cash (C), card (T), app (A) or account (F)",
                    input
                ))
            })
    }
}
