use crate::errors::{AppError, AppResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The three autocomplete lists maintained on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum RefKind {
    Vendor,
    Concept,
    Workshop,
}

impl RefKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RefKind::Vendor => "vendor",
            RefKind::Concept => "concept",
            RefKind::Workshop => "workshop",
        }
    }

    pub fn from_db_str(s: &str) -> AppResult<Self> {
        match s {
            "vendor" => Ok(RefKind::Vendor),
            "concept" => Ok(RefKind::Concept),
            "workshop" => Ok(RefKind::Workshop),
            other => Err(AppError::InvalidReferenceKind(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RefKind::Vendor => "Vendor",
            RefKind::Concept => "Concept",
            RefKind::Workshop => "Workshop",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub id: i64,
    pub kind: RefKind,
    pub name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
}
