use super::payment::PaymentMethod;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: i64,
    pub shift_id: i64,
    pub timestamp: NaiveDateTime,
    pub fare: f64,
    pub tip: f64,
    pub payment: PaymentMethod,
    pub origin: String,
    pub destination: String,
    pub notes: String,
    pub created_at: String,
}

impl Ride {
    pub fn total(&self) -> f64 {
        crate::utils::money::round2(self.fare + self.tip)
    }
}
