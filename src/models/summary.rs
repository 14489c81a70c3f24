use super::payment::PaymentMethod;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Serialize)]
pub struct PeriodSummary {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub shifts: usize,
    pub worked_minutes: i64,
    pub break_minutes: i64,
    pub km: i64,
    pub rides: usize,
    pub fares: f64,
    pub tips: f64,
    pub by_payment: BTreeMap<PaymentMethod, f64>,
    pub expenses: usize,
    pub expenses_total: f64,
    pub expenses_tax: f64,
}

impl PeriodSummary {
    pub fn revenue(&self) -> f64 {
        crate::utils::money::round2(self.fares + self.tips)
    }

    pub fn net(&self) -> f64 {
        crate::utils::money::round2(self.revenue() - self.expenses_total)
    }

    pub fn revenue_per_hour(&self) -> Option<f64> {
        (self.worked_minutes > 0)
            .then(|| crate::utils::money::round2(self.revenue() * 60.0 / self.worked_minutes as f64))
    }

    pub fn revenue_per_km(&self) -> Option<f64> {
        (self.km > 0).then(|| crate::utils::money::round2(self.revenue() / self.km as f64))
    }
}
