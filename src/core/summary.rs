use crate::db::queries::expenses::list_expenses;
use crate::db::queries::rides::{list_rides, rides_for_shift};
use crate::db::queries::shifts::list_shifts;
use crate::errors::AppResult;
use crate::models::ride::Ride;
use crate::models::shift::Shift;
use crate::models::summary::PeriodSummary;
use crate::utils::money::round2;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

/// Running totals for the active shift (the "home" card).
#[derive(Debug, Clone)]
pub struct ShiftStatus {
    pub shift: Shift,
    pub rides: Vec<Ride>,
    pub worked_minutes: i64,
    pub revenue: f64,
    pub on_break: bool,
}

pub struct SummaryLogic;

impl SummaryLogic {
    pub fn build(conn: &Connection, bounds: Option<(NaiveDate, NaiveDate)>) -> AppResult<PeriodSummary> {
        let mut summary = PeriodSummary {
            from: bounds.map(|b| b.0),
            to: bounds.map(|b| b.1),
            ..PeriodSummary::default()
        };

        // closed shifts only: an active one has no final odometer yet
        for shift in list_shifts(conn, bounds)?.iter().filter(|s| !s.is_active()) {
            summary.shifts += 1;
            summary.worked_minutes += shift.worked_minutes();
            summary.break_minutes += shift.break_minutes();
            summary.km += shift.total_km();
        }

        for ride in list_rides(conn, bounds)? {
            summary.rides += 1;
            summary.fares += ride.fare;
            summary.tips += ride.tip;
            *summary.by_payment.entry(ride.payment).or_insert(0.0) += ride.total();
        }
        summary.fares = round2(summary.fares);
        summary.tips = round2(summary.tips);
        for v in summary.by_payment.values_mut() {
            *v = round2(*v);
        }

        for expense in list_expenses(conn, bounds)? {
            summary.expenses += 1;
            summary.expenses_total += expense.total;
            summary.expenses_tax += expense.tax;
        }
        summary.expenses_total = round2(summary.expenses_total);
        summary.expenses_tax = round2(summary.expenses_tax);

        Ok(summary)
    }

    pub fn shift_status(conn: &Connection, shift: Shift, now: NaiveDateTime) -> AppResult<ShiftStatus> {
        let rides = rides_for_shift(conn, shift.id)?;
        let revenue = round2(rides.iter().map(Ride::total).sum());
        Ok(ShiftStatus {
            worked_minutes: shift.worked_minutes_at(now),
            on_break: shift.open_break().is_some(),
            shift,
            rides,
            revenue,
        })
    }
}
