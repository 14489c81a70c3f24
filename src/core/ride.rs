use crate::db::log::ttlog_quiet;
use crate::db::queries::rides::{delete_ride, get_ride, insert_ride, update_ride};
use crate::db::queries::shifts::{active_shift, get_shift};
use crate::errors::{AppError, AppResult};
use crate::models::payment::PaymentMethod;
use crate::models::ride::Ride;
use crate::models::shift::Shift;
use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct RideInput {
    pub shift_id: Option<i64>,
    pub at: NaiveDateTime,
    pub fare: f64,
    pub tip: f64,
    pub payment: PaymentMethod,
    pub origin: String,
    pub destination: String,
    pub notes: String,
}

#[derive(Debug, Default, Clone)]
pub struct RideEdit {
    pub at: Option<NaiveDateTime>,
    pub fare: Option<f64>,
    pub tip: Option<f64>,
    pub payment: Option<PaymentMethod>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub notes: Option<String>,
}

pub struct RideLogic;

impl RideLogic {
    /// Record a ride on the given shift, or on the active one.
    pub fn add(conn: &Connection, input: RideInput) -> AppResult<Ride> {
        let shift = match input.shift_id {
            Some(id) => get_shift(conn, id)?,
            None => active_shift(conn)?.ok_or(AppError::NoActiveShift)?,
        };

        let mut ride = Ride {
            id: 0,
            shift_id: shift.id,
            timestamp: input.at,
            fare: input.fare,
            tip: input.tip,
            payment: input.payment,
            origin: input.origin,
            destination: input.destination,
            notes: input.notes,
            created_at: Local::now().to_rfc3339(),
        };
        validate(&ride, &shift)?;

        ride.id = insert_ride(conn, &ride)?;
        ttlog_quiet(
            conn,
            "ride_add",
            &ride.id.to_string(),
            &format!("Ride {:.2} ({}) on shift {}", ride.total(), ride.payment.label(), shift.id),
        );
        Ok(ride)
    }

    pub fn edit(conn: &Connection, id: i64, changes: RideEdit) -> AppResult<Ride> {
        let mut ride = get_ride(conn, id)?;
        let shift = get_shift(conn, ride.shift_id)?;

        if let Some(at) = changes.at {
            ride.timestamp = at;
        }
        if let Some(fare) = changes.fare {
            ride.fare = fare;
        }
        if let Some(tip) = changes.tip {
            ride.tip = tip;
        }
        if let Some(payment) = changes.payment {
            ride.payment = payment;
        }
        if let Some(origin) = changes.origin {
            ride.origin = origin;
        }
        if let Some(destination) = changes.destination {
            ride.destination = destination;
        }
        if let Some(notes) = changes.notes {
            ride.notes = notes;
        }
        validate(&ride, &shift)?;

        update_ride(conn, &ride)?;
        ttlog_quiet(conn, "ride_edit", &id.to_string(), "Ride updated");
        Ok(ride)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<Ride> {
        let ride = get_ride(conn, id)?;
        delete_ride(conn, id)?;
        ttlog_quiet(conn, "ride_del", &id.to_string(), "Ride deleted");
        Ok(ride)
    }
}

fn validate(ride: &Ride, shift: &Shift) -> AppResult<()> {
    if ride.fare < 0.0 || ride.tip < 0.0 {
        return Err(AppError::InvalidAmount("fare and tip must be positive".into()));
    }
    if ride.timestamp < shift.start {
        return Err(AppError::Validation(format!(
            "Ride at {} is before shift {} started ({})",
            ride.timestamp, shift.id, shift.start
        )));
    }
    if let Some(end) = shift.end
        && ride.timestamp > end
    {
        return Err(AppError::Validation(format!(
            "Ride at {} is after shift {} ended ({})",
            ride.timestamp, shift.id, end
        )));
    }
    Ok(())
}
