use crate::cli::parser::RideCmd;
use crate::config::Config;
use crate::core::ride::{RideEdit, RideInput, RideLogic};
use crate::db::pool::DbPool;
use crate::db::queries::rides::{list_rides, rides_for_shift};
use crate::errors::AppResult;
use crate::models::payment::PaymentMethod;
use crate::sync;
use crate::ui::messages::{info, success};
use crate::utils::date::{period_or_current_month, resolve_moment};
use crate::utils::formatting::truncate;
use crate::utils::money::{format_amount, parse_amount_arg, round2};
use crate::utils::table::Table;

pub fn handle(action: &RideCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    match action {
        RideCmd::Add {
            fare,
            tip,
            payment,
            shift,
            at,
            origin,
            destination,
            notes,
        } => {
            let input = RideInput {
                shift_id: *shift,
                at: resolve_moment(at.as_ref())?,
                fare: parse_amount_arg(fare)?,
                tip: tip.as_deref().map(parse_amount_arg).transpose()?.unwrap_or(0.0),
                payment: PaymentMethod::parse(payment)?,
                origin: origin.clone().unwrap_or_default(),
                destination: destination.clone().unwrap_or_default(),
                notes: notes.clone().unwrap_or_default(),
            };
            let ride = RideLogic::add(conn, input)?;
            success(format!(
                "Ride {} recorded: {} ({}) on shift {}",
                ride.id,
                format_amount(ride.total(), &cfg.currency),
                ride.payment.label(),
                ride.shift_id
            ));
            sync::mirror(conn, cfg, "ride", |s| s.upsert_ride(&ride));
        }

        RideCmd::List { period, shift } => {
            let rides = match shift {
                Some(id) => rides_for_shift(conn, *id)?,
                None => list_rides(conn, period_or_current_month(period.as_ref())?)?,
            };
            if rides.is_empty() {
                info("No rides found.");
                return Ok(());
            }

            let total = round2(rides.iter().map(|r| r.total()).sum());
            let rows = rides
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                        format!("{:.2}", r.fare),
                        format!("{:.2}", r.tip),
                        r.payment.code().to_string(),
                        truncate(&r.origin, 20),
                        truncate(&r.destination, 20),
                        r.shift_id.to_string(),
                    ]
                })
                .collect();
            let table = Table::auto(
                &["ID", "When", "Fare", "Tip", "Pay", "From", "To", "Shift"],
                rows,
            );
            print!("{}", table.render());
            println!("\n{} rides, total {}", rides.len(), format_amount(total, &cfg.currency));
        }

        RideCmd::Edit {
            id,
            fare,
            tip,
            payment,
            at,
            origin,
            destination,
            notes,
        } => {
            let changes = RideEdit {
                at: at.as_ref().map(|a| resolve_moment(Some(a))).transpose()?,
                fare: fare.as_deref().map(parse_amount_arg).transpose()?,
                tip: tip.as_deref().map(parse_amount_arg).transpose()?,
                payment: payment.as_deref().map(PaymentMethod::parse).transpose()?,
                origin: origin.clone(),
                destination: destination.clone(),
                notes: notes.clone(),
            };
            let ride = RideLogic::edit(conn, *id, changes)?;
            success(format!("Ride {} updated.", ride.id));
            sync::mirror(conn, cfg, "ride", |s| s.upsert_ride(&ride));
        }

        RideCmd::Del { id } => {
            let ride = RideLogic::delete(conn, *id)?;
            success(format!("Ride {} deleted.", ride.id));
            sync::mirror(conn, cfg, "ride", |s| s.delete_ride(ride.id).map(|_| ()));
        }
    }

    Ok(())
}
