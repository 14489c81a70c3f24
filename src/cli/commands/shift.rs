use crate::cli::parser::ShiftCmd;
use crate::config::Config;
use crate::core::shift::{ShiftEdit, ShiftLogic};
use crate::core::summary::SummaryLogic;
use crate::db::pool::DbPool;
use crate::db::queries::shifts::{active_shift, list_shifts};
use crate::errors::{AppError, AppResult};
use crate::sync;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::colorize_optional;
use crate::utils::date::{format_datetime, parse_datetime, period_or_current_month, resolve_moment};
use crate::utils::formatting::opt_or_dash;
use crate::utils::money::format_amount;
use crate::utils::mins2readable;
use crate::utils::table::Table;

pub fn handle(action: &ShiftCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    match action {
        ShiftCmd::Start { at, km, notes } => {
            let at = resolve_moment(at.as_ref())?;
            let shift = ShiftLogic::start(conn, at, *km, notes.as_deref().unwrap_or(""))?;
            success(format!(
                "Shift {} started at {} (odometer {} km)",
                shift.id,
                format_datetime(&shift.start),
                shift.km_start
            ));
            sync::mirror(conn, cfg, "shift", |s| s.upsert_shift(&shift));
        }

        ShiftCmd::End { at, km } => {
            let at = resolve_moment(at.as_ref())?;
            let shift = ShiftLogic::end(conn, at, *km)?;
            success(format!(
                "Shift {} closed: {} worked, {} km",
                shift.id,
                mins2readable(shift.worked_minutes(), false, false),
                shift.total_km()
            ));
            sync::mirror(conn, cfg, "shift", |s| s.upsert_shift(&shift));
        }

        ShiftCmd::BreakStart { at } => {
            let at = resolve_moment(at.as_ref())?;
            let shift = ShiftLogic::break_start(conn, at)?;
            success(format!("Break started at {}", at.format("%H:%M")));
            sync::mirror(conn, cfg, "shift", |s| s.upsert_shift(&shift));
        }

        ShiftCmd::BreakEnd { at } => {
            let at = resolve_moment(at.as_ref())?;
            let shift = ShiftLogic::break_end(conn, at)?;
            success(format!(
                "Break ended at {} ({} of breaks so far)",
                at.format("%H:%M"),
                mins2readable(shift.break_minutes(), false, false)
            ));
            sync::mirror(conn, cfg, "shift", |s| s.upsert_shift(&shift));
        }

        ShiftCmd::Status => match active_shift(conn)? {
            None => info("No active shift."),
            Some(shift) => {
                let status = SummaryLogic::shift_status(conn, shift, crate::utils::date::now())?;
                header(format!("Shift {}", status.shift.id));
                println!("Started   : {}", format_datetime(&status.shift.start));
                println!("Odometer  : {} km", status.shift.km_start);
                println!(
                    "Worked    : {}{}",
                    mins2readable(status.worked_minutes, false, false),
                    if status.on_break { " (on break)" } else { "" }
                );
                println!("Rides     : {}", status.rides.len());
                println!("Revenue   : {}", format_amount(status.revenue, &cfg.currency));
            }
        },

        ShiftCmd::List { period } => {
            let bounds = period_or_current_month(period.as_ref())?;
            let shifts = list_shifts(conn, bounds)?;
            if shifts.is_empty() {
                info("No shifts in the selected period.");
                return Ok(());
            }

            let rows = shifts
                .iter()
                .map(|s| {
                    vec![
                        s.id.to_string(),
                        format_datetime(&s.start),
                        colorize_optional(&opt_or_dash(s.end.as_ref().map(format_datetime))),
                        s.km_start.to_string(),
                        colorize_optional(&opt_or_dash(s.km_end)),
                        mins2readable(s.break_minutes(), false, false),
                        colorize_optional(&mins2readable(s.worked_minutes(), false, false)),
                        s.notes.clone(),
                    ]
                })
                .collect();

            let table = Table::auto(
                &["ID", "Start", "End", "Km start", "Km end", "Breaks", "Worked", "Notes"],
                rows,
            );
            print!("{}", table.render());
        }

        ShiftCmd::Edit {
            id,
            start,
            end,
            km_start,
            km_end,
            notes,
        } => {
            let changes = ShiftEdit {
                start: start.as_deref().map(moment).transpose()?,
                end: end.as_deref().map(moment).transpose()?,
                km_start: *km_start,
                km_end: *km_end,
                notes: notes.clone(),
            };
            let shift = ShiftLogic::edit(conn, *id, changes)?;
            success(format!("Shift {} updated.", shift.id));
            sync::mirror(conn, cfg, "shift", |s| s.upsert_shift(&shift));
        }

        ShiftCmd::Del { id } => {
            let (shift, ride_ids) = ShiftLogic::delete(conn, *id)?;
            success(format!(
                "Shift {} deleted together with {} ride(s).",
                shift.id,
                ride_ids.len()
            ));
            sync::mirror(conn, cfg, "shift", |s| {
                for ride_id in &ride_ids {
                    s.delete_ride(*ride_id)?;
                }
                s.delete_shift(shift.id).map(|_| ())
            });
        }
    }

    Ok(())
}

fn moment(s: &str) -> AppResult<chrono::NaiveDateTime> {
    parse_datetime(s).ok_or_else(|| AppError::InvalidDate(format!("{} (use 'YYYY-MM-DD HH:MM')", s)))
}
