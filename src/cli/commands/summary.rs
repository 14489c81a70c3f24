use crate::config::Config;
use crate::core::summary::SummaryLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_amount};
use crate::utils::date::period_or_current_month;
use crate::utils::formatting::opt_or_dash;
use crate::utils::mins2readable;
use crate::utils::money::format_amount;

pub fn handle(period: Option<&String>, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let bounds = period_or_current_month(period)?;
    let s = SummaryLogic::build(&pool.conn, bounds)?;
    let money = |v: f64| format_amount(v, &cfg.currency);

    match bounds {
        Some((from, to)) => header(format!("Summary {} → {}", from, to)),
        None => header("Summary (all time)"),
    }

    println!("Shifts         : {}", s.shifts);
    println!("Worked         : {}", mins2readable(s.worked_minutes, false, false));
    println!("Breaks         : {}", mins2readable(s.break_minutes, false, false));
    println!("Km driven      : {}", s.km);
    println!();
    println!("Rides          : {}", s.rides);
    println!("Fares          : {}", money(s.fares));
    println!("Tips           : {}", money(s.tips));
    for (method, amount) in &s.by_payment {
        println!("  {:<12} : {}", method.label(), money(*amount));
    }
    println!("Revenue        : {}", money(s.revenue()));
    println!();
    println!("Expenses       : {} ({})", money(s.expenses_total), s.expenses);
    println!("Deductible tax : {}", money(s.expenses_tax));
    println!(
        "Net            : {}{}{}",
        color_for_amount(s.net()),
        money(s.net()),
        RESET
    );
    println!(
        "Per hour       : {}",
        opt_or_dash(s.revenue_per_hour().map(money))
    );
    println!("Per km         : {}", opt_or_dash(s.revenue_per_km().map(money)));

    Ok(())
}
