use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::formatting::truncate;
use ansi_term::Colour;

const OP_MAX: usize = 40;

/// ANSI colour for a log operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "init" => Colour::RGB(255, 153, 51),
        "backup" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "sync_push" | "sync_ok" => Colour::Cyan,
        "sync_failed" => Colour::Red,
        other if other.ends_with("_add") || other == "shift_start" => Colour::Green,
        other if other.ends_with("_del") => Colour::Red,
        other if other.ends_with("_edit") || other == "shift_end" => Colour::Yellow,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool, operation: Option<&str>) -> AppResult<()> {
        let entries: Vec<_> = load_log(&pool.conn)?
            .into_iter()
            .filter(|(_, _, op, _, _)| operation.is_none_or(|wanted| op == wanted))
            .map(|(id, raw_date, op, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%F %T").to_string())
                    .unwrap_or(raw_date);
                (id, date, op, target, message)
            })
            .collect();

        if entries.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|(_, d, ..)| d.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, op, target, message) in entries {
            // padding is computed on the plain text, colour is applied afterwards
            let plain = if target.is_empty() {
                op.clone()
            } else {
                format!("{op} ({target})")
            };
            let plain = truncate(&plain, OP_MAX);
            let padding = " ".repeat(OP_MAX.saturating_sub(plain.chars().count()));

            let colored = match plain.split_once(' ') {
                Some((word, rest)) => format!("{} {}", color_for_operation(&op).paint(word), rest),
                None => color_for_operation(&op).paint(plain.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
