use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::expense::ExpenseLogic;
use crate::db::pool::DbPool;
use crate::db::queries::references::list_references;
use crate::errors::{AppError, AppResult};
use crate::models::reference::RefKind;
use crate::scanner::{self, ocr};
use crate::sync;
use crate::ui::messages::{header, success, warning};
use crate::utils::formatting::opt_or_dash;
use std::fs;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan { image, text, save } = cmd {
        let raw = match (text, image) {
            (Some(file), _) => fs::read_to_string(file)?,
            (None, Some(img)) => ocr::run_ocr(&cfg.ocr_command, Path::new(img))?,
            (None, None) => return Err(AppError::Ocr("Pass --image or --text.".into())),
        };

        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        let vendors = list_references(conn, RefKind::Vendor)?;
        let receipt = scanner::scan_text(&raw, &vendors);

        header("Scanned receipt");
        println!("Amount  : {}", opt_or_dash(receipt.amount.map(|a| format!("{:.2}", a))));
        println!("Liters  : {}", opt_or_dash(receipt.liters.map(|l| format!("{:.2}", l))));
        println!("Date    : {}", opt_or_dash(receipt.date));
        println!("Tax ID  : {}", opt_or_dash(receipt.tax_id.as_ref()));
        println!("Invoice : {}", opt_or_dash(receipt.invoice_number.as_ref()));
        println!("Vendor  : {}", opt_or_dash(receipt.vendor.as_ref()));

        if receipt.is_empty() {
            warning("Nothing recognised on this receipt.");
            return Ok(());
        }

        if *save {
            if receipt.amount.is_none() {
                return Err(AppError::Validation(
                    "No amount recognised; record it with `taxibook expense add`.".into(),
                ));
            }
            let expense = ExpenseLogic::add(conn, receipt.to_draft(), cfg.default_tax_rate)?;
            success(format!(
                "Expense {} recorded from receipt ({} {:.2}).",
                expense.id, expense.concept, expense.total
            ));
            sync::mirror(conn, cfg, "expense", |s| s.upsert_expense(&expense));
        }
    }

    Ok(())
}
