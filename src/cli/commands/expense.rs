use crate::cli::parser::ExpenseCmd;
use crate::config::Config;
use crate::core::autocomplete;
use crate::core::expense::{ExpenseDraft, ExpenseLogic, parse_service};
use crate::db::pool::DbPool;
use crate::db::queries::expenses::list_expenses;
use crate::db::queries::references::list_references;
use crate::errors::{AppError, AppResult};
use crate::models::reference::RefKind;
use crate::sync;
use crate::ui::messages::{info, success};
use crate::utils::date::{parse_date, period_or_current_month};
use crate::utils::formatting::truncate;
use crate::utils::money::{format_amount, parse_amount, parse_amount_arg, round2};
use crate::utils::table::Table;
use rusqlite::Connection;

pub fn handle(action: &ExpenseCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    match action {
        ExpenseCmd::Add {
            concept,
            date,
            total,
            base,
            tax_rate,
            discount,
            vendor,
            workshop,
            services,
            liters,
            tax_id,
            invoice,
            notes,
        } => {
            let vendor = vendor
                .as_deref()
                .map(|v| resolve_ref(conn, RefKind::Vendor, v))
                .transpose()?;

            // a known vendor brings its tax id along
            let tax_id = match (tax_id, &vendor) {
                (Some(t), _) => Some(t.clone()),
                (None, Some(v)) => list_references(conn, RefKind::Vendor)?
                    .into_iter()
                    .find(|r| &r.name == v)
                    .and_then(|r| r.tax_id),
                (None, None) => None,
            };

            let draft = ExpenseDraft {
                date: date
                    .as_deref()
                    .map(|d| parse_date(d).ok_or_else(|| AppError::InvalidDate(d.to_string())))
                    .transpose()?,
                concept: resolve_ref(conn, RefKind::Concept, concept)?,
                vendor,
                workshop: workshop
                    .as_deref()
                    .map(|w| resolve_ref(conn, RefKind::Workshop, w))
                    .transpose()?,
                base: base.as_deref().map(parse_amount_arg).transpose()?,
                total: total.as_deref().map(parse_amount_arg).transpose()?,
                tax_rate: tax_rate
                    .as_deref()
                    .map(|r| parse_amount(r).ok_or_else(|| AppError::InvalidAmount(r.to_string())))
                    .transpose()?,
                discount: discount
                    .as_deref()
                    .map(parse_amount_arg)
                    .transpose()?
                    .unwrap_or(0.0),
                liters: liters.as_deref().map(parse_amount_arg).transpose()?,
                tax_id,
                invoice_number: invoice.clone(),
                services: services
                    .iter()
                    .map(|s| parse_service(s))
                    .collect::<AppResult<Vec<_>>>()?,
                notes: notes.clone().unwrap_or_default(),
            };

            let expense = ExpenseLogic::add(conn, draft, cfg.default_tax_rate)?;
            success(format!(
                "Expense {} recorded: {} {} (base {:.2} + tax {:.2} - discount {:.2})",
                expense.id,
                expense.concept,
                format_amount(expense.total, &cfg.currency),
                expense.base,
                expense.tax,
                expense.discount
            ));
            sync::mirror(conn, cfg, "expense", |s| s.upsert_expense(&expense));
        }

        ExpenseCmd::List { period } => {
            let expenses = list_expenses(conn, period_or_current_month(period.as_ref())?)?;
            if expenses.is_empty() {
                info("No expenses found.");
                return Ok(());
            }

            let total = round2(expenses.iter().map(|e| e.total).sum());
            let rows = expenses
                .iter()
                .map(|e| {
                    vec![
                        e.id.to_string(),
                        e.date.to_string(),
                        truncate(&e.concept, 18),
                        truncate(e.vendor.as_deref().or(e.workshop.as_deref()).unwrap_or(""), 22),
                        format!("{:.2}", e.base),
                        format!("{:.2}", e.tax),
                        format!("{:.2}", e.total),
                        e.invoice_number.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            let table = Table::auto(
                &["ID", "Date", "Concept", "Vendor", "Base", "Tax", "Total", "Invoice"],
                rows,
            );
            print!("{}", table.render());
            println!(
                "\n{} expenses, total {}",
                expenses.len(),
                format_amount(total, &cfg.currency)
            );
        }

        ExpenseCmd::Del { id } => {
            let expense = ExpenseLogic::delete(conn, *id)?;
            success(format!("Expense {} deleted.", expense.id));
            sync::mirror(conn, cfg, "expense", |s| {
                s.delete_expense(expense.id).map(|_| ())
            });
        }
    }

    Ok(())
}

/// Match free text against a reference list; an empty list keeps the text.
fn resolve_ref(conn: &Connection, kind: RefKind, input: &str) -> AppResult<String> {
    let names: Vec<String> = list_references(conn, kind)?
        .into_iter()
        .map(|r| r.name)
        .collect();
    if names.is_empty() {
        return Ok(input.trim().to_string());
    }
    autocomplete::resolve(kind.label(), &names, input)
}
