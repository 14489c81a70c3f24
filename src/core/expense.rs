use crate::db::log::ttlog_quiet;
use crate::db::queries::expenses::{delete_expense, find_by_invoice, get_expense, insert_expense};
use crate::errors::{AppError, AppResult};
use crate::models::expense::{Expense, ServiceItem};
use crate::utils::money::{round2, same_amount};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

/// User (or scanner) input before the tax breakdown is completed.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub date: Option<NaiveDate>,
    pub concept: String,
    pub vendor: Option<String>,
    pub workshop: Option<String>,
    pub base: Option<f64>,
    pub total: Option<f64>,
    pub tax_rate: Option<f64>,
    pub discount: f64,
    pub liters: Option<f64>,
    pub tax_id: Option<String>,
    pub invoice_number: Option<String>,
    pub services: Vec<ServiceItem>,
    pub notes: String,
}

/// A reconciled tax breakdown: `total = base + tax - discount`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amounts {
    pub base: f64,
    pub tax_rate: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
}

/// Complete the missing side of the breakdown, or check that both sides agree.
pub fn reconcile(
    base: Option<f64>,
    total: Option<f64>,
    tax_rate: f64,
    discount: f64,
    services: &[ServiceItem],
) -> AppResult<Amounts> {
    if !(0.0..=100.0).contains(&tax_rate) {
        return Err(AppError::Validation(format!("Tax rate {} is out of range", tax_rate)));
    }
    if discount < 0.0 {
        return Err(AppError::InvalidAmount("discount must be positive".into()));
    }

    let from_base = |base: f64| {
        let base = round2(base);
        let tax = round2(base * tax_rate / 100.0);
        Amounts {
            base,
            tax_rate,
            tax,
            discount,
            total: round2(base + tax - discount),
        }
    };

    let amounts = match (base, total) {
        (Some(base), Some(total)) => {
            let computed = from_base(base);
            if !same_amount(computed.total, total) {
                return Err(AppError::Validation(format!(
                    "Amounts do not reconcile: base {:.2} + tax {:.2} - discount {:.2} = {:.2}, but total is {:.2}",
                    computed.base, computed.tax, discount, computed.total, total
                )));
            }
            Amounts {
                total: round2(total),
                ..computed
            }
        }
        (Some(base), None) => from_base(base),
        (None, Some(total)) => {
            let total = round2(total);
            let base = round2((total + discount) / (1.0 + tax_rate / 100.0));
            Amounts {
                base,
                tax_rate,
                tax: round2(total + discount - base),
                discount,
                total,
            }
        }
        (None, None) => {
            if services.is_empty() {
                return Err(AppError::Validation(
                    "Specify --base, --total or at least one --service.".into(),
                ));
            }
            from_base(services.iter().map(|s| s.amount).sum())
        }
    };

    if amounts.total < 0.0 {
        return Err(AppError::Validation("Discount exceeds the invoice amount.".into()));
    }
    Ok(amounts)
}

/// Parse "Description=12.50" into a service line.
pub fn parse_service(input: &str) -> AppResult<ServiceItem> {
    let (desc, amount) = input
        .rsplit_once('=')
        .ok_or_else(|| AppError::Validation(format!("Service '{}' must look like 'Oil=45.00'", input)))?;
    let description = desc.trim();
    if description.is_empty() {
        return Err(AppError::Validation(format!("Service '{}' has no description", input)));
    }
    Ok(ServiceItem {
        description: description.to_string(),
        amount: crate::utils::money::parse_amount_arg(amount)?,
    })
}

pub struct ExpenseLogic;

impl ExpenseLogic {
    pub fn build(draft: ExpenseDraft, default_tax_rate: f64) -> AppResult<Expense> {
        let concept = draft.concept.trim();
        if concept.is_empty() {
            return Err(AppError::Validation("Concept is required.".into()));
        }

        let amounts = reconcile(
            draft.base,
            draft.total,
            draft.tax_rate.unwrap_or(default_tax_rate),
            draft.discount,
            &draft.services,
        )?;

        Ok(Expense {
            id: 0,
            date: draft.date.unwrap_or_else(crate::utils::date::today),
            concept: concept.to_string(),
            vendor: draft.vendor,
            workshop: draft.workshop,
            base: amounts.base,
            tax_rate: amounts.tax_rate,
            tax: amounts.tax,
            discount: amounts.discount,
            total: amounts.total,
            liters: draft.liters,
            tax_id: draft.tax_id.map(|t| t.to_uppercase()),
            invoice_number: draft.invoice_number,
            services: draft.services,
            notes: draft.notes,
            created_at: Local::now().to_rfc3339(),
        })
    }

    pub fn add(conn: &Connection, draft: ExpenseDraft, default_tax_rate: f64) -> AppResult<Expense> {
        let mut expense = Self::build(draft, default_tax_rate)?;

        if let (Some(tax_id), Some(invoice)) = (&expense.tax_id, &expense.invoice_number)
            && let Some(existing) = find_by_invoice(conn, tax_id, invoice)?
        {
            return Err(AppError::Validation(format!(
                "Invoice {} from {} is already recorded (expense {})",
                invoice, tax_id, existing
            )));
        }

        expense.id = insert_expense(conn, &expense)?;
        ttlog_quiet(
            conn,
            "expense_add",
            &expense.id.to_string(),
            &format!("{} {:.2}", expense.concept, expense.total),
        );
        Ok(expense)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<Expense> {
        let expense = get_expense(conn, id)?;
        delete_expense(conn, id)?;
        ttlog_quiet(conn, "expense_del", &id.to_string(), "Expense deleted");
        Ok(expense)
    }
}
