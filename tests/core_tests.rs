use chrono::{NaiveDate, NaiveDateTime};
use taxibook::core::autocomplete::{resolve, suggest};
use taxibook::core::expense::{ExpenseDraft, ExpenseLogic, parse_service, reconcile};
use taxibook::core::ride::{RideInput, RideLogic};
use taxibook::core::shift::ShiftLogic;
use taxibook::core::summary::SummaryLogic;
use taxibook::db::pool::DbPool;
use taxibook::errors::AppError;
use taxibook::models::payment::PaymentMethod;
use taxibook::scanner::{patterns, scan_text};
use taxibook::utils::date::parse_period;
use taxibook::utils::money::parse_amount;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("datetime")
}

#[test]
fn reconcile_derives_the_missing_side() {
    let from_total = reconcile(None, Some(60.50), 21.0, 0.0, &[]).expect("from total");
    assert_eq!(from_total.base, 50.0);
    assert_eq!(from_total.tax, 10.5);

    let from_base = reconcile(Some(100.0), None, 10.0, 5.0, &[]).expect("from base");
    assert_eq!(from_base.tax, 10.0);
    assert_eq!(from_base.total, 105.0);

    let services = vec![
        parse_service("Oil change=45,00").expect("service"),
        parse_service("Filter=15").expect("service"),
    ];
    let from_services = reconcile(None, None, 21.0, 0.0, &services).expect("from services");
    assert_eq!(from_services.base, 60.0);
    assert_eq!(from_services.total, 72.6);
}

#[test]
fn reconcile_accepts_one_cent_and_rejects_more() {
    assert!(reconcile(Some(10.0), Some(12.11), 21.0, 0.0, &[]).is_ok());
    assert!(matches!(
        reconcile(Some(10.0), Some(12.15), 21.0, 0.0, &[]),
        Err(AppError::Validation(_))
    ));
    assert!(reconcile(None, None, 21.0, 0.0, &[]).is_err());
    assert!(reconcile(Some(10.0), None, 21.0, 20.0, &[]).is_err());
}

#[test]
fn amounts_parse_in_both_notations() {
    assert_eq!(parse_amount("1.234,56"), Some(1234.56));
    assert_eq!(parse_amount("1,234.56"), Some(1234.56));
    assert_eq!(parse_amount("12,5"), Some(12.5));
    assert_eq!(parse_amount("€ 7"), Some(7.0));
    assert_eq!(parse_amount("abc"), None);
}

#[test]
fn scanner_takes_the_largest_amount() {
    let text = "SUBTOTAL 37,44\nIVA 21% 7,86\nTOTAL 45,30\nENTREGADO 50,00\nCAMBIO 4,70\nFecha 12.05.2025";
    assert_eq!(patterns::extract_amount(text), Some(50.0));
    assert_eq!(
        patterns::extract_date(text),
        NaiveDate::from_ymd_opt(2025, 5, 12)
    );
}

#[test]
fn scanner_reads_a_fuel_receipt() {
    let text = "ESTACION CEPSA LAS ROZAS\nNIF A-28003119\nTicket nº: T0012345\n14/03/25 09:12\nDIESEL  42,17 L  1,459 EUR/L\nIMPORTE 61,53 EUR";
    let receipt = scan_text(text, &[]);

    assert_eq!(receipt.amount, Some(61.53));
    assert_eq!(receipt.liters, Some(42.17));
    assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2025, 3, 14));
    assert_eq!(receipt.tax_id.as_deref(), Some("A28003119"));
    assert_eq!(receipt.invoice_number.as_deref(), Some("T0012345"));
    assert_eq!(receipt.vendor.as_deref(), Some("Cepsa"));

    let draft = receipt.to_draft();
    assert_eq!(draft.concept, "Fuel");
    assert_eq!(draft.total, Some(61.53));
}

#[test]
fn autocomplete_ranks_prefix_before_substring() {
    let items: Vec<String> = ["Taller Sur", "Neumaticos Tallerin", "taller norte", "Midas"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    assert_eq!(
        suggest(&items, "tall", 10),
        vec!["taller norte", "Taller Sur", "Neumaticos Tallerin"]
    );
    assert_eq!(suggest(&items, "", 2).len(), 2);

    assert_eq!(resolve("Workshop", &items, "midas").expect("exact"), "Midas");
    assert_eq!(resolve("Workshop", &items, "rin").expect("single"), "Neumaticos Tallerin");
    assert_eq!(resolve("Workshop", &items, "Bosch").expect("free text"), "Bosch");
    assert!(matches!(
        resolve("Workshop", &items, "taller"),
        Err(AppError::Ambiguous(..))
    ));

    // exact match wins over prefix candidates, also for non-ASCII case folding
    let workshops: Vec<String> = vec!["Taller Ñ".into(), "Taller Ñoño".into()];
    assert_eq!(resolve("Workshop", &workshops, "taller ñ").expect("exact"), "Taller Ñ");
}

#[test]
fn scanner_ignores_postcodes_and_plain_numbers() {
    assert_eq!(patterns::extract_liters("ESTACION 08901 L'Hospitalet"), None);
    assert_eq!(patterns::extract_liters("Litros 35"), Some(35.0));
    assert_eq!(patterns::extract_liters("GASOLEO 38,5 L"), Some(38.5));

    assert_eq!(patterns::extract_tax_id("Pago con tarjeta N 12345678 aprobado"), None);
    assert_eq!(
        patterns::extract_tax_id("CIF B-12345678").as_deref(),
        Some("B12345678")
    );
}

#[test]
fn ending_a_shift_in_the_minute_a_break_started_drops_the_break() {
    let pool = DbPool::in_memory().expect("db");
    let conn = &pool.conn;

    ShiftLogic::start(conn, at("2025-01-01 08:00"), Some(0), "").expect("start");
    ShiftLogic::break_start(conn, at("2025-01-01 12:00")).expect("break");
    let closed = ShiftLogic::end(conn, at("2025-01-01 12:00"), 150).expect("end");

    assert!(closed.breaks.is_empty());
    assert_eq!(closed.worked_minutes(), 240);
    assert_eq!(closed.total_km(), 150);
}

#[test]
fn shift_breaks_and_summary_on_memory_db() {
    let pool = DbPool::in_memory().expect("db");
    let conn = &pool.conn;

    let shift = ShiftLogic::start(conn, at("2025-10-01 06:00"), Some(2000), "").expect("start");
    assert!(matches!(
        ShiftLogic::start(conn, at("2025-10-01 07:00"), None, ""),
        Err(AppError::ShiftAlreadyActive(id)) if id == shift.id
    ));

    ShiftLogic::break_start(conn, at("2025-10-01 10:00")).expect("break");
    assert!(ShiftLogic::break_start(conn, at("2025-10-01 10:05")).is_err());
    ShiftLogic::break_end(conn, at("2025-10-01 10:20")).expect("break end");

    // a break before the shift start is refused
    assert!(ShiftLogic::break_start(conn, at("2025-10-01 05:00")).is_err());

    for (time, fare, payment) in [
        ("2025-10-01 07:10", 15.0, PaymentMethod::Cash),
        ("2025-10-01 08:40", 30.0, PaymentMethod::Card),
    ] {
        RideLogic::add(
            conn,
            RideInput {
                shift_id: None,
                at: at(time),
                fare,
                tip: 1.0,
                payment,
                origin: String::new(),
                destination: String::new(),
                notes: String::new(),
            },
        )
        .expect("ride");
    }

    let status = SummaryLogic::shift_status(conn, shift.clone(), at("2025-10-01 11:00")).expect("status");
    assert_eq!(status.rides.len(), 2);
    assert_eq!(status.revenue, 47.0);

    let closed = ShiftLogic::end(conn, at("2025-10-01 14:00"), 2150).expect("end");
    assert_eq!(closed.worked_minutes(), 460);
    assert_eq!(closed.total_km(), 150);

    ExpenseLogic::add(
        conn,
        ExpenseDraft {
            date: NaiveDate::from_ymd_opt(2025, 10, 2),
            concept: "Fees".into(),
            total: Some(12.10),
            ..ExpenseDraft::default()
        },
        21.0,
    )
    .expect("expense");

    let summary = SummaryLogic::build(conn, parse_period("2025-10").expect("period")).expect("summary");
    assert_eq!(summary.shifts, 1);
    assert_eq!(summary.km, 150);
    assert_eq!(summary.rides, 2);
    assert_eq!(summary.revenue(), 47.0);
    assert_eq!(summary.by_payment[&PaymentMethod::Card], 31.0);
    assert_eq!(summary.expenses_total, 12.1);
    assert_eq!(summary.expenses_tax, 2.1);
    assert_eq!(summary.net(), 34.9);
    assert_eq!(summary.revenue_per_km(), Some(0.31));
}
