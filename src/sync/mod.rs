//! Best-effort mirror of the local store into a Google spreadsheet.
//!
//! Local SQLite data is authoritative: a failed mirror call never undoes a
//! local write, it only prints a warning and records `sync_failed` in the
//! internal log.

pub mod rows;
pub mod schema;
pub mod service;

pub use rows::Snapshot;
pub use service::SyncService;

use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::queries::settings::{LAST_SYNC, SPREADSHEET_ID, delete_setting, get_setting, set_setting};
use crate::errors::AppResult;
use crate::google::{GoogleClient, SheetsApi};
use crate::ui::messages::warning;
use chrono::Local;
use rusqlite::Connection;

/// Service over the real Google API, seeded with the id cached in settings.
pub fn open_service(conn: &Connection, cfg: &Config) -> AppResult<SyncService<GoogleClient>> {
    let client = GoogleClient::from_config(cfg)?;
    let cached = get_setting(conn, SPREADSHEET_ID)?;
    Ok(SyncService::new(client, cfg.sync.spreadsheet_name.clone(), cached))
}

/// Store the resolved spreadsheet id (or forget it after a failure).
pub fn persist_state<A: SheetsApi>(conn: &Connection, service: &SyncService<A>) -> AppResult<()> {
    match service.spreadsheet_id() {
        Some(id) => set_setting(conn, SPREADSHEET_ID, id),
        None => delete_setting(conn, SPREADSHEET_ID),
    }
}

/// Record the sync time locally and in the Settings sheet.
pub fn mark_synced<A: SheetsApi>(conn: &Connection, service: &mut SyncService<A>) -> AppResult<()> {
    let stamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    set_setting(conn, LAST_SYNC, &stamp)?;
    service.upsert_setting(LAST_SYNC, &stamp)
}

/// Mirror one local change when auto-sync is on. Never fails the caller.
pub fn mirror<F>(conn: &Connection, cfg: &Config, target: &str, op: F)
where
    F: FnOnce(&mut SyncService<GoogleClient>) -> AppResult<()>,
{
    if !cfg.sync.enabled || !cfg.sync.auto_sync {
        return;
    }

    let outcome = open_service(conn, cfg).and_then(|mut service| {
        let result = op(&mut service).and_then(|()| mark_synced(conn, &mut service));
        persist_state(conn, &service)?;
        result
    });

    if let Err(e) = outcome {
        warning(format!("Saved locally, but the spreadsheet mirror failed: {}", e));
        ttlog_quiet(conn, "sync_failed", target, &e.to_string());
    }
}
