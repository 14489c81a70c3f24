use crate::cli::parser::{Cli, SyncCmd};
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::settings::{LAST_SYNC, get_setting};
use crate::errors::{AppError, AppResult};
use crate::google::auth;
use crate::google::client::http_client;
use crate::sync::{self, Snapshot};
use crate::ui::messages::{header, info, success};
use crate::utils::formatting::opt_or_dash;

pub fn handle(action: &SyncCmd, cli: &Cli, cfg: &Config) -> AppResult<()> {
    match action {
        SyncCmd::AuthUrl => {
            let url = auth::authorization_url(&cfg.google)?;
            info("Open this URL, grant access, then run `taxibook sync auth-code <CODE>`:");
            println!("{}", url);
        }

        SyncCmd::AuthCode { code } => {
            let http = http_client(cfg.sync.timeout_secs)?;
            let tokens = auth::exchange_code(&http, &cfg.google, code)?;
            let refresh = tokens.refresh_token.ok_or_else(|| {
                AppError::Auth("Google returned no refresh token; retry `sync auth-url`.".into())
            })?;

            let mut updated = cfg.clone();
            updated.google.refresh_token = refresh;
            updated.google.access_token.clear();
            if cli.test {
                info("Test mode: configuration not written.");
            } else {
                updated.save()?;
            }
            success("Google account linked.");
        }

        SyncCmd::Push => {
            let pool = DbPool::new(&cfg.database)?;
            let conn = &pool.conn;
            let snapshot = Snapshot::load(conn, None)?;

            let mut service = sync::open_service(conn, cfg)?;
            let result = service
                .bulk_replace(&snapshot)
                .and_then(|rows| sync::mark_synced(conn, &mut service).map(|()| rows));
            sync::persist_state(conn, &service)?;

            match result {
                Ok(rows) => {
                    ttlog_quiet(conn, "sync_push", service.spreadsheet_name(), &format!("{} rows", rows));
                    success(format!(
                        "Uploaded {} rows to '{}' ({}).",
                        rows,
                        service.spreadsheet_name(),
                        opt_or_dash(service.spreadsheet_id())
                    ));
                }
                Err(e) => {
                    ttlog_quiet(conn, "sync_failed", "push", &e.to_string());
                    return Err(e);
                }
            }
        }

        SyncCmd::Status => {
            let pool = DbPool::new(&cfg.database)?;
            let conn = &pool.conn;

            header("Google Sheets mirror");
            println!("Enabled     : {}", if cfg.sync.enabled { "yes" } else { "no" });
            println!("Auto-sync   : {}", if cfg.sync.auto_sync { "yes" } else { "no" });
            println!("Spreadsheet : {}", cfg.sync.spreadsheet_name);
            println!("Last sync   : {}", opt_or_dash(get_setting(conn, LAST_SYNC)?));

            let mut service = sync::open_service(conn, cfg)?;
            let added = service.ensure_sheets();
            let counts = added.and_then(|n| service.row_counts().map(|c| (n, c)));
            sync::persist_state(conn, &service)?;
            let (added, counts) = counts?;

            println!("ID          : {}", opt_or_dash(service.spreadsheet_id()));
            if added > 0 {
                info(format!("Added {} missing sheet(s).", added));
            }
            for (sheet, n) in counts {
                println!("  {:<10} {} rows", sheet, n);
            }
        }

        SyncCmd::Find { sheet, id } => {
            let pool = DbPool::new(&cfg.database)?;
            let conn = &pool.conn;

            let mut service = sync::open_service(conn, cfg)?;
            let found = service.find_row(sheet, id);
            sync::persist_state(conn, &service)?;

            match found? {
                Some(row) => success(format!("{} id {} is on row {}.", sheet, id, row)),
                None => info(format!("{} id {} is not in the spreadsheet.", sheet, id)),
            }
        }
    }

    Ok(())
}
