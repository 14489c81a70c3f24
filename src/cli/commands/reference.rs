use crate::cli::parser::RefCmd;
use crate::config::Config;
use crate::core::autocomplete::suggest;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries::references::{delete_reference, insert_reference, list_references};
use crate::errors::{AppError, AppResult};
use crate::models::reference::{RefKind, Reference};
use crate::sync;
use crate::ui::messages::{info, success};
use crate::utils::formatting::opt_or_dash;
use crate::utils::table::Table;

pub fn handle(action: &RefCmd, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    let conn = &pool.conn;

    match action {
        RefCmd::Add {
            kind,
            name,
            tax_id,
            phone,
        } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Name cannot be empty.".into()));
            }
            let mut reference = Reference {
                id: 0,
                kind: *kind,
                name: name.to_string(),
                tax_id: tax_id.as_ref().map(|t| t.trim().to_uppercase()),
                phone: phone.clone(),
            };
            reference.id = insert_reference(conn, &reference)?;
            ttlog_quiet(conn, "ref_add", kind.to_db_str(), &reference.name);
            success(format!("{} '{}' added (id {}).", kind.label(), reference.name, reference.id));
            sync::mirror(conn, cfg, "ref", |s| s.upsert_reference(&reference));
        }

        RefCmd::List { kind } => {
            let kinds = match kind {
                Some(k) => vec![*k],
                None => vec![RefKind::Vendor, RefKind::Concept, RefKind::Workshop],
            };
            let mut rows = Vec::new();
            for k in kinds {
                for r in list_references(conn, k)? {
                    rows.push(vec![
                        r.id.to_string(),
                        k.label().to_string(),
                        r.name,
                        opt_or_dash(r.tax_id),
                        opt_or_dash(r.phone),
                    ]);
                }
            }
            if rows.is_empty() {
                info("No entries.");
                return Ok(());
            }
            print!(
                "{}",
                Table::auto(&["ID", "List", "Name", "Tax ID", "Phone"], rows).render()
            );
        }

        RefCmd::Suggest { kind, query, limit } => {
            let names: Vec<String> = list_references(conn, *kind)?
                .into_iter()
                .map(|r| r.name)
                .collect();
            let hits = suggest(&names, query, *limit);
            if hits.is_empty() {
                info(format!("No {} matches '{}'.", kind.label().to_lowercase(), query));
            }
            for hit in hits {
                println!("{}", hit);
            }
        }

        RefCmd::Del { id } => {
            let removed = delete_reference(conn, *id)?;
            ttlog_quiet(conn, "ref_del", removed.kind.to_db_str(), &removed.name);
            success(format!("{} '{}' removed.", removed.kind.label(), removed.name));
            sync::mirror(conn, cfg, "ref", |s| {
                s.delete_reference(removed.kind, removed.id).map(|_| ())
            });
        }
    }

    Ok(())
}
