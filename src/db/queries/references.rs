use crate::errors::{AppError, AppResult};
use crate::models::reference::{RefKind, Reference};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_row(row: &Row) -> rusqlite::Result<Reference> {
    let kind_raw: String = row.get("kind")?;
    let kind = RefKind::from_db_str(&kind_raw).map_err(|e| super::conversion_error(1, e))?;

    Ok(Reference {
        id: row.get("id")?,
        kind,
        name: row.get("name")?,
        tax_id: row.get("tax_id")?,
        phone: row.get("phone")?,
    })
}

pub fn insert_reference(conn: &Connection, r: &Reference) -> AppResult<i64> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM refs WHERE kind = ?1 AND name = ?2 COLLATE NOCASE",
            params![r.kind.to_db_str(), r.name],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = exists {
        return Err(AppError::Validation(format!(
            "{} '{}' already exists (id {})",
            r.kind.label(),
            r.name,
            id
        )));
    }

    conn.execute(
        "INSERT INTO refs (kind, name, tax_id, phone) VALUES (?1, ?2, ?3, ?4)",
        params![r.kind.to_db_str(), r.name.trim(), r.tax_id, r.phone],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_references(conn: &Connection, kind: RefKind) -> AppResult<Vec<Reference>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, name, tax_id, phone FROM refs WHERE kind = ?1 ORDER BY name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map([kind.to_db_str()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_reference(conn: &Connection, id: i64) -> AppResult<Reference> {
    conn.query_row(
        "SELECT id, kind, name, tax_id, phone FROM refs WHERE id = ?1",
        [id],
        map_row,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound("Reference", id.to_string()))
}

pub fn delete_reference(conn: &Connection, id: i64) -> AppResult<Reference> {
    let existing = get_reference(conn, id)?;
    conn.execute("DELETE FROM refs WHERE id = ?1", [id])?;
    Ok(existing)
}
