use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. It also records applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_base_schema",
        description: "Created shifts, rides, expenses, refs and settings tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS shifts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at  TEXT NOT NULL,
            ended_at    TEXT,
            km_start    INTEGER NOT NULL DEFAULT 0,
            km_end      INTEGER,
            breaks      TEXT NOT NULL DEFAULT '[]',
            notes       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_shifts_started ON shifts(started_at);

        CREATE TABLE IF NOT EXISTS rides (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            shift_id    INTEGER NOT NULL REFERENCES shifts(id) ON DELETE CASCADE,
            timestamp   TEXT NOT NULL,
            fare        REAL NOT NULL DEFAULT 0,
            tip         REAL NOT NULL DEFAULT 0,
            payment     TEXT NOT NULL DEFAULT 'C' CHECK(payment IN ('C','T','A','F')),
            origin      TEXT NOT NULL DEFAULT '',
            destination TEXT NOT NULL DEFAULT '',
            notes       TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_rides_shift ON rides(shift_id);
        CREATE INDEX IF NOT EXISTS idx_rides_timestamp ON rides(timestamp);

        CREATE TABLE IF NOT EXISTS expenses (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            date           TEXT NOT NULL,
            concept        TEXT NOT NULL,
            vendor         TEXT,
            workshop       TEXT,
            base           REAL NOT NULL DEFAULT 0,
            tax_rate       REAL NOT NULL DEFAULT 0,
            tax            REAL NOT NULL DEFAULT 0,
            discount       REAL NOT NULL DEFAULT 0,
            total          REAL NOT NULL DEFAULT 0,
            liters         REAL,
            tax_id         TEXT,
            invoice_number TEXT,
            services       TEXT NOT NULL DEFAULT '[]',
            notes          TEXT NOT NULL DEFAULT '',
            created_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

        CREATE TABLE IF NOT EXISTS refs (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            kind    TEXT NOT NULL CHECK(kind IN ('vendor','concept','workshop')),
            name    TEXT NOT NULL,
            tax_id  TEXT,
            phone   TEXT,
            UNIQUE(kind, name COLLATE NOCASE)
        );

        CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250412_0002_default_concepts",
        description: "Seeded default expense concepts",
        sql: r#"
        INSERT OR IGNORE INTO refs (kind, name) VALUES
            ('concept', 'Fuel'),
            ('concept', 'Maintenance'),
            ('concept', 'Insurance'),
            ('concept', 'Fees'),
            ('concept', 'Other');
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;
    tx.commit()
}

/// Public entry point: run all pending migrations.
///
/// Invoked every time a connection is opened, so every step is idempotent.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    if applied > 0 {
        success(format!("Database schema up to date ({} migration(s) applied).", applied));
    }

    Ok(())
}

/// Versions recorded in the log table, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}
