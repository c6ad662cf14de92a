//! Table definitions for the notification store.
//!
//! Column names follow the persisted layout used by existing deployments
//! (`cnpj`, `twilio_*`, `cellphone`, `whatsapp_message_id`), so databases
//! created by earlier tooling open without changes.
//!
//! Caller-supplied dates and times use TEXT columns. Older files may declare
//! them `DATE`/`TIME`/`TIMESTAMP`; readers render numeric storage back to text.

use crate::db::DbResult;
use rusqlite::Connection;

/// Table names created by [`ensure_schema`], in creation order.
pub const TABLES: [&str; 3] = ["clients", "appointments", "notifications"];

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_name TEXT NOT NULL,
    cnpj TEXT NOT NULL UNIQUE,
    internal_token TEXT NOT NULL UNIQUE,
    twilio_account_sid TEXT NOT NULL,
    twilio_auth_token TEXT NOT NULL,
    twilio_from_number TEXT NOT NULL,
    twilio_templates TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    cellphone TEXT NOT NULL,
    document_id TEXT NOT NULL,
    appointment_date TEXT NOT NULL,
    appointment_time TEXT NOT NULL,
    consultation_type TEXT NOT NULL,
    notification_sent BOOLEAN DEFAULT FALSE,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (client_id) REFERENCES clients(id)
);

CREATE TABLE IF NOT EXISTS notifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL,
    appointment_id INTEGER,
    message_type TEXT NOT NULL,
    status TEXT NOT NULL,
    whatsapp_message_id TEXT,
    response TEXT,
    sent_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    response_at TEXT,
    template_used TEXT,
    FOREIGN KEY (client_id) REFERENCES clients(id),
    FOREIGN KEY (appointment_id) REFERENCES appointments(id)
);
";

/// Creates any missing store tables. Safe to call on every open.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Returns whether `table_name` exists in the connected database.
pub fn table_exists(conn: &Connection, table_name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
