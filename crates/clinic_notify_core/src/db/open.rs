//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas from [`StoreConfig`].
//! - Create missing tables when bootstrapping a store.
//!
//! # Invariants
//! - `foreign_keys` is set explicitly on every connection, matching config.
//! - Connections returned by `open_db*` have the store schema in place.

use super::schema::ensure_schema;
use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{debug, error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Opens the configured database file and ensures the store tables exist.
///
/// # Side effects
/// - Creates the file when absent.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let result = open_connection(config).and_then(|conn| {
        ensure_schema(&conn)?;
        Ok(conn)
    });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode=file duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode=file duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

/// Opens an in-memory database with the store schema and default pragmas.
///
/// Intended for repository-level tests and throwaway tooling; the database
/// disappears when the connection is dropped.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn, &StoreConfig::default())?;
    ensure_schema(&conn)?;
    debug!("event=db_open module=db status=ok mode=memory");
    Ok(conn)
}

/// Opens one configured connection without touching the schema.
///
/// Used for per-operation acquisition once the store has been bootstrapped.
pub fn open_connection(config: &StoreConfig) -> DbResult<Connection> {
    let conn = Connection::open(&config.db_path).map_err(|source| DbError::Open {
        path: config.db_path.clone(),
        source,
    })?;
    configure_connection(&conn, config)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection, config: &StoreConfig) -> DbResult<()> {
    let foreign_keys = if config.enforce_foreign_keys {
        "ON"
    } else {
        "OFF"
    };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;
    conn.busy_timeout(config.busy_timeout)?;
    Ok(())
}
