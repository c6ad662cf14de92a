//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Keep SQL text and row conversion inside the persistence boundary.
//! - Classify SQLite failures into the store error taxonomy.
//!
//! # Invariants
//! - Each repository method runs exactly one statement.
//! - "Not found" and "no row matched" are return values, never errors.

use crate::db::DbError;
use crate::model::templates::TemplateCodecError;
use rusqlite::types::{Type, Value};
use rusqlite::{ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment_repo;
pub mod client_repo;
pub mod notification_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Hard failures surfaced by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// A unique business id or internal token is already taken.
    DuplicateKey,
    /// Stored template text could not be decoded.
    MalformedData(String),
    /// A declared foreign key rejected the write (enforcement enabled only).
    ReferenceViolation,
    /// Connection, I/O or any other SQLite fault.
    StorageUnavailable(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey => write!(f, "business id or internal token already exists"),
            Self::MalformedData(message) => write!(f, "malformed stored data: {message}"),
            Self::ReferenceViolation => write!(f, "referenced record does not exist"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) => Some(err),
            Self::DuplicateKey | Self::MalformedData(_) | Self::ReferenceViolation => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::StorageUnavailable(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StorageUnavailable(DbError::Sqlite(value))
    }
}

impl From<TemplateCodecError> for StoreError {
    fn from(value: TemplateCodecError) -> Self {
        Self::MalformedData(value.to_string())
    }
}

impl StoreError {
    /// Returns a short, stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateKey => "duplicate_key",
            Self::MalformedData(_) => "malformed_data",
            Self::ReferenceViolation => "reference_violation",
            Self::StorageUnavailable(_) => "storage_unavailable",
        }
    }
}

/// Maps a failed write to the taxonomy, recognizing constraint violations.
pub(crate) fn classify_write_error(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => return StoreError::DuplicateKey,
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return StoreError::ReferenceViolation
                }
                _ => {}
            }
        }
    }
    StoreError::from(err)
}

/// Reads a text column, rendering numeric storage classes back to text.
///
/// Columns declared with NUMERIC affinity store number-like text as INTEGER
/// or REAL.
pub(crate) fn text_column(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    match optional_text_column(row, column)? {
        Some(text) => Ok(text),
        None => Err(rusqlite::Error::InvalidColumnType(
            row.as_ref().column_index(column)?,
            column.to_string(),
            Type::Null,
        )),
    }
}

pub(crate) fn optional_text_column(
    row: &Row<'_>,
    column: &str,
) -> rusqlite::Result<Option<String>> {
    let text = match row.get::<_, Value>(column)? {
        Value::Null => None,
        Value::Integer(value) => Some(value.to_string()),
        Value::Real(value) => Some(value.to_string()),
        Value::Text(value) => Some(value),
        Value::Blob(value) => Some(String::from_utf8_lossy(&value).into_owned()),
    };
    Ok(text)
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
