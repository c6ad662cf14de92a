//! Client repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and look up client rows by id or internal token.
//! - Encode templates on write and decode them on read.
//!
//! # Invariants
//! - Unique-key collisions surface as `StoreError::DuplicateKey`.
//! - Undecodable stored templates surface as `StoreError::MalformedData`.
//! - An empty patch never reaches the database.

use super::{classify_write_error, StoreResult};
use crate::model::client::{Client, ClientId, ClientPatch, NewClient};
use crate::model::templates::decode_templates;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    client_name,
    cnpj,
    internal_token,
    twilio_account_sid,
    twilio_auth_token,
    twilio_from_number,
    twilio_templates,
    created_at
FROM clients";

/// Repository interface for client records.
pub trait ClientRepository {
    fn create_client(&self, client: NewClient) -> StoreResult<ClientId>;
    fn get_client_by_id(&self, id: ClientId) -> StoreResult<Option<Client>>;
    fn get_client_by_token(&self, token: &str) -> StoreResult<Option<Client>>;
    fn update_client(&self, id: ClientId, patch: ClientPatch) -> StoreResult<bool>;
    fn delete_client(&self, id: ClientId) -> StoreResult<bool>;
}

/// SQLite-backed client repository.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_client_where(&self, predicate: &str, key: Value) -> StoreResult<Option<Client>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CLIENT_SELECT_SQL} WHERE {predicate};"))?;
        let raw = stmt.query_row([key], parse_client_row).optional()?;

        match raw {
            Some(row) => Ok(Some(row.decode()?)),
            None => Ok(None),
        }
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn create_client(&self, client: NewClient) -> StoreResult<ClientId> {
        let templates = client.templates.into_stored_text()?;

        self.conn
            .execute(
                "INSERT INTO clients (
                    client_name,
                    cnpj,
                    internal_token,
                    twilio_account_sid,
                    twilio_auth_token,
                    twilio_from_number,
                    twilio_templates
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    client.name,
                    client.business_id,
                    client.internal_token,
                    client.provider_account_id,
                    client.provider_auth_secret,
                    client.provider_sender_address,
                    templates,
                ],
            )
            .map_err(classify_write_error)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_client_by_id(&self, id: ClientId) -> StoreResult<Option<Client>> {
        self.get_client_where("id = ?1", Value::Integer(id))
    }

    fn get_client_by_token(&self, token: &str) -> StoreResult<Option<Client>> {
        self.get_client_where("internal_token = ?1", Value::Text(token.to_string()))
    }

    fn update_client(&self, id: ClientId, patch: ClientPatch) -> StoreResult<bool> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        let text_columns = [
            ("client_name", patch.name),
            ("cnpj", patch.business_id),
            ("internal_token", patch.internal_token),
            ("twilio_account_sid", patch.provider_account_id),
            ("twilio_auth_token", patch.provider_auth_secret),
            ("twilio_from_number", patch.provider_sender_address),
        ];
        for (column, value) in text_columns {
            if let Some(value) = value {
                assignments.push(column);
                bind_values.push(Value::Text(value));
            }
        }
        if let Some(templates) = patch.templates {
            assignments.push("twilio_templates");
            bind_values.push(Value::Text(templates.into_stored_text()?));
        }

        if assignments.is_empty() {
            return Ok(false);
        }

        let set_clause = assignments
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        bind_values.push(Value::Integer(id));

        let changed = self
            .conn
            .execute(
                &format!("UPDATE clients SET {set_clause} WHERE id = ?;"),
                params_from_iter(bind_values),
            )
            .map_err(classify_write_error)?;

        Ok(changed > 0)
    }

    fn delete_client(&self, id: ClientId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1;", [id])
            .map_err(classify_write_error)?;
        Ok(changed > 0)
    }
}

/// Client row before template decoding.
///
/// Decoding happens outside the rusqlite row closure so codec failures keep
/// their own error kind.
struct RawClientRow {
    client: Client,
    templates_text: String,
}

impl RawClientRow {
    fn decode(mut self) -> StoreResult<Client> {
        self.client.templates = decode_templates(&self.templates_text)?;
        Ok(self.client)
    }
}

fn parse_client_row(row: &Row<'_>) -> rusqlite::Result<RawClientRow> {
    Ok(RawClientRow {
        client: Client {
            id: row.get("id")?,
            name: row.get("client_name")?,
            business_id: row.get("cnpj")?,
            internal_token: row.get("internal_token")?,
            provider_account_id: row.get("twilio_account_sid")?,
            provider_auth_secret: row.get("twilio_auth_token")?,
            provider_sender_address: row.get("twilio_from_number")?,
            templates: Vec::new(),
            created_at: row.get("created_at")?,
        },
        templates_text: row.get("twilio_templates")?,
    })
}
