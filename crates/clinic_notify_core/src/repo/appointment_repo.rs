//! Appointment repository contract and SQLite implementation.
//!
//! # Invariants
//! - New appointments start with `notification_sent = 0`.
//! - Client existence is not checked here; enforcement is a connection setting.
//! - Listing order is whatever SQLite returns; callers must not rely on it.
//! - Filters compare with equality; a NULL flag counts as not sent.

use super::{bool_to_int, classify_write_error, text_column, StoreError, StoreResult};
use crate::model::appointment::{
    Appointment, AppointmentFilter, AppointmentId, NewAppointment,
};
use crate::model::client::ClientId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const APPOINTMENT_SELECT_SQL: &str = "SELECT
    id,
    client_id,
    name,
    cellphone,
    document_id,
    appointment_date,
    appointment_time,
    consultation_type,
    notification_sent,
    created_at
FROM appointments";

/// Repository interface for appointment records.
pub trait AppointmentRepository {
    fn add_appointment(&self, appointment: &NewAppointment) -> StoreResult<AppointmentId>;
    fn get_appointment(&self, id: AppointmentId) -> StoreResult<Option<Appointment>>;
    fn get_appointments_by_client(&self, client_id: ClientId) -> StoreResult<Vec<Appointment>>;
    /// `None` and `Some(0)` both list every appointment.
    fn get_all_appointments(&self, client_id: Option<ClientId>) -> StoreResult<Vec<Appointment>>;
    fn find_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>>;
    fn mark_appointment_notified(&self, id: AppointmentId) -> StoreResult<bool>;
    fn delete_appointment(&self, id: AppointmentId) -> StoreResult<bool>;
}

/// SQLite-backed appointment repository.
pub struct SqliteAppointmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAppointmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AppointmentRepository for SqliteAppointmentRepository<'_> {
    fn add_appointment(&self, appointment: &NewAppointment) -> StoreResult<AppointmentId> {
        self.conn
            .execute(
                "INSERT INTO appointments (
                    client_id,
                    name,
                    cellphone,
                    document_id,
                    appointment_date,
                    appointment_time,
                    consultation_type,
                    notification_sent
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    appointment.client_id,
                    appointment.name.as_str(),
                    appointment.phone.as_str(),
                    appointment.document_id.as_str(),
                    appointment.date.as_str(),
                    appointment.time.as_str(),
                    appointment.consultation_type.as_str(),
                    bool_to_int(false),
                ],
            )
            .map_err(classify_write_error)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_appointment(&self, id: AppointmentId) -> StoreResult<Option<Appointment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APPOINTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let appointment = stmt.query_row([id], parse_appointment_row).optional()?;
        Ok(appointment)
    }

    fn get_appointments_by_client(&self, client_id: ClientId) -> StoreResult<Vec<Appointment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APPOINTMENT_SELECT_SQL} WHERE client_id = ?1;"))?;
        let rows = stmt.query_map([client_id], parse_appointment_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    fn get_all_appointments(&self, client_id: Option<ClientId>) -> StoreResult<Vec<Appointment>> {
        match client_id.filter(|id| *id != 0) {
            Some(id) => self.get_appointments_by_client(id),
            None => {
                let mut stmt = self.conn.prepare(&format!("{APPOINTMENT_SELECT_SQL};"))?;
                let rows = stmt.query_map([], parse_appointment_row)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
            }
        }
    }

    fn find_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        let mut sql = format!("{APPOINTMENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values = Vec::new();

        if let Some(client_id) = filter.client_id.filter(|id| *id != 0) {
            sql.push_str(" AND client_id = ?");
            bind_values.push(Value::Integer(client_id));
        }
        if let Some(date) = filter.date.as_deref().filter(|date| !date.is_empty()) {
            sql.push_str(" AND appointment_date = ?");
            bind_values.push(Value::Text(date.to_string()));
        }
        if let Some(time) = filter.time.as_deref().filter(|time| !time.is_empty()) {
            sql.push_str(" AND appointment_time = ?");
            bind_values.push(Value::Text(time.to_string()));
        }
        if let Some(sent) = filter.notification_sent {
            sql.push_str(" AND (COALESCE(notification_sent, 0) != 0) = ?");
            bind_values.push(Value::Integer(bool_to_int(sent)));
        }
        sql.push(';');

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bind_values), parse_appointment_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    fn mark_appointment_notified(&self, id: AppointmentId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE appointments SET notification_sent = ?1 WHERE id = ?2;",
                params![bool_to_int(true), id],
            )
            .map_err(classify_write_error)?;
        Ok(changed > 0)
    }

    fn delete_appointment(&self, id: AppointmentId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?1;", [id])
            .map_err(classify_write_error)?;
        Ok(changed > 0)
    }
}

fn parse_appointment_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    // Anything non-zero counts as sent; legacy rows may hold SQLite TRUE/FALSE.
    let notification_sent = row
        .get::<_, Option<i64>>("notification_sent")?
        .is_some_and(|value| value != 0);

    Ok(Appointment {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        name: row.get("name")?,
        phone: row.get("cellphone")?,
        document_id: row.get("document_id")?,
        date: text_column(row, "appointment_date")?,
        time: text_column(row, "appointment_time")?,
        consultation_type: row.get("consultation_type")?,
        notification_sent,
        created_at: text_column(row, "created_at")?,
    })
}
