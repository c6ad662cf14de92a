//! Notification repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Record outbound notifications and their inbound responses.
//! - Serve per-appointment and per-client listings, most recent first.
//!
//! # Invariants
//! - Listings are ordered `sent_at DESC, id DESC`.
//! - Response recording always forces status to `responded`.
//! - The client window filters only when both bounds are present.

use super::{
    classify_write_error, optional_text_column, text_column, StoreError, StoreResult,
};
use crate::model::appointment::AppointmentId;
use crate::model::client::ClientId;
use crate::model::notification::{
    NewNotification, Notification, NotificationId, NotificationWindow, RESPONDED_STATUS,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const NOTIFICATION_SELECT_SQL: &str = "SELECT
    id,
    client_id,
    appointment_id,
    message_type,
    status,
    whatsapp_message_id,
    response,
    sent_at,
    response_at,
    template_used
FROM notifications";

const NOTIFICATION_ORDER_SQL: &str = " ORDER BY sent_at DESC, id DESC";

/// Repository interface for notification records.
pub trait NotificationRepository {
    fn add_notification(&self, notification: &NewNotification) -> StoreResult<NotificationId>;
    fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>>;
    /// Sets response text and time, forcing status to `responded`.
    ///
    /// `response_at = None` stamps the store's current time.
    fn update_notification_response(
        &self,
        id: NotificationId,
        response: &str,
        response_at: Option<&str>,
    ) -> StoreResult<bool>;
    fn get_notifications_by_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> StoreResult<Vec<Notification>>;
    fn get_notifications_by_client(
        &self,
        client_id: ClientId,
        window: &NotificationWindow,
    ) -> StoreResult<Vec<Notification>>;
}

/// SQLite-backed notification repository.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_notifications(
        &self,
        sql: &str,
        bind_values: Vec<Value>,
    ) -> StoreResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(bind_values), parse_notification_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn add_notification(&self, notification: &NewNotification) -> StoreResult<NotificationId> {
        self.conn
            .execute(
                "INSERT INTO notifications (
                    client_id,
                    appointment_id,
                    message_type,
                    status,
                    whatsapp_message_id,
                    template_used
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    notification.client_id,
                    notification.appointment_id,
                    notification.message_type.as_str(),
                    notification.status.as_str(),
                    notification.provider_message_id.as_deref(),
                    notification.template_used.as_deref(),
                ],
            )
            .map_err(classify_write_error)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTIFICATION_SELECT_SQL} WHERE id = ?1;"))?;
        let notification = stmt.query_row([id], parse_notification_row).optional()?;
        Ok(notification)
    }

    fn update_notification_response(
        &self,
        id: NotificationId,
        response: &str,
        response_at: Option<&str>,
    ) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE notifications
                 SET
                    response = ?1,
                    response_at = COALESCE(?2, CURRENT_TIMESTAMP),
                    status = ?3
                 WHERE id = ?4;",
                params![response, response_at, RESPONDED_STATUS, id],
            )
            .map_err(classify_write_error)?;
        Ok(changed > 0)
    }

    fn get_notifications_by_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> StoreResult<Vec<Notification>> {
        self.query_notifications(
            &format!("{NOTIFICATION_SELECT_SQL} WHERE appointment_id = ?{NOTIFICATION_ORDER_SQL};"),
            vec![Value::Integer(appointment_id)],
        )
    }

    fn get_notifications_by_client(
        &self,
        client_id: ClientId,
        window: &NotificationWindow,
    ) -> StoreResult<Vec<Notification>> {
        let mut sql = format!("{NOTIFICATION_SELECT_SQL} WHERE client_id = ?");
        let mut bind_values = vec![Value::Integer(client_id)];

        if let Some((start, end)) = window.bounds() {
            sql.push_str(" AND sent_at BETWEEN ? AND ?");
            bind_values.push(Value::Text(start.to_string()));
            bind_values.push(Value::Text(end.to_string()));
        }

        sql.push_str(NOTIFICATION_ORDER_SQL);
        sql.push(';');
        self.query_notifications(&sql, bind_values)
    }
}

fn parse_notification_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get("id")?,
        client_id: row.get("client_id")?,
        appointment_id: row.get("appointment_id")?,
        message_type: row.get("message_type")?,
        status: row.get("status")?,
        provider_message_id: row.get("whatsapp_message_id")?,
        response: row.get("response")?,
        sent_at: text_column(row, "sent_at")?,
        response_at: optional_text_column(row, "response_at")?,
        template_used: row.get("template_used")?,
    })
}
