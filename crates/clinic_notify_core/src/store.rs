//! Data store facade over client, appointment and notification repositories.
//!
//! # Responsibility
//! - Bootstrap the schema once at construction.
//! - Acquire one connection per operation and release it on every exit path.
//! - Emit metadata-only `store_op` events for each call.
//!
//! # Invariants
//! - No connection, cache or lock outlives a single operation.
//! - Concurrency guarantees are exactly SQLite's; nothing is layered on top.
//! - Log events never include tokens, secrets or patient fields.

use crate::config::StoreConfig;
use crate::db::{open_connection, open_db};
use crate::model::appointment::{
    Appointment, AppointmentFilter, AppointmentId, NewAppointment,
};
use crate::model::client::{Client, ClientId, ClientPatch, NewClient};
use crate::model::notification::{
    NewNotification, Notification, NotificationId, NotificationWindow,
};
use crate::repo::appointment_repo::{AppointmentRepository, SqliteAppointmentRepository};
use crate::repo::client_repo::{ClientRepository, SqliteClientRepository};
use crate::repo::notification_repo::{NotificationRepository, SqliteNotificationRepository};
use crate::repo::{StoreError, StoreResult};
use log::{debug, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Synchronous store for clinic notification data.
///
/// Cloning is cheap: the store only carries configuration.
#[derive(Debug, Clone)]
pub struct DataStore {
    config: StoreConfig,
}

impl DataStore {
    /// Opens the store, creating any missing tables.
    ///
    /// Existing tables are used as they are, even when their columns differ.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        drop(open_db(&config)?);
        Ok(Self { config })
    }

    /// Opens the store at `path` with default settings.
    pub fn open_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open(StoreConfig::new(path))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Runs `op` on a freshly opened connection, dropping it before return.
    fn with_connection<T>(
        &self,
        op_name: &'static str,
        op: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let result = open_connection(&self.config)
            .map_err(StoreError::from)
            .and_then(|conn| op(&conn));

        match &result {
            Ok(_) => debug!(
                "event=store_op module=store op={} status=ok duration_ms={}",
                op_name,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=store_op module=store op={} status=error duration_ms={} error_code={}",
                op_name,
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }

    pub fn create_client(&self, client: NewClient) -> StoreResult<ClientId> {
        self.with_connection("create_client", |conn| {
            SqliteClientRepository::new(conn).create_client(client)
        })
    }

    pub fn get_client_by_id(&self, id: ClientId) -> StoreResult<Option<Client>> {
        self.with_connection("get_client_by_id", |conn| {
            SqliteClientRepository::new(conn).get_client_by_id(id)
        })
    }

    pub fn get_client_by_token(&self, token: &str) -> StoreResult<Option<Client>> {
        self.with_connection("get_client_by_token", |conn| {
            SqliteClientRepository::new(conn).get_client_by_token(token)
        })
    }

    /// Applies the set fields of `patch`.
    ///
    /// Returns `Ok(false)` without opening a connection when the patch is empty,
    /// otherwise whether a client with `id` was updated.
    pub fn update_client(&self, id: ClientId, patch: ClientPatch) -> StoreResult<bool> {
        if patch.is_empty() {
            debug!("event=store_op module=store op=update_client status=noop");
            return Ok(false);
        }
        self.with_connection("update_client", |conn| {
            SqliteClientRepository::new(conn).update_client(id, patch)
        })
    }

    /// Deletes a client. Appointments and notifications referencing it are kept.
    pub fn delete_client(&self, id: ClientId) -> StoreResult<bool> {
        self.with_connection("delete_client", |conn| {
            SqliteClientRepository::new(conn).delete_client(id)
        })
    }

    pub fn add_appointment(&self, appointment: &NewAppointment) -> StoreResult<AppointmentId> {
        self.with_connection("add_appointment", |conn| {
            SqliteAppointmentRepository::new(conn).add_appointment(appointment)
        })
    }

    pub fn get_appointment(&self, id: AppointmentId) -> StoreResult<Option<Appointment>> {
        self.with_connection("get_appointment", |conn| {
            SqliteAppointmentRepository::new(conn).get_appointment(id)
        })
    }

    pub fn get_appointments_by_client(&self, client_id: ClientId) -> StoreResult<Vec<Appointment>> {
        self.with_connection("get_appointments_by_client", |conn| {
            SqliteAppointmentRepository::new(conn).get_appointments_by_client(client_id)
        })
    }

    /// Lists all appointments, or one client's when `client_id` is non-zero.
    pub fn get_all_appointments(&self, client_id: Option<ClientId>) -> StoreResult<Vec<Appointment>> {
        self.with_connection("get_all_appointments", |conn| {
            SqliteAppointmentRepository::new(conn).get_all_appointments(client_id)
        })
    }

    /// Lists appointments matching every set field of `filter`.
    pub fn find_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        self.with_connection("find_appointments", |conn| {
            SqliteAppointmentRepository::new(conn).find_appointments(filter)
        })
    }

    /// Sets the appointment's `notification_sent` flag.
    ///
    /// Recording a notification does not do this implicitly; senders call it
    /// once delivery is confirmed.
    pub fn mark_appointment_notified(&self, id: AppointmentId) -> StoreResult<bool> {
        self.with_connection("mark_appointment_notified", |conn| {
            SqliteAppointmentRepository::new(conn).mark_appointment_notified(id)
        })
    }

    pub fn delete_appointment(&self, id: AppointmentId) -> StoreResult<bool> {
        self.with_connection("delete_appointment", |conn| {
            SqliteAppointmentRepository::new(conn).delete_appointment(id)
        })
    }

    pub fn add_notification(&self, notification: &NewNotification) -> StoreResult<NotificationId> {
        self.with_connection("add_notification", |conn| {
            SqliteNotificationRepository::new(conn).add_notification(notification)
        })
    }

    pub fn get_notification(&self, id: NotificationId) -> StoreResult<Option<Notification>> {
        self.with_connection("get_notification", |conn| {
            SqliteNotificationRepository::new(conn).get_notification(id)
        })
    }

    /// Records an inbound response and marks the notification `responded`.
    ///
    /// Returns `Ok(false)` for an unknown id. Repeated calls overwrite.
    pub fn update_notification_response(
        &self,
        id: NotificationId,
        response: &str,
        response_at: Option<&str>,
    ) -> StoreResult<bool> {
        self.with_connection("update_notification_response", |conn| {
            SqliteNotificationRepository::new(conn).update_notification_response(
                id,
                response,
                response_at,
            )
        })
    }

    /// Lists an appointment's notifications, most recently sent first.
    pub fn get_notifications_by_appointment(
        &self,
        appointment_id: AppointmentId,
    ) -> StoreResult<Vec<Notification>> {
        self.with_connection("get_notifications_by_appointment", |conn| {
            SqliteNotificationRepository::new(conn).get_notifications_by_appointment(appointment_id)
        })
    }

    /// Lists a client's notifications, most recently sent first.
    pub fn get_notifications_by_client(
        &self,
        client_id: ClientId,
        window: &NotificationWindow,
    ) -> StoreResult<Vec<Notification>> {
        self.with_connection("get_notifications_by_client", |conn| {
            SqliteNotificationRepository::new(conn).get_notifications_by_client(client_id, window)
        })
    }
}
