//! Persistence layer for clinic appointment notifications.
//! Stores clients, their appointments and the WhatsApp notifications sent for them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::{Appointment, AppointmentFilter, AppointmentId, NewAppointment};
pub use model::client::{generate_internal_token, Client, ClientId, ClientPatch, NewClient};
pub use model::notification::{
    NewNotification, Notification, NotificationId, NotificationWindow, RESPONDED_STATUS,
};
pub use model::templates::{MessageTemplate, TemplatesInput};
pub use repo::appointment_repo::{AppointmentRepository, SqliteAppointmentRepository};
pub use repo::client_repo::{ClientRepository, SqliteClientRepository};
pub use repo::notification_repo::{NotificationRepository, SqliteNotificationRepository};
pub use repo::{StoreError, StoreResult};
pub use store::DataStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
