//! Appointment records.

use super::client::ClientId;
use serde::Serialize;

pub type AppointmentId = i64;

/// Scheduled patient visit belonging to one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub client_id: ClientId,
    /// Patient name.
    pub name: String,
    pub phone: String,
    /// Patient document (CPF).
    pub document_id: String,
    /// Stored verbatim, conventionally `YYYY-MM-DD`.
    pub date: String,
    /// Stored verbatim, conventionally `HH:MM`.
    pub time: String,
    pub consultation_type: String,
    pub notification_sent: bool,
    pub created_at: String,
}

/// Input for scheduling an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub client_id: ClientId,
    pub name: String,
    pub phone: String,
    pub document_id: String,
    pub date: String,
    pub time: String,
    pub consultation_type: String,
}

/// Equality filters for appointment lookups.
///
/// Unset, empty and zero values do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub client_id: Option<ClientId>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notification_sent: Option<bool>,
}

impl AppointmentFilter {
    /// Appointments on `date` that have not been notified yet.
    pub fn pending_on(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            notification_sent: Some(false),
            ..Self::default()
        }
    }
}
