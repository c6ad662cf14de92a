//! Notification records and response window filters.
//!
//! # Invariants
//! - The only status transition is to [`RESPONDED_STATUS`], via response recording.
//! - `sent_at` defaults to store time at insert.

use super::appointment::AppointmentId;
use super::client::ClientId;
use serde::Serialize;

pub type NotificationId = i64;

/// Status forced by response recording.
pub const RESPONDED_STATUS: &str = "responded";

/// Outbound message and its optional inbound response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub client_id: ClientId,
    pub appointment_id: Option<AppointmentId>,
    /// Free-form kind, e.g. `reminder`.
    pub message_type: String,
    /// Free-form status, e.g. `sent` or `responded`.
    pub status: String,
    pub provider_message_id: Option<String>,
    pub response: Option<String>,
    pub sent_at: String,
    pub response_at: Option<String>,
    pub template_used: Option<String>,
}

impl Notification {
    pub fn is_responded(&self) -> bool {
        self.status == RESPONDED_STATUS
    }
}

/// Input for recording an outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub client_id: ClientId,
    pub appointment_id: Option<AppointmentId>,
    pub message_type: String,
    pub status: String,
    pub provider_message_id: Option<String>,
    pub template_used: Option<String>,
}

impl NewNotification {
    /// Creates an input with no provider id and no template.
    pub fn new(
        client_id: ClientId,
        appointment_id: Option<AppointmentId>,
        message_type: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            client_id,
            appointment_id,
            message_type: message_type.into(),
            status: status.into(),
            provider_message_id: None,
            template_used: None,
        }
    }

    pub fn with_provider_message_id(mut self, id: impl Into<String>) -> Self {
        self.provider_message_id = Some(id.into());
        self
    }

    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.template_used = Some(name.into());
        self
    }
}

/// Optional `sent_at` window for client notification listing.
///
/// The window only filters when both bounds are set. Bounds are inclusive
/// and compared as text against stored `sent_at` values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl NotificationWindow {
    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Returns both bounds when the window is active.
    pub fn bounds(&self) -> Option<(&str, &str)> {
        match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationWindow;

    #[test]
    fn window_requires_both_bounds() {
        assert_eq!(NotificationWindow::default().bounds(), None);
        let start_only = NotificationWindow {
            start: Some("2025-05-01".to_string()),
            end: None,
        };
        assert_eq!(start_only.bounds(), None);
        assert_eq!(
            NotificationWindow::between("a", "b").bounds(),
            Some(("a", "b"))
        );
    }
}
