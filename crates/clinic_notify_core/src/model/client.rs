//! Client (tenant) records.
//!
//! # Invariants
//! - `business_id` and `internal_token` are unique across clients.
//! - Templates are always exposed as a decoded list on read.

use super::templates::{MessageTemplate, TemplatesInput};
use serde::Serialize;
use uuid::Uuid;

/// Surrogate id of a stored client.
pub type ClientId = i64;

/// Client record as read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// Tax/registration number (CNPJ).
    pub business_id: String,
    pub internal_token: String,
    pub provider_account_id: String,
    pub provider_auth_secret: String,
    pub provider_sender_address: String,
    pub templates: Vec<MessageTemplate>,
    pub created_at: String,
}

/// Input for creating a client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub business_id: String,
    pub internal_token: String,
    pub provider_account_id: String,
    pub provider_auth_secret: String,
    pub provider_sender_address: String,
    pub templates: TemplatesInput,
}

/// Partial update for a client. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub business_id: Option<String>,
    pub internal_token: Option<String>,
    pub provider_account_id: Option<String>,
    pub provider_auth_secret: Option<String>,
    pub provider_sender_address: Option<String>,
    pub templates: Option<TemplatesInput>,
}

impl ClientPatch {
    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.business_id.is_none()
            && self.internal_token.is_none()
            && self.provider_account_id.is_none()
            && self.provider_auth_secret.is_none()
            && self.provider_sender_address.is_none()
            && self.templates.is_none()
    }
}

/// Generates a fresh random internal access token.
pub fn generate_internal_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::{generate_internal_token, ClientPatch};

    #[test]
    fn default_patch_is_empty() {
        assert!(ClientPatch::default().is_empty());
        let patch = ClientPatch {
            provider_sender_address: Some("whatsapp:+5511000000000".to_string()),
            ..ClientPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn generated_tokens_are_distinct() {
        let first = generate_internal_token();
        let second = generate_internal_token();
        assert_eq!(first.len(), 32);
        assert_ne!(first, second);
    }
}
