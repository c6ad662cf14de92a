//! Message template list and its persisted text encoding.
//!
//! # Responsibility
//! - Define the structured template list carried by a client.
//! - Own the only encode/decode boundary between that list and stored text.
//!
//! # Invariants
//! - `decode_templates(encode_templates(list)) == list` for any list.
//! - Fields other than `name` survive the round trip untouched.
//! - Stored lists may hold bare strings; each decodes as a name-only template.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One named outbound message template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTemplate")]
pub struct MessageTemplate {
    /// Template name referenced by `Notification::template_used`.
    pub name: String,
    /// Provider-specific attributes (content sid, language, variables...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl MessageTemplate {
    /// Creates a template with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Map::new(),
        }
    }

    /// Adds one provider attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Stored shape of one list entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTemplate {
    Named(String),
    Fields(Map<String, Value>),
}

impl From<StoredTemplate> for MessageTemplate {
    fn from(value: StoredTemplate) -> Self {
        match value {
            StoredTemplate::Named(name) => Self::named(name),
            StoredTemplate::Fields(mut attributes) => {
                let name = match attributes.remove("name") {
                    Some(Value::String(name)) => name,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                Self { name, attributes }
            }
        }
    }
}

/// Template payload accepted on client write paths.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatesInput {
    /// Structured list, encoded before storage.
    List(Vec<MessageTemplate>),
    /// Already-encoded text, stored verbatim.
    Encoded(String),
}

impl TemplatesInput {
    /// Returns the text to persist.
    pub fn into_stored_text(self) -> Result<String, TemplateCodecError> {
        match self {
            Self::List(templates) => encode_templates(&templates),
            Self::Encoded(text) => Ok(text),
        }
    }
}

impl From<Vec<MessageTemplate>> for TemplatesInput {
    fn from(value: Vec<MessageTemplate>) -> Self {
        Self::List(value)
    }
}

impl From<String> for TemplatesInput {
    fn from(value: String) -> Self {
        Self::Encoded(value)
    }
}

impl From<&str> for TemplatesInput {
    fn from(value: &str) -> Self {
        Self::Encoded(value.to_string())
    }
}

/// Template text could not be encoded or decoded.
#[derive(Debug)]
pub struct TemplateCodecError(serde_json::Error);

impl Display for TemplateCodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid template list: {}", self.0)
    }
}

impl Error for TemplateCodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Encodes a template list to its stored JSON text.
pub fn encode_templates(templates: &[MessageTemplate]) -> Result<String, TemplateCodecError> {
    serde_json::to_string(templates).map_err(TemplateCodecError)
}

/// Decodes stored JSON text back to a template list.
pub fn decode_templates(text: &str) -> Result<Vec<MessageTemplate>, TemplateCodecError> {
    serde_json::from_str(text).map_err(TemplateCodecError)
}
