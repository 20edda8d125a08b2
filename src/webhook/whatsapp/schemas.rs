//! # WhatsApp Webhook Schemas
//!
//! Data structures for the payloads WhatsApp Business API posts to the webhook.
//! Every nested field is optional: a delivery without `changes`, `value` or
//! `messages` is a no-op, never a parsing fault.

use crate::{consts, errors::WebhookError};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

/// Root webhook payload from WhatsApp
#[derive(Debug, Deserialize, Serialize)]
pub struct WebhookPayload {
    /// The object type, typically "whatsapp_business_account". Any truthy
    /// value is accepted, see [`parse_webhook_payload`].
    pub object: serde_json::Value,
    /// Array of entry objects containing the actual data
    pub entry: Vec<Entry>,
}

/// Entry object containing changes
#[derive(Debug, Deserialize, Serialize)]
pub struct Entry {
    /// Business Account ID
    #[serde(default)]
    pub id: Option<String>,
    /// Array of changes that occurred
    #[serde(default)]
    pub changes: Vec<Change>,
}

/// Change object containing the actual webhook data
#[derive(Debug, Deserialize, Serialize)]
pub struct Change {
    /// The field that changed (e.g., "messages")
    #[serde(default)]
    pub field: Option<String>,
    /// The value containing the actual data
    #[serde(default)]
    pub value: Option<Value>,
}

/// Value object containing messages and metadata
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Vec<Contact>>,
    /// Array of messages received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
    /// Array of statuses (for sent messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<Status>>,
}

/// Metadata about the WhatsApp Business phone number
#[derive(Debug, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(default)]
    pub display_phone_number: Option<String>,
    #[serde(default)]
    pub phone_number_id: Option<String>,
}

/// Contact information for the message sender
#[derive(Debug, Deserialize, Serialize)]
pub struct Contact {
    #[serde(default)]
    pub profile: Option<Profile>,
    /// WhatsApp ID (phone number)
    #[serde(default)]
    pub wa_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
}

/// Deserializes `T` if the value has the expected shape, `None` otherwise.
///
/// Message fields use it so one malformed message is skipped by the handler
/// instead of failing the whole delivery.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// Message object
#[derive(Debug, Deserialize, Serialize)]
pub struct Message {
    /// Sender's WhatsApp ID (phone number)
    #[serde(default, deserialize_with = "lenient")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<String>,
    /// Message type (text, image, video, document, etc.)
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub msg_type: Option<String>,
    /// Text message content (if type is "text")
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<TextMessage>,
}

impl Message {
    /// Sender and body of a text message, `None` for any other message or
    /// for a text message missing either part
    pub fn as_text(&self) -> Option<(&str, &str)> {
        if self.msg_type.as_deref() != Some(consts::TEXT_MESSAGE_TYPE) {
            return None;
        }

        let from = self.from.as_deref()?;
        let body = self.text.as_ref()?.body.as_deref()?;

        Some((from, body))
    }
}

/// Text message content
#[derive(Debug, Deserialize, Serialize)]
pub struct TextMessage {
    /// The text body of the message
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
}

/// Status update for sent messages
#[derive(Debug, Deserialize, Serialize)]
pub struct Status {
    #[serde(default)]
    pub id: Option<String>,
    /// Status (sent, delivered, read, failed)
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub recipient_id: Option<String>,
}

/// JSON truthiness of the top-level `object` key
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

/// Parses a raw webhook body.
///
/// # Errors
/// - [`WebhookError::InvalidJson`] if the body is not JSON
/// - [`WebhookError::NotWhatsAppEvent`] if `object` is missing/empty or `entry` is missing
/// - [`WebhookError::Internal`] if the keys exist but the nested shape is wrong
pub fn parse_webhook_payload(body: &[u8]) -> Result<WebhookPayload, WebhookError> {
    let raw: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidJson(e.to_string()))?;

    let is_whatsapp_event =
        raw.get("object").is_some_and(is_truthy) && raw.get("entry").is_some();
    if !is_whatsapp_event {
        return Err(WebhookError::NotWhatsAppEvent);
    }

    serde_json::from_value(raw).map_err(|e| WebhookError::Internal(e.to_string()))
}
