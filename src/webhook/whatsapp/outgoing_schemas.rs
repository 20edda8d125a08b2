//! # WhatsApp Outgoing Message Schemas
//!
//! JSON payloads sent to the WhatsApp Business API and the acknowledgement it
//! returns.

use crate::consts;
use serde::{Deserialize, Serialize};

/// Text message to send to WhatsApp
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTextMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    /// Recipient's WhatsApp ID (phone number)
    pub to: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    pub text: OutgoingTextContent,
}

impl OutgoingTextMessage {
    /// Creates a new text message
    pub fn new(to: &str, body: &str) -> Self {
        Self {
            messaging_product: consts::MESSAGING_PRODUCT.to_string(),
            to: to.to_string(),
            msg_type: consts::TEXT_MESSAGE_TYPE.to_string(),
            text: OutgoingTextContent {
                body: body.to_string(),
            },
        }
    }
}

/// Text content for outgoing messages
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTextContent {
    pub body: String,
}

/// Response from WhatsApp API when sending a message
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppMessageResponse {
    #[serde(default)]
    pub messaging_product: String,
    /// Array of contacts (recipients)
    #[serde(default)]
    pub contacts: Vec<WhatsAppContact>,
    /// Array of messages sent
    #[serde(default)]
    pub messages: Vec<WhatsAppMessageStatus>,
}

impl WhatsAppMessageResponse {
    /// ID WhatsApp assigned to the first sent message
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|message| message.id.as_str())
    }
}

/// Contact information in response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppContact {
    /// WhatsApp ID of the contact
    pub wa_id: String,
    /// Input phone number
    pub input: String,
}

/// Message status in response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatsAppMessageStatus {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outgoing_text_message_body() {
        let message = OutgoingTextMessage::new("15551234567", "Hi there! 😊 How can I help?");

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "messaging_product": "whatsapp",
                "to": "15551234567",
                "type": "text",
                "text": {"body": "Hi there! 😊 How can I help?"}
            })
        );
    }

    #[test]
    fn test_send_response() {
        let response: WhatsAppMessageResponse = serde_json::from_value(json!({
            "messaging_product": "whatsapp",
            "contacts": [{"input": "15551234567", "wa_id": "15551234567"}],
            "messages": [{"id": "wamid.HBgLMTU1NTEyMzQ1NjcVAgARGBI5QTNDQTVCM0Q0Q0Q2RTY3RTcA"}]
        }))
        .unwrap();

        assert_eq!(
            response.message_id(),
            Some("wamid.HBgLMTU1NTEyMzQ1NjcVAgARGBI5QTNDQTVCM0Q0Q0Q2RTY3RTcA")
        );
        assert!(WhatsAppMessageResponse::default().message_id().is_none());
    }
}
