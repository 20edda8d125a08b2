//! # WhatsApp Webhook Handler
//!
//! Walks a parsed webhook payload and relays every text message to the
//! responder, in arrival order and one at a time.

use super::schemas::{Message, Status, WebhookPayload};
use crate::{
    api::responder,
    metric,
    services::{ImplCompletionService, ImplMessagingService},
};

/// Outcome of processing one webhook payload
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WebhookSummary {
    /// Text messages relayed to the responder
    pub handled: usize,
    /// Messages ignored (unsupported type or incomplete text message)
    pub skipped: usize,
    /// Delivery status updates seen
    pub statuses: usize,
}

/// Collects all messages of the payload, across every entry and change
pub fn process_webhook_messages(payload: &WebhookPayload) -> Vec<&Message> {
    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .filter_map(|change| change.value.as_ref())
        .filter_map(|value| value.messages.as_ref())
        .flatten()
        .collect::<Vec<_>>()
}

/// Collects all status updates of the payload
pub fn process_webhook_statuses(payload: &WebhookPayload) -> Vec<&Status> {
    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .filter_map(|change| change.value.as_ref())
        .filter_map(|value| value.statuses.as_ref())
        .flatten()
        .collect::<Vec<_>>()
}

/// Handles one incoming message.
///
/// # Returns
/// `true` if the message was relayed, `false` if it was skipped
pub async fn handle_user_message(
    message: &Message,
    completion_service: &ImplCompletionService,
    messaging_service: &ImplMessagingService,
) -> bool {
    metric::incr_message_type_statds(message.msg_type.as_deref());

    let Some((sender, body)) = message.as_text() else {
        logfire::warn!(
            "Received unsupported message type: {type}",
            r#type = message.msg_type.clone().unwrap_or_default()
        );
        return false;
    };

    logfire::info!(
        "Received text message {id}",
        id = message.id.clone().unwrap_or_default()
    );
    responder::generate_and_send(sender, body, completion_service, messaging_service).await;

    true
}

fn handle_message_status(status: &Status) {
    logfire::debug!(
        "Message {id} is {status}",
        id = status.id.clone().unwrap_or_default(),
        status = status.status.clone().unwrap_or_default()
    );
}

/// Main webhook processor
///
/// Text messages are relayed sequentially, a slow completion delays the
/// following messages of the same payload. Outbound failures are absorbed by
/// the responder so this never fails once the payload is parsed.
pub async fn process_webhook(
    payload: &WebhookPayload,
    completion_service: &ImplCompletionService,
    messaging_service: &ImplMessagingService,
) -> WebhookSummary {
    let mut summary = WebhookSummary::default();

    for message in process_webhook_messages(payload) {
        if handle_user_message(message, completion_service, messaging_service).await {
            summary.handled += 1;
        } else {
            summary.skipped += 1;
        }
    }

    for status in process_webhook_statuses(payload) {
        handle_message_status(status);
        summary.statuses += 1;
    }

    summary
}
