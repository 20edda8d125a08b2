//! Generates a reply for an inbound text and relays it back to the sender.
//!
//! Outbound failures never escape this module: a failed completion becomes
//! [`consts::FALLBACK_REPLY`] and a failed send is logged and dropped.

use crate::{
    consts, metric,
    services::{ImplCompletionService, ImplMessagingService},
    webhook::whatsapp::outgoing_schemas::WhatsAppMessageResponse,
};

/// Asks the completion service for a reply to `text`.
///
/// # Returns
/// The generated reply, or [`consts::FALLBACK_REPLY`] when the completion
/// call fails for any reason.
pub async fn generate_reply(completion_service: &ImplCompletionService, text: &str) -> String {
    match completion_service
        .complete(consts::SYSTEM_PROMPT, text)
        .await
    {
        Ok(reply) => {
            metric::incr_reply_statds("generated");
            reply
        }
        Err(e) => {
            logfire::error!("Error generating response: {error}", error = format!("{e:#}"));
            metric::incr_reply_statds("fallback");
            consts::FALLBACK_REPLY.to_string()
        }
    }
}

/// Sends `text` to `recipient` once.
///
/// # Returns
/// The send API acknowledgement, `None` if the message could not be delivered.
pub async fn send_reply(
    messaging_service: &ImplMessagingService,
    recipient: &str,
    text: &str,
) -> Option<WhatsAppMessageResponse> {
    match messaging_service.send_text_message(recipient, text).await {
        Ok(response) => {
            logfire::info!(
                "Reply sent as {message_id}",
                message_id = response.message_id().unwrap_or_default().to_string()
            );
            metric::incr_send_statds("sent");
            Some(response)
        }
        Err(e) => {
            logfire::error!(
                "Error sending WhatsApp message: {error}",
                error = format!("{e:#}")
            );
            metric::incr_send_statds("failed");
            None
        }
    }
}

/// Generates a reply for `text` and sends it to `sender`.
#[tracing::instrument(skip_all, fields(sender = %sender))]
pub async fn generate_and_send(
    sender: &str,
    text: &str,
    completion_service: &ImplCompletionService,
    messaging_service: &ImplMessagingService,
) -> Option<WhatsAppMessageResponse> {
    let reply = generate_reply(completion_service, text).await;
    send_reply(messaging_service, sender, &reply).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockCompletionService, MockMessagingService};
    use crate::webhook::whatsapp::outgoing_schemas::WhatsAppMessageStatus;
    use mockall::predicate::*;

    fn sent_response(id: &str) -> WhatsAppMessageResponse {
        WhatsAppMessageResponse {
            messaging_product: "whatsapp".to_string(),
            contacts: vec![],
            messages: vec![WhatsAppMessageStatus { id: id.to_string() }],
        }
    }

    #[ntex::test]
    async fn test_generate_and_send_relays_generated_reply() {
        let mut mock_completion = MockCompletionService::new();
        mock_completion
            .expect_complete()
            .with(eq(consts::SYSTEM_PROMPT), eq("hi"))
            .times(1)
            .returning(|_, _| Ok("Hi there! 😊 How can I help?".to_string()));
        let completion_service: ImplCompletionService = Box::new(mock_completion);

        let mut mock_messaging = MockMessagingService::new();
        mock_messaging
            .expect_send_text_message()
            .with(eq("15551234567"), eq("Hi there! 😊 How can I help?"))
            .times(1)
            .returning(|_, _| Ok(sent_response("wamid.1")));
        let messaging_service: ImplMessagingService = Box::new(mock_messaging);

        let result =
            generate_and_send("15551234567", "hi", &completion_service, &messaging_service).await;

        assert!(result.is_some_and(|r| r.message_id() == Some("wamid.1")));
    }

    #[ntex::test]
    async fn test_completion_failure_sends_fallback() {
        let mut mock_completion = MockCompletionService::new();
        mock_completion
            .expect_complete()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("operation timed out")));
        let completion_service: ImplCompletionService = Box::new(mock_completion);

        let mut mock_messaging = MockMessagingService::new();
        mock_messaging
            .expect_send_text_message()
            .with(
                eq("15551234567"),
                eq("Sorry, I encountered an error processing your message."),
            )
            .times(1)
            .returning(|_, _| Ok(sent_response("wamid.2")));
        let messaging_service: ImplMessagingService = Box::new(mock_messaging);

        let result =
            generate_and_send("15551234567", "hi", &completion_service, &messaging_service).await;

        assert!(result.is_some());
    }

    #[ntex::test]
    async fn test_send_failure_is_dropped() {
        let mut mock_completion = MockCompletionService::new();
        mock_completion
            .expect_complete()
            .times(1)
            .returning(|_, _| Ok("reply".to_string()));
        let completion_service: ImplCompletionService = Box::new(mock_completion);

        let mut mock_messaging = MockMessagingService::new();
        mock_messaging
            .expect_send_text_message()
            .times(1)
            .returning(|_, _| {
                Err(anyhow::anyhow!(
                    "WhatsApp API returned error status 401 Unauthorized: {{}}"
                ))
            });
        let messaging_service: ImplMessagingService = Box::new(mock_messaging);

        let result =
            generate_and_send("15551234567", "hi", &completion_service, &messaging_service).await;

        assert!(result.is_none());
    }

    #[ntex::test]
    async fn test_generate_reply_returns_completion() {
        let mut mock_completion = MockCompletionService::new();
        mock_completion
            .expect_complete()
            .with(always(), eq("What are your prices?"))
            .times(1)
            .returning(|_, _| Ok("60 min - $150".to_string()));
        let completion_service: ImplCompletionService = Box::new(mock_completion);

        let reply = generate_reply(&completion_service, "What are your prices?").await;

        assert_eq!(reply, "60 min - $150");
    }
}
