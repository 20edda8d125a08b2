pub mod openai;

use crate::webhook::whatsapp::outgoing_schemas::WhatsAppMessageResponse;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generates a reply for `user_text` given the `system_prompt` instructions.
    /// The returned text is already trimmed and never empty.
    async fn complete(&self, system_prompt: &str, user_text: &str) -> anyhow::Result<String>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingService: Send + Sync {
    /// Sends a plain text message to a WhatsApp user. A single attempt is made.
    async fn send_text_message(
        &self,
        to: &str,
        body: &str,
    ) -> anyhow::Result<WhatsAppMessageResponse>;
}

pub type ImplCompletionService = Box<dyn CompletionService>;
pub type ImplMessagingService = Box<dyn MessagingService>;
