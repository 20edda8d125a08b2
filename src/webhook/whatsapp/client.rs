//! # WhatsApp API Client
//!
//! This module provides a client for sending messages to WhatsApp Business API.

use super::outgoing_schemas::{OutgoingTextMessage, WhatsAppMessageResponse};
use crate::{config::AppConfig, utils};
use anyhow::{Context, Result};
use async_trait::async_trait;

/// WhatsApp API client for sending messages
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// WhatsApp Business API endpoint for sending messages
    endpoint: String,
    /// Authentication token
    auth_token: String,
}

impl WhatsAppClient {
    /// Creates a new WhatsApp client
    pub fn new(app_config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: utils::build_http_client(app_config.http_timeout())?,
            endpoint: app_config.whatsapp_send_msg_endpoint(),
            auth_token: app_config.whatsapp_business_auth.clone(),
        })
    }

    /// Internal method to send any message type to WhatsApp API
    async fn send_message<T: serde::Serialize + Sync>(
        &self,
        message: &T,
    ) -> Result<WhatsAppMessageResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.auth_token)
            .json(message)
            .send()
            .await
            .context("Failed to send request to WhatsApp API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = utils::read_error_body(response).await;

            anyhow::bail!("WhatsApp API returned error status {}: {}", status, body);
        }

        let whatsapp_response: WhatsAppMessageResponse = response
            .json()
            .await
            .context("Failed to parse WhatsApp API response")?;

        Ok(whatsapp_response)
    }
}

#[async_trait]
impl crate::services::MessagingService for WhatsAppClient {
    async fn send_text_message(&self, to: &str, body: &str) -> Result<WhatsAppMessageResponse> {
        let message = OutgoingTextMessage::new(to, body);
        self.send_message(&message).await
    }
}
