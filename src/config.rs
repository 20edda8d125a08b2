//! Application configuration management with security considerations.
//!
//! All values come from environment variables and are loaded once at startup
//! into an immutable [`AppConfig`]. The record is then shared through the
//! application state, nothing reads the environment after boot.
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged
//! - `VERIFY_TOKEN` has no default: startup fails when it is missing or empty

use anyhow::{Context, bail};
use envconfig::Envconfig;
use std::time::Duration;

/// Application configuration with security-aware field management.
///
/// # Security Requirements
/// - All `SENSITIVE` fields must be provided by a secret manager in production
/// - Never log or expose sensitive values
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(from = "APP_ENV", default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(from = "PORT", default = "5000")]
    pub web_server_port: u16,

    /// 🔒 SENSITIVE: completion API key
    #[envconfig(from = "OPENAI_API_KEY")]
    pub openai_api_key: String,

    /// Base URL of the OpenAI compatible completion API (NON-SENSITIVE)
    #[envconfig(from = "OPENAI_API_BASE", default = "https://api.openai.com/v1")]
    pub openai_api_base: String,

    /// Model used for every completion (NON-SENSITIVE)
    #[envconfig(from = "OPENAI_MODEL", default = "gpt-3.5-turbo")]
    pub openai_model: String,

    /// 🔒 SENSITIVE: WhatsApp Business authentication token
    #[envconfig(from = "WHATSAPP_TOKEN")]
    pub whatsapp_business_auth: String,

    /// WhatsApp Business phone number ID (SEMI-SENSITIVE)
    /// Security: Restrict access, don't log in production
    #[envconfig(from = "WHATSAPP_PHONE_NUMBER_ID")]
    pub whatsapp_business_phone_number_id: String,

    /// Graph API base including the version segment (NON-SENSITIVE)
    #[envconfig(
        from = "WHATSAPP_GRAPH_API_BASE",
        default = "https://graph.facebook.com/v17.0"
    )]
    pub whatsapp_graph_api_base: String,

    /// 🔒 SENSITIVE: shared secret echoed by the webhook verification handshake
    #[envconfig(from = "VERIFY_TOKEN")]
    pub whatsapp_verify_token: String,

    /// 🔒 SENSITIVE: Meta app secret. When set, every delivery must carry a
    /// valid `X-Hub-Signature-256` header.
    #[envconfig(from = "WHATSAPP_APP_SECRET")]
    pub whatsapp_app_secret: Option<String>,

    /// Timeout applied to every outbound HTTP request, in seconds
    #[envconfig(from = "HTTP_TIMEOUT_SECS", default = "20")]
    pub http_timeout_secs: u64,

    /// 🔒 SENSITIVE: Logfire write token, telemetry stays local when unset
    #[envconfig(from = "LOGFIRE_TOKEN")]
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Loads the configuration from the environment and validates it
    pub fn load() -> anyhow::Result<Self> {
        let app_config = Self::init_from_env()
            .context("failed to load application configuration from environment")?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Rejects empty secrets, envconfig only checks for presence
    pub fn validate(&self) -> anyhow::Result<()> {
        let required = [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("WHATSAPP_TOKEN", &self.whatsapp_business_auth),
            ("WHATSAPP_PHONE_NUMBER_ID", &self.whatsapp_business_phone_number_id),
            ("VERIFY_TOKEN", &self.whatsapp_verify_token),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                bail!("{name} must be set to a non-empty value");
            }
        }

        if self.http_timeout_secs == 0 {
            bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(())
    }

    /// Address the web server binds to
    pub fn server_addr(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }

    /// Timeout for outbound requests
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Constructs the WhatsApp Business API endpoint for sending messages
    pub fn whatsapp_send_msg_endpoint(&self) -> String {
        format!(
            "{base}/{id}/messages",
            base = self.whatsapp_graph_api_base.trim_end_matches('/'),
            id = self.whatsapp_business_phone_number_id
        )
    }

    /// Constructs the chat completion endpoint
    pub fn openai_chat_completions_endpoint(&self) -> String {
        format!(
            "{base}/chat/completions",
            base = self.openai_api_base.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
impl AppConfig {
    /// Configuration with dummy credentials for tests
    pub fn for_tests() -> Self {
        Self {
            env: "local".into(),
            web_server_host: "127.0.0.1".into(),
            web_server_port: 5000,
            openai_api_key: "sk-test".into(),
            openai_api_base: "https://api.openai.com/v1".into(),
            openai_model: "gpt-3.5-turbo".into(),
            whatsapp_business_auth: "wa-test-token".into(),
            whatsapp_business_phone_number_id: "1234567890".into(),
            whatsapp_graph_api_base: "https://graph.facebook.com/v17.0".into(),
            whatsapp_verify_token: "mySecretVerifyToken".into(),
            whatsapp_app_secret: None,
            http_timeout_secs: 20,
            logfire_token: None,
        }
    }
}
