//! # Chat Completion Client
//!
//! Client for an OpenAI compatible `/chat/completions` endpoint. Every request
//! carries one system turn and one user turn with fixed generation parameters.

use crate::{config::AppConfig, consts, utils};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat message sent to the completion API
#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    /// "system" or "user"
    pub role: &'a str,
    pub content: &'a str,
}

/// Request body for `/chat/completions`
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Builds a request with the system instructions followed by the user text
    pub fn new(model: &'a str, system_prompt: &'a str, user_text: &'a str) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            max_tokens: consts::COMPLETION_MAX_TOKENS,
            temperature: consts::COMPLETION_TEMPERATURE,
        }
    }
}

/// Response body from `/chat/completions`, only the fields we read
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Trimmed content of the first choice, `None` if missing or blank
    pub fn reply_text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToString::to_string)
    }
}

/// Completion API client
#[derive(Clone)]
pub struct OpenAIClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAIClient {
    /// Creates a new completion client from the application configuration
    pub fn new(app_config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: utils::build_http_client(app_config.http_timeout())?,
            endpoint: app_config.openai_chat_completions_endpoint(),
            api_key: app_config.openai_api_key.clone(),
            model: app_config.openai_model.clone(),
        })
    }
}

#[async_trait]
impl crate::services::CompletionService for OpenAIClient {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String> {
        let request = ChatCompletionRequest::new(&self.model, system_prompt, user_text);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to completion API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = utils::read_error_body(response).await;

            anyhow::bail!("Completion API returned error status {}: {}", status, body);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse completion API response")?;

        completion
            .reply_text()
            .context("Completion API response has no usable choice")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CompletionService;
    use ntex::web::{self, App, HttpRequest, HttpResponse, test};
    use serde_json::json;

    /// Local stand-in for the completion API, one base path per behaviour
    fn completion_api() -> test::TestServer {
        test::server(|| {
            App::new()
                .route(
                    "/ok/chat/completions",
                    web::post().to(|req: HttpRequest| async move {
                        let authorized = req
                            .headers()
                            .get("authorization")
                            .is_some_and(|value| value.as_bytes() == b"Bearer sk-test");
                        if !authorized {
                            return HttpResponse::Unauthorized().finish();
                        }
                        HttpResponse::Ok().json(&json!({
                            "choices": [{"message": {"role": "assistant", "content": " Hi there! "}}]
                        }))
                    }),
                )
                .route(
                    "/failing/chat/completions",
                    web::post().to(|| async {
                        HttpResponse::InternalServerError().body("upstream exploded")
                    }),
                )
                .route(
                    "/garbage/chat/completions",
                    web::post().to(|| async {
                        HttpResponse::Ok().content_type("text/html").body("<html>oops</html>")
                    }),
                )
                .route(
                    "/empty/chat/completions",
                    web::post().to(|| async { HttpResponse::Ok().json(&json!({"choices": []})) }),
                )
        })
    }

    fn client_for(api_base: String) -> OpenAIClient {
        OpenAIClient::new(&AppConfig {
            openai_api_base: api_base,
            ..AppConfig::for_tests()
        })
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatCompletionRequest::new("gpt-3.5-turbo", "be nice", "hi");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "be nice"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 200,
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn test_reply_text_is_trimmed() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "\n  Hi there! 😊 How can I help?  \n"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();

        assert_eq!(
            response.reply_text().as_deref(),
            Some("Hi there! 😊 How can I help?")
        );
    }

    #[test]
    fn test_reply_text_missing_or_blank() {
        let no_choices: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(no_choices.reply_text().is_none());

        let null_content: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert!(null_content.reply_text().is_none());

        let blank_content: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "   "}}]
        }))
        .unwrap();
        assert!(blank_content.reply_text().is_none());
    }

    #[test]
    fn test_client_uses_configured_endpoint_and_model() {
        let client = OpenAIClient::new(&AppConfig::for_tests()).unwrap();

        assert_eq!(client.endpoint, "https://api.openai.com/v1/chat/completions");
        assert_eq!(client.model, "gpt-3.5-turbo");
    }

    #[ntex::test]
    async fn test_complete_returns_trimmed_reply() {
        let srv = completion_api();
        let client = client_for(format!("http://{}/ok", srv.addr()));

        let reply = client.complete("be nice", "hi").await.unwrap();

        assert_eq!(reply, "Hi there!");
    }

    #[ntex::test]
    async fn test_complete_error_status_carries_status_and_body() {
        let srv = completion_api();
        let client = client_for(format!("http://{}/failing", srv.addr()));

        let err = client.complete("be nice", "hi").await.unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("500"), "{message}");
        assert!(message.contains("upstream exploded"), "{message}");
    }

    #[ntex::test]
    async fn test_complete_rejects_malformed_body() {
        let srv = completion_api();
        let client = client_for(format!("http://{}/garbage", srv.addr()));

        let err = client.complete("be nice", "hi").await.unwrap_err();

        assert!(format!("{err:#}").contains("Failed to parse completion API response"));
    }

    #[ntex::test]
    async fn test_complete_without_choices_is_failure() {
        let srv = completion_api();
        let client = client_for(format!("http://{}/empty", srv.addr()));

        let err = client.complete("be nice", "hi").await.unwrap_err();

        assert!(format!("{err:#}").contains("no usable choice"));
    }

    #[ntex::test]
    async fn test_complete_transport_failure() {
        // nothing listens on port 1
        let client = client_for("http://127.0.0.1:1/v1".to_string());

        let err = client.complete("be nice", "hi").await.unwrap_err();

        assert!(format!("{err:#}").contains("Failed to send request to completion API"));
    }
}
