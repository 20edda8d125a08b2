use derive_more::{Display, Error};
use ntex::{http, web};
use serde_json::json;

/// Errors returned to the messaging platform by the HTTP endpoints
#[derive(Debug, Display, Error)]
pub enum WebhookError {
    #[display("Bad Request: Missing required parameters")]
    MissingParameters,
    #[display("Verification token mismatch")]
    VerificationFailed,
    #[display("Invalid webhook signature")]
    InvalidSignature,
    #[display("Invalid JSON payload: {_0}")]
    InvalidJson(#[error(not(source))] String),
    #[display("Not a WhatsApp API event")]
    NotWhatsAppEvent,
    #[display("not found")]
    NotFound,
    #[display("{_0}")]
    Internal(#[error(not(source))] String),
}

impl web::error::WebResponseError for WebhookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        match self {
            WebhookError::NotFound => {}
            WebhookError::Internal(msg) => {
                logfire::error!("Error processing webhook: {error}", error = msg.to_string());
            }
            _ => {
                logfire::warn!("Webhook request rejected: {error}", error = self.to_string());
            }
        }

        match self {
            // the verification handshake answers in plain text
            WebhookError::MissingParameters | WebhookError::VerificationFailed => {
                web::HttpResponse::build(self.status_code())
                    .content_type("text/plain")
                    .body(self.to_string())
            }
            _ => web::HttpResponse::build(self.status_code()).json(&json!({
                "status": "error",
                "message": self.to_string()
            })),
        }
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::MissingParameters | WebhookError::InvalidJson(_) => {
                http::StatusCode::BAD_REQUEST
            }
            WebhookError::VerificationFailed => http::StatusCode::FORBIDDEN,
            WebhookError::InvalidSignature => http::StatusCode::UNAUTHORIZED,
            WebhookError::NotWhatsAppEvent | WebhookError::NotFound => http::StatusCode::NOT_FOUND,
            WebhookError::Internal(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
