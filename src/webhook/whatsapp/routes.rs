//! WhatsApp webhook endpoint handlers
//!
//! This module handles incoming webhook requests from WhatsApp Business API.
//! It implements both the verification endpoint (GET) and the webhook receiver (POST).
//!
//! # Security
//!
//! When an app secret is configured, the POST endpoint rejects bodies whose
//! `X-Hub-Signature-256` header does not match.

use super::{handler, schemas, security};
use crate::{consts, errors::WebhookError, server::AppState};
use ntex::{util::Bytes, web};
use serde::Deserialize;

/// Query parameters for webhook verification, all optional so a missing one
/// maps to 400 instead of a query parsing error
#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    /// The mode parameter, should be "subscribe"
    #[serde(rename = "hub.mode", default)]
    pub mode: Option<String>,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token", default)]
    pub verify_token: Option<String>,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge", default)]
    pub challenge: Option<String>,
}

/// Checks a verification request against the configured token.
///
/// # Returns
/// - the challenge to echo back if `mode` is "subscribe" and the token matches
/// - [`WebhookError::MissingParameters`] if mode or token is missing or empty
/// - [`WebhookError::VerificationFailed`] otherwise
pub fn verify_subscription(query: &VerifyQuery, expected_token: &str) -> Result<String, WebhookError> {
    let mode = query.mode.as_deref().filter(|mode| !mode.is_empty());
    let token = query.verify_token.as_deref().filter(|token| !token.is_empty());

    let (Some(mode), Some(token)) = (mode, token) else {
        return Err(WebhookError::MissingParameters);
    };

    if mode != consts::SUBSCRIBE_MODE || !security::verify_token_matches(token, expected_token) {
        return Err(WebhookError::VerificationFailed);
    }

    Ok(query.challenge.clone().unwrap_or_default())
}

/// Webhook verification endpoint (GET)
///
/// # Returns
/// - 200 with challenge string if verification succeeds
/// - 400 if `hub.mode` or `hub.verify_token` is missing
/// - 403 if verification fails
#[web::get("/webhook")]
pub async fn verify(
    query: web::types::Query<VerifyQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let challenge = verify_subscription(&query, &app_state.config.whatsapp_verify_token)?;

    logfire::info!("WEBHOOK_VERIFIED");

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(challenge))
}

/// Webhook receiver endpoint (POST)
///
/// # Processing
///
/// The payload is processed synchronously before answering. Outbound failures
/// are absorbed, so once the payload is valid the answer is 200. A retry of
/// the same payload by WhatsApp relays its messages again.
#[web::post("/webhook")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let _span = logfire::span!("whatsapp_webhook").entered();

    if let Some(app_secret) = app_state.config.whatsapp_app_secret.as_deref() {
        let signature = req
            .headers()
            .get(consts::SIGNATURE_HEADER)
            .and_then(|header_value| header_value.to_str().ok())
            .ok_or(WebhookError::InvalidSignature)?;

        if !security::verify_signature(signature, &body, app_secret) {
            return Err(WebhookError::InvalidSignature.into());
        }
    }

    let payload = schemas::parse_webhook_payload(&body)?;

    let summary = handler::process_webhook(
        &payload,
        &app_state.completion_service,
        &app_state.messaging_service,
    )
    .await;

    logfire::info!(
        "Processed webhook: handled={handled}, skipped={skipped}, statuses={statuses}",
        handled = summary.handled as i64,
        skipped = summary.skipped as i64,
        statuses = summary.statuses as i64
    );

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok"
    })))
}
