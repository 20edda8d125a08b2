//! Application state and the handlers not linked to the webhook

use crate::{
    config::AppConfig,
    consts,
    errors::WebhookError,
    services::{ImplCompletionService, ImplMessagingService},
    webhook,
};
use chrono::{SecondsFormat, Utc};
use ntex::web;
use serde_json::json;
use std::sync::Arc;

/// Per-worker state, built from the immutable startup configuration
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub completion_service: ImplCompletionService,
    pub messaging_service: ImplMessagingService,
}

/// Liveness probe
#[web::get("/")]
pub async fn index() -> Result<impl web::Responder, web::Error> {
    Ok(web::HttpResponse::Ok().json(&json!({
        "status": "running",
        "service": consts::SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })))
}

/// Return a [NotFound](WebhookError::NotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(WebhookError::NotFound.into())
}

/// Registers every route of the service
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index);
    webhook::routes::whatsapp(cfg);
}
