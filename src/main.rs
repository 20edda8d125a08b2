//! # WhatsApp Completion Relay
//!
//! Receives WhatsApp Business webhooks, asks a chat completion API for a
//! reply to every text message and sends the reply back to the sender.

pub mod api;
pub mod config;
pub mod consts;
pub mod errors;
pub mod metric;
pub mod server;
pub mod services;
pub mod utils;
pub mod webhook;

use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use std::sync::Arc;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration, fails on missing secrets
    let app_config = Arc::new(config::AppConfig::load()?);

    // Initialize logging and metrics
    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(SendToLogfire::IfTokenPresent);
    if let Some(token) = &app_config.logfire_token {
        logfire_config = logfire_config.with_token(token);
    }
    let shutdown_handler = logfire_config.finish()?;

    // Initialize outbound clients
    let completion_client = services::openai::OpenAIClient::new(&app_config)?;
    let whatsapp_client = webhook::whatsapp::client::WhatsAppClient::new(&app_config)?;

    configure_and_run_server(app_config, completion_client, whatsapp_client).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Configures and starts the web server. TLS is terminated in front of it.
async fn configure_and_run_server(
    app_config: Arc<config::AppConfig>,
    completion_client: services::openai::OpenAIClient,
    whatsapp_client: webhook::whatsapp::client::WhatsAppClient,
) -> anyhow::Result<()> {
    let server_addr = app_config.server_addr();
    logfire::info!(
        "Starting {env} server on {host}:{port}",
        env = app_config.env.clone(),
        host = server_addr.0.clone(),
        port = i64::from(server_addr.1)
    );

    let server = web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(server::AppState {
                config: app_config.clone(),
                completion_service: Box::new(completion_client.clone()),
                messaging_service: Box::new(whatsapp_client.clone()),
            })
            .configure(server::routes)
            .default_service(web::route().to(server::serve_not_found))
    });

    server
        .bind(server_addr)?
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
