//! Helper functions shared by the outbound service clients

use anyhow::Context;
use std::time::Duration;

/// Builds the HTTP client used for outbound calls, every request is bounded
/// by `timeout`
pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}

/// Reads a failed response body for logging, never fails
pub async fn read_error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string())
}
