//! WhatsApp webhook integration module
//!
//! ## Submodules
//!
//! - [`handler`] - Walks webhook payloads and relays text messages
//! - [`routes`] - HTTP endpoint handlers for WhatsApp webhooks
//! - [`schemas`] - Incoming webhook payloads
//! - [`outgoing_schemas`] - Outgoing messages and send API responses
//! - [`client`] - WhatsApp API client for sending messages
//! - [`security`] - Verify token and payload signature checks

pub mod client;
pub mod handler;
pub mod outgoing_schemas;
pub mod routes;
pub mod schemas;
pub mod security;

// Re-export commonly used items for convenience
pub use routes::{receive, verify};
