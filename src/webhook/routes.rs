use ntex::web;

/// Configures webhook routes for the WhatsApp Business API.
///
/// These routes are public endpoints, deliveries are authenticated only by
/// the optional `X-Hub-Signature-256` check.
///
/// # Routes
/// - `GET /webhook` - WhatsApp webhook verification
/// - `POST /webhook` - WhatsApp webhook receiver
pub fn whatsapp(cfg: &mut web::ServiceConfig) {
    cfg.service((super::whatsapp::verify, super::whatsapp::receive));
}
