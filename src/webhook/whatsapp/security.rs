//! Shared-secret checks for the WhatsApp webhook.
//!
//! - The verification handshake compares `hub.verify_token` with the configured
//!   secret.
//! - Deliveries may be authenticated with the `X-Hub-Signature-256` header,
//!   `sha256=<hex HMAC-SHA256 of the raw body keyed by the app secret>`.
//!
//! Both comparisons are constant-time. The signature MUST be computed on the
//! raw body bytes, not on re-serialized JSON.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Constant-time comparison of the handshake token with the configured secret
pub fn verify_token_matches(received: &str, expected: &str) -> bool {
    received.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Verifies the `X-Hub-Signature-256` header against the raw request body.
///
/// Returns `false` when the header has no `sha256=` prefix, is not hex, or
/// does not match.
pub fn verify_signature(signature_header: &str, payload: &[u8], app_secret: &str) -> bool {
    let Some(signature_hex) = signature_header.strip_prefix("sha256=") else {
        logfire::warn!("Invalid signature header format: expected 'sha256=' prefix");
        return false;
    };

    let expected_signature = match hex::decode(signature_hex) {
        Ok(sig) => sig,
        Err(e) => {
            logfire::warn!(
                "Failed to decode signature hex: {error}",
                error = e.to_string()
            );
            return false;
        }
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(app_secret.as_bytes()) else {
        logfire::error!("Failed to create HMAC instance");
        return false;
    };
    mac.update(payload);
    let computed_signature = mac.finalize().into_bytes();

    let is_valid: bool = computed_signature.ct_eq(&expected_signature[..]).into();
    if !is_valid {
        logfire::warn!("Webhook signature verification failed: signatures do not match");
    }

    is_valid
}

#[cfg(test)]
pub fn sign_payload(payload: &[u8], app_secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes()).unwrap();
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &[u8] = b"{\"object\":\"whatsapp_business_account\",\"entry\":[]}";

    #[test]
    fn test_verify_signature_valid() {
        let header = sign_payload(PAYLOAD, "app_secret");
        assert!(verify_signature(&header, PAYLOAD, "app_secret"));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let header = sign_payload(PAYLOAD, "other_secret");
        assert!(!verify_signature(&header, PAYLOAD, "app_secret"));
    }

    #[test]
    fn test_verify_signature_tampered_payload() {
        let header = sign_payload(PAYLOAD, "app_secret");
        let tampered = b"{\"object\":\"whatsapp_business_account\",\"entry\":[{}]}";
        assert!(!verify_signature(&header, tampered, "app_secret"));
    }

    #[test]
    fn test_verify_signature_malformed_header() {
        assert!(!verify_signature("abc123", PAYLOAD, "app_secret"));
        assert!(!verify_signature("sha1=abc123", PAYLOAD, "app_secret"));
        assert!(!verify_signature("sha256=zzzz", PAYLOAD, "app_secret"));
        assert!(!verify_signature("sha256=00ff", PAYLOAD, "app_secret"));
    }

    #[test]
    fn test_verify_token_matches() {
        assert!(verify_token_matches("mySecretVerifyToken", "mySecretVerifyToken"));
        assert!(!verify_token_matches("mySecretVerifyToke", "mySecretVerifyToken"));
        assert!(!verify_token_matches("", "mySecretVerifyToken"));
    }
}
