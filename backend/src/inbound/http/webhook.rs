//! Shared-secret verification for the payment provider webhook.
//!
//! The provider callback is otherwise unauthenticated, so deployments can
//! configure a shared secret; the provider then signs each delivery with
//! `X-Webhook-Signature: hex(sha256(secret || body))`. Without a configured
//! secret the check is skipped, matching the historical behaviour of the
//! endpoint.

use actix_web::http::header::HeaderMap;
use sha2::{Digest, Sha256};

use crate::domain::Error;

/// Header carrying the provider's delivery signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Verifies webhook deliveries against an optional shared secret.
#[derive(Debug, Clone, Default)]
pub struct WebhookVerifier {
    secret: Option<String>,
}

impl WebhookVerifier {
    /// Build a verifier; `None` disables verification.
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    fn expected_signature(secret: &str, body: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.update(body);
        hex::encode(hasher.finalize())
    }

    /// Check the delivery signature when a secret is configured.
    pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), Error> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(());
        };

        let presented = headers
            .get(WEBHOOK_SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| Error::unauthorized("webhook signature missing"))?;

        if presented.eq_ignore_ascii_case(&Self::expected_signature(secret, body)) {
            Ok(())
        } else {
            Err(Error::unauthorized("webhook signature mismatch"))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn headers_with_signature(signature: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(WEBHOOK_SIGNATURE_HEADER),
            HeaderValue::from_str(signature).expect("ascii signature"),
        );
        headers
    }

    #[rstest]
    fn unconfigured_verifier_accepts_everything() {
        let verifier = WebhookVerifier::default();
        verifier
            .verify(&HeaderMap::new(), b"{}")
            .expect("no secret, no check");
    }

    #[rstest]
    fn valid_signature_passes() {
        let verifier = WebhookVerifier::new(Some("s3cret".to_owned()));
        let signature = WebhookVerifier::expected_signature("s3cret", b"{\"ok\":true}");

        verifier
            .verify(&headers_with_signature(&signature), b"{\"ok\":true}")
            .expect("matching signature");
    }

    #[rstest]
    fn missing_or_wrong_signature_is_unauthorized() {
        let verifier = WebhookVerifier::new(Some("s3cret".to_owned()));

        let missing = verifier
            .verify(&HeaderMap::new(), b"{}")
            .expect_err("missing signature");
        assert_eq!(missing.code(), ErrorCode::Unauthorized);

        let wrong = verifier
            .verify(&headers_with_signature("deadbeef"), b"{}")
            .expect_err("wrong signature");
        assert_eq!(wrong.code(), ErrorCode::Unauthorized);
    }
}
