//! Admin token verification.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Guards the admin API and pages with a single shared token.
///
/// The configured token is never compared directly: both sides are run through
/// HMAC-SHA256 under a per-process random key and the tags are compared with
/// [`Mac::verify_slice`], which is constant time.
///
/// With no token configured the service is disabled and every request passes.
pub struct AuthService {
    key: [u8; 32],
    expected_tag: Option<Vec<u8>>,
    fingerprint: Option<String>,
}

impl AuthService {
    /// Creates the service. Blank tokens count as not configured.
    pub fn new(admin_token: Option<&str>) -> Self {
        let key: [u8; 32] = rand::random();
        let token = admin_token.map(str::trim).filter(|t| !t.is_empty());

        Self {
            key,
            expected_tag: token.map(|t| sign(&key, t)),
            fingerprint: token.map(fingerprint),
        }
    }

    /// Disabled service, used when `ADMIN_TOKEN` is unset.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.expected_tag.is_some()
    }

    /// Short hex fingerprint of the configured token, safe to log.
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Checks a presented token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] when a token is configured and
    /// `token` is missing or does not match.
    pub fn authenticate(&self, token: Option<&str>) -> Result<(), AppError> {
        let Some(expected) = &self.expected_tag else {
            return Ok(());
        };

        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Missing admin token" }),
            ));
        };

        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(token.as_bytes());

        mac.verify_slice(expected).map_err(|_| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid admin token" }))
        })
    }
}

fn sign(key: &[u8], token: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// First 8 hex characters of the token's SHA-256 digest.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_accepts_everything() {
        let service = AuthService::disabled();

        assert!(!service.is_enabled());
        assert!(service.authenticate(None).is_ok());
        assert!(service.authenticate(Some("anything")).is_ok());
        assert!(service.fingerprint().is_none());
    }

    #[test]
    fn test_blank_token_means_disabled() {
        assert!(!AuthService::new(Some("   ")).is_enabled());
    }

    #[test]
    fn test_authenticate_success() {
        let service = AuthService::new(Some("s3cret"));

        assert!(service.is_enabled());
        assert!(service.authenticate(Some("s3cret")).is_ok());
        assert!(service.authenticate(Some("  s3cret ")).is_ok());
    }

    #[test]
    fn test_authenticate_wrong_or_missing_token() {
        let service = AuthService::new(Some("s3cret"));

        let err = service.authenticate(Some("guess")).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));

        let err = service.authenticate(None).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let service = AuthService::new(Some("s3cret"));

        assert_eq!(service.fingerprint(), Some(fingerprint("s3cret").as_str()));
        assert_eq!(fingerprint("s3cret").len(), 8);
        assert_ne!(fingerprint("a"), fingerprint("b"));
    }
}
