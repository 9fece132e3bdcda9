//! HMAC-SHA256 signed access tokens.
//!
//! Implements the `TokenIssuer` trait from `confab-core`. A token is
//! `base64url(claims JSON) . base64url(HMAC-SHA256 signature)` over the
//! encoded claims, with a 7-day expiry. Verification recomputes the MAC and
//! compares in constant time (the `hmac` crate's `verify_slice`), then checks
//! expiry.
//!
//! The signing secret is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use uuid::Uuid;

use confab_core::auth::TokenIssuer;
use confab_types::error::TokenError;
use confab_types::user::TokenClaims;

type HmacSha256 = Hmac<Sha256>;

/// How long an issued token stays valid.
const TOKEN_TTL_DAYS: i64 = 7;

/// HMAC-SHA256 implementation of `TokenIssuer`.
pub struct HmacTokenIssuer {
    secret: SecretString,
}

impl HmacTokenIssuer {
    /// Create a new issuer with the given signing secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| TokenError::Signing)
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

// HmacTokenIssuer intentionally does NOT derive Debug: the SecretString
// field keeps the secret out of output, but we also omit Debug entirely.

impl TokenIssuer for HmacTokenIssuer {
    fn issue(&self, user_id: &Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: *user_id,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Signing)?;
        let encoded = URL_SAFE_NO_PAD.encode(&payload);
        let signature = self.sign(encoded.as_bytes())?;

        Ok(format!("{encoded}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (encoded, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;

        let expected = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        // Constant-time comparison via the hmac crate.
        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&expected)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
