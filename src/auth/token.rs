//! Signed bearer tokens.
//!
//! A token is `hex(payload).hex(mac)` where `payload` is the JSON
//! [`Claims`] and `mac` is HMAC-SHA256 of the payload bytes under the
//! server secret.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::UserId;
use crate::error::GameError;

type HmacSha256 = Hmac<Sha256>;

/// Token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user.
    pub sub: UserId,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and verifies tokens with one secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// A signer with the given secret and validity in days.
    #[must_use]
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::days(ttl_days.max(1)),
        }
    }

    fn mac(&self) -> Result<HmacSha256, GameError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| GameError::Internal(format!("token key: {e}")))
    }

    /// Issues a token for `user` valid from `now`.
    ///
    /// # Errors
    ///
    /// [`GameError::Internal`] if the claims cannot be encoded.
    pub fn issue(&self, user: UserId, now: DateTime<Utc>) -> Result<String, GameError> {
        let claims = Claims {
            sub: user,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let payload =
            serde_json::to_vec(&claims).map_err(|e| GameError::Internal(e.to_string()))?;
        let mut mac = self.mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();
        Ok(format!("{}.{}", hex::encode(&payload), hex::encode(signature)))
    }

    /// Verifies a token and returns its subject.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] for malformed, forged, or expired tokens.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, GameError> {
        let invalid = || GameError::Unauthorized("invalid token".to_string());
        let (payload_hex, signature_hex) = token.split_once('.').ok_or_else(invalid)?;
        let payload = hex::decode(payload_hex).map_err(|_| invalid())?;
        let signature = hex::decode(signature_hex).map_err(|_| invalid())?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| invalid())?;
        if now.timestamp() >= claims.exp {
            return Err(GameError::Unauthorized("token expired".to_string()));
        }
        Ok(claims.sub)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000)
    }

    #[test]
    fn issued_token_verifies() {
        let signer = TokenSigner::new("secret", 7);
        let user = UserId::new();
        let Ok(token) = signer.issue(user, t0()) else {
            panic!("issue failed");
        };
        assert_eq!(signer.verify(&token, t0() + Duration::days(6)).ok(), Some(user));
    }

    #[test]
    fn token_expires_after_ttl() {
        let signer = TokenSigner::new("secret", 7);
        let Ok(token) = signer.issue(UserId::new(), t0()) else {
            panic!("issue failed");
        };
        let Err(GameError::Unauthorized(_)) = signer.verify(&token, t0() + Duration::days(7)) else {
            panic!("expected expiry");
        };
    }

    #[test]
    fn other_secret_is_rejected() {
        let Ok(token) = TokenSigner::new("a", 7).issue(UserId::new(), t0()) else {
            panic!("issue failed");
        };
        assert!(TokenSigner::new("b", 7).verify(&token, t0()).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = TokenSigner::new("secret", 7);
        let Ok(token) = signer.issue(UserId::new(), t0()) else {
            panic!("issue failed");
        };
        let Some((_, signature)) = token.split_once('.') else {
            panic!("malformed token");
        };
        let forged_claims = Claims {
            sub: UserId::new(),
            iat: 0,
            exp: i64::MAX,
        };
        let forged_payload = serde_json::to_vec(&forged_claims).unwrap_or_default();
        let forged = format!("{}.{signature}", hex::encode(forged_payload));
        assert!(signer.verify(&forged, t0()).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let signer = TokenSigner::new("secret", 7);
        for token in ["", "abc", "zz.zz", "00.00"] {
            assert!(signer.verify(token, t0()).is_err());
        }
    }
}
