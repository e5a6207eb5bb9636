//! Delegation tokens: short-lived signed claims verified without shared state.
//!
//! The session authority mints a token binding `{subject, role, expiry}` under
//! a server-held secret. The estimation service verifies it purely by
//! signature and clock; there is no database lookup and no revocation before
//! expiry (an accepted trade-off given the 300 second lifetime).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::user::{Role, UserId};
use crate::domain::Error;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime from issuance.
pub const DELEGATION_TOKEN_TTL_SECONDS: i64 = 300;

/// Claims carried by a delegation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationClaims {
    /// Subject user id.
    pub subject: i64,
    /// Role embedded at issuance; drives estimate granularity.
    pub role: Role,
    /// Expiry as Unix seconds. Tokens are rejected from this instant on.
    pub expires_at: i64,
}

impl DelegationClaims {
    /// Subject as a domain user id.
    pub fn subject_id(&self) -> UserId {
        UserId::new(self.subject)
    }
}

/// Signs and verifies delegation tokens with a server-held HMAC-SHA256 secret.
///
/// Issuance is a pure function of the user and the supplied clock; repeated
/// calls before expiry yield functionally equivalent tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    /// Create a signer from the shared secret bytes.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length, so this cannot fail.
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }

    /// Issue a token for the given subject, expiring `300s` after `now`.
    pub fn issue(&self, subject: UserId, role: Role, now: DateTime<Utc>) -> String {
        let claims = DelegationClaims {
            subject: subject.as_i64(),
            role,
            expires_at: (now + Duration::seconds(DELEGATION_TOKEN_TTL_SECONDS)).timestamp(),
        };
        // Claims are a plain serialisable struct; serialisation cannot fail.
        let payload = serde_json::to_vec(&claims).expect("claims serialise to JSON");
        let encoded_payload = URL_SAFE_NO_PAD.encode(&payload);

        let mut mac = self.mac();
        mac.update(encoded_payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{encoded_payload}.{signature}")
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Any structural defect, signature mismatch, or expiry at/after `now`
    /// yields [`crate::domain::ErrorCode::Unauthenticated`]; no claim data is
    /// trusted before the signature check passes.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<DelegationClaims, Error> {
        let invalid = || Error::unauthenticated("invalid delegation token");

        let (encoded_payload, encoded_signature) = token.split_once('.').ok_or_else(invalid)?;
        let signature = URL_SAFE_NO_PAD
            .decode(encoded_signature)
            .map_err(|_| invalid())?;

        let mut mac = self.mac();
        mac.update(encoded_payload.as_bytes());
        // Constant-time comparison.
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded_payload)
            .map_err(|_| invalid())?;
        let claims: DelegationClaims =
            serde_json::from_slice(&payload).map_err(|_| invalid())?;

        if now.timestamp() >= claims.expires_at {
            return Err(Error::unauthenticated("delegation token expired"));
        }

        Ok(claims)
    }
}
