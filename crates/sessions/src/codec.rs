//! Tamper-evident cookie encoding for [`ClientSessionBlob`].
//!
//! Format: `base64url(json) "." issued_at "." base64url(hmac_sha256)`, where
//! the MAC covers everything before the last dot. A cookie older than
//! `max_age` seconds is rejected even when the signature is valid.

use std::time::Duration;

use {
    base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD},
    hmac::{Hmac, Mac},
    rand::RngCore,
    sha2::Sha256,
};

use crate::blob::ClientSessionBlob;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("malformed session cookie")]
    Malformed,
    #[error("session cookie signature mismatch")]
    BadSignature,
    #[error("session cookie expired ({age}s old, max {max_age}s)")]
    Expired { age: u64, max_age: u64 },
    #[error("invalid signing key")]
    InvalidKey,
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Signs and verifies session cookies with a server secret.
#[derive(Clone)]
pub struct SessionCodec {
    key: Vec<u8>,
    max_age: Duration,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("key", &"[REDACTED]")
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl SessionCodec {
    pub fn new(secret: impl AsRef<[u8]>, max_age: Duration) -> Self {
        Self {
            key: secret.as_ref().to_vec(),
            max_age,
        }
    }

    /// Codec with a random key; cookies it signs die with the process.
    pub fn ephemeral(max_age: Duration) -> Self {
        let mut key = vec![0u8; 32];
        rand::rng().fill_bytes(&mut key);
        Self { key, max_age }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| SessionError::InvalidKey)
    }

    pub fn encode(&self, blob: &ClientSessionBlob, issued_at: u64) -> Result<String, SessionError> {
        let json = serde_json::to_vec(blob)?;
        let signed = format!("{}.{issued_at}", URL_SAFE_NO_PAD.encode(json));
        let mut mac = self.mac()?;
        mac.update(signed.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signed}.{sig}"))
    }

    pub fn decode(&self, value: &str, now: u64) -> Result<ClientSessionBlob, SessionError> {
        let (signed, sig) = value.rsplit_once('.').ok_or(SessionError::Malformed)?;
        let sig = URL_SAFE_NO_PAD
            .decode(sig)
            .map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(signed.as_bytes());
        mac.verify_slice(&sig)
            .map_err(|_| SessionError::BadSignature)?;

        let (payload, issued_at) = signed.rsplit_once('.').ok_or(SessionError::Malformed)?;
        let issued_at: u64 = issued_at.parse().map_err(|_| SessionError::Malformed)?;
        let age = now.saturating_sub(issued_at);
        let max_age = self.max_age.as_secs();
        if age > max_age {
            return Err(SessionError::Expired { age, max_age });
        }

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionError::Malformed)?;
        serde_json::from_slice(&json).map_err(|_| SessionError::Malformed)
    }
}
