use axum::extract::FromRef;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use time::OffsetDateTime;

use crate::error::ApiError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Tokens are valid for a fixed 24h window from issuance.
const TOKEN_EXPIRY_SECS: i64 = 3600 * 24;

/// Signs and verifies the self-contained bearer credential
/// `base64(user_id:issued_at:hmac)`. Nothing is persisted server-side, so a
/// token stays valid until it ages out of the window.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
}

impl FromRef<AppState> for TokenSigner {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.config.auth.secret.clone())
    }
}

impl TokenSigner {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    pub fn issue(&self, user_id: i64) -> String {
        self.issue_at(user_id, OffsetDateTime::now_utc().unix_timestamp())
    }

    pub fn issue_at(&self, user_id: i64, issued_at: i64) -> String {
        let payload = format!("{user_id}:{issued_at}");
        let hash = self.signature(&payload);
        BASE64.encode(format!("{payload}:{hash}"))
    }

    /// Validates a raw token (scheme prefix already removed) and returns the
    /// embedded user id. The id still has to be resolved against the store.
    pub fn verify(&self, token: &str) -> Result<i64, ApiError> {
        self.verify_at(token, OffsetDateTime::now_utc().unix_timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<i64, ApiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::EmptyToken);
        }

        let decoded = BASE64
            .decode(token)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or(ApiError::InvalidEncoding)?;

        let parts: Vec<&str> = decoded.split(':').collect();
        if parts.len() != 3 {
            return Err(ApiError::InvalidStructure);
        }
        let (user_id, timestamp, hash) = (parts[0], parts[1], parts[2]);

        // Malformed numeric fields coerce to 0: a garbled timestamp reads as
        // ancient and fails the expiry check, a garbled id resolves to no user.
        let issued_at = timestamp.parse::<i64>().unwrap_or(0);
        if now - issued_at > TOKEN_EXPIRY_SECS {
            return Err(ApiError::TokenExpired);
        }

        let expected = self.signature(&format!("{user_id}:{timestamp}"));
        if !constant_time_eq(&expected, hash) {
            return Err(ApiError::InvalidSignature);
        }

        Ok(user_id.parse::<i64>().unwrap_or(0))
    }

    fn signature(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Constant-time string comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
