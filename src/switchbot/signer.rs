//! Request signing for the SwitchBot v1.1 API
//!
//! sign = Base64(HMAC-SHA256(secret, token + t + nonce))

use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use sha2::Sha256;

use super::Credentials;

type HmacSha256 = Hmac<Sha256>;

pub const NONCE_LENGTH: usize = 16;

/// Random alphanumeric nonce. Only needs to be unlikely to repeat, not unpredictable.
pub fn generate_nonce(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Signature over `token + timestamp + nonce`, keyed by `secret`
pub fn sign(token: &str, secret: &str, timestamp: &str, nonce: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(token.as_bytes());
    mac.update(timestamp.as_bytes());
    mac.update(nonce.as_bytes());

    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// One set of authentication headers; build a fresh one for every request
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub token: String,
    pub timestamp: String,
    pub nonce: String,
    pub signature: String,
}

impl AuthHeaders {
    pub fn build(credentials: &Credentials) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        let nonce = generate_nonce(NONCE_LENGTH);
        Self::with(credentials, timestamp, nonce)
    }

    fn with(credentials: &Credentials, timestamp: String, nonce: String) -> Self {
        let signature = sign(&credentials.token, credentials.secret(), &timestamp, &nonce);
        Self {
            token: credentials.token.clone(),
            timestamp,
            nonce,
            signature,
        }
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, reqwest::header::InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&self.token)?);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf8"),
        );
        headers.insert(
            HeaderName::from_static("t"),
            HeaderValue::from_str(&self.timestamp)?,
        );
        headers.insert(
            HeaderName::from_static("sign"),
            HeaderValue::from_str(&self.signature)?,
        );
        headers.insert(
            HeaderName::from_static("nonce"),
            HeaderValue::from_str(&self.nonce)?,
        );
        Ok(headers)
    }
}
