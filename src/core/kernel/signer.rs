use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the client identifier on signed requests
pub const USER_HEADER: &str = "X-USER";
/// Header carrying the hex payload signature
pub const SIGNATURE_HEADER: &str = "X-SIGNATURE";

/// Result type for signing operations: headers to attach to the request
pub type SignatureResult = Result<HashMap<String, String>, ExchangeError>;

/// Signer trait for request authentication
///
/// Implementations sign the exact bytes that go on the wire; callers must
/// serialize first and pass the serialized body unchanged.
pub trait Signer: Send + Sync {
    /// Sign a serialized request body and return the auth headers
    fn sign_request(&self, body: &[u8]) -> SignatureResult;

    /// Sign an arbitrary message and return the hex signature
    fn sign_message(&self, message: &[u8]) -> Result<String, ExchangeError>;

    /// Key identifying the account to the exchange
    fn api_key(&self) -> &str;
}

/// HMAC-SHA256 over `payload` keyed by `secret`, hex encoded
pub fn hmac_sha256_hex(secret: &[u8], payload: &[u8]) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// HMAC signer producing `X-USER` / `X-SIGNATURE` headers
#[derive(Clone)]
pub struct HmacSigner {
    client_id: String,
    api_key: String,
    secret_key: String,
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl HmacSigner {
    /// Create a new HMAC signer
    ///
    /// # Arguments
    /// * `client_id` - Identifier sent as `X-USER`
    /// * `api_key` - API key from the exchange
    /// * `secret_key` - Secret key for signing
    pub fn new(client_id: String, api_key: String, secret_key: String) -> Self {
        Self {
            client_id,
            api_key,
            secret_key,
        }
    }
}

impl Signer for HmacSigner {
    fn sign_request(&self, body: &[u8]) -> SignatureResult {
        let signature = hmac_sha256_hex(self.secret_key.as_bytes(), body)?;

        let mut headers = HashMap::new();
        headers.insert(USER_HEADER.to_string(), self.client_id.clone());
        headers.insert(SIGNATURE_HEADER.to_string(), signature);
        Ok(headers)
    }

    fn sign_message(&self, message: &[u8]) -> Result<String, ExchangeError> {
        hmac_sha256_hex(self.secret_key.as_bytes(), message)
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }
}
