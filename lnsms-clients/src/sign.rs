//! Request signing for the wallet provider API.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs a wallet API request using HMAC-SHA256 over
/// `path || nonce || token || body`, hex-encoded.
pub fn sign_request(path: &str, nonce: &str, token: &str, body: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(path.as_bytes());
    mac.update(nonce.as_bytes());
    mac.update(token.as_bytes());
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
