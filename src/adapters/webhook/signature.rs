//! Webhook signature computation and verification.
//!
//! The provider signs every delivery with HMAC-SHA256 keyed by the
//! subscription secret. The signed message is the message id, the timestamp
//! header and the raw body concatenated with no separator. The header value
//! is `sha256=` followed by the lowercase hex digest.
//!
//! # Security
//!
//! - The body is used exactly as received, never re-serialized
//! - Digests are compared in constant time

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

fn digest(secret: &[u8], message_id: &str, timestamp: &str, body: &[u8]) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(message_id.as_bytes());
    mac.update(timestamp.as_bytes());
    mac.update(body);
    Some(mac.finalize().into_bytes().to_vec())
}

/// Compute the signature header value for a delivery.
///
/// Returns `None` only if the secret is rejected as an HMAC key, which does
/// not happen for HMAC-SHA256.
pub fn sign(secret: &str, message_id: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let digest = digest(secret.as_bytes(), message_id, timestamp, body)?;
    Some(format!("{}{}", SIGNATURE_PREFIX, hex_encode(&digest)))
}

/// Check a supplied signature header value against the delivery.
///
/// Any malformed input (missing prefix, bad hex, wrong length) fails
/// verification instead of erroring.
pub fn verify(
    secret: &str,
    message_id: &str,
    timestamp: &str,
    body: &[u8],
    supplied_signature: &str,
) -> bool {
    let Some(hex) = supplied_signature.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Some(provided) = hex_decode(hex) else {
        return false;
    };
    let Some(expected) = digest(secret.as_bytes(), message_id, timestamp, body) else {
        return false;
    };

    // ct_eq on slices of unequal length returns 0 without leaking where they differ.
    expected.as_slice().ct_eq(provided.as_slice()).unwrap_u8() == 1
}

/// Decode hex string to bytes.
fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }

    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let byte = u8::from_str_radix(&hex[i..i + 2], 16).ok()?;
        bytes.push(byte);
    }
    Some(bytes)
}

/// Encode bytes to lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
