//! # Digest Helpers
//!
//! The registry stores caller-supplied hashes and never computes them
//! itself. Callers and hosts still need a deterministic way to derive those
//! 32-byte values from off-chain material (an identity document, a
//! credential body, a request nonce); these helpers are that path.
//!
//! `json_digest` hashes the RFC 8785 (JCS) canonical form produced by
//! `serde_jcs`: sorted keys, compact separators, canonical numbers. Logically
//! equal documents hash identically regardless of field order in the source.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::bytes::Bytes32;

/// SHA-256 of raw bytes.
pub fn sha256_digest(data: &[u8]) -> Bytes32 {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Bytes32::new(bytes)
}

/// SHA-256 of the JCS canonical JSON form of `value`.
///
/// # Errors
///
/// Returns the serialization error if `value` cannot be represented as JSON.
pub fn json_digest(value: &impl Serialize) -> Result<Bytes32, serde_json::Error> {
    let bytes = serde_jcs::to_vec(value)?;
    Ok(sha256_digest(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            sha256_digest(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_json_digest_ignores_field_order() {
        let a = serde_json::json!({"name": "Ada", "dob": "1815-12-10"});
        let b: serde_json::Value =
            serde_json::from_str(r#"{"dob":"1815-12-10","name":"Ada"}"#).unwrap();
        assert_eq!(json_digest(&a).unwrap(), json_digest(&b).unwrap());
    }

    #[test]
    fn test_json_digest_hashes_canonical_bytes() {
        let value = serde_json::json!({"b": 1, "a": [true, null], "c": {"z": "x", "y": 2}});
        let canonical = br#"{"a":[true,null],"b":1,"c":{"y":2,"z":"x"}}"#;
        assert_eq!(json_digest(&value).unwrap(), sha256_digest(canonical));
    }

    #[test]
    fn test_json_digest_distinguishes_content() {
        let a = serde_json::json!({"name": "Ada"});
        let b = serde_json::json!({"name": "Grace"});
        assert_ne!(json_digest(&a).unwrap(), json_digest(&b).unwrap());
    }
}
