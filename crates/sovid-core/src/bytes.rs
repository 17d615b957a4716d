//! # Fixed-Length Byte Values
//!
//! Every opaque value the registry stores has an exact declared length:
//! identity hashes, credential hashes, request identifiers and proofs are
//! 32 bytes; public keys are 33 bytes (compressed SEC1 convention).
//!
//! `FixedBytes<N>` is the shared representation. The domain newtypes wrap it
//! so that identifier namespaces cannot be confused at compile time.
//!
//! ## Serialization
//!
//! All fixed-length values serialize as lowercase hex strings without a
//! prefix. Deserialization accepts an optional `0x` prefix and rejects any
//! input whose decoded length differs from `N`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error constructing a fixed-length value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BytesError {
    /// The input has the wrong number of bytes.
    #[error("expected {expected} bytes, got {actual}")]
    Length {
        /// Declared length.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// The input is not valid hex.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),
}

/// An opaque byte value of exactly `N` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixedBytes<const N: usize>([u8; N]);

/// The 32-byte value used for hashes, identifiers and proofs.
pub type Bytes32 = FixedBytes<32>;

impl<const N: usize> FixedBytes<N> {
    /// Declared length in bytes.
    pub const LEN: usize = N;

    /// Wrap an array of exactly `N` bytes.
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// The all-zero value.
    pub const fn zero() -> Self {
        Self([0u8; N])
    }

    /// Copy from a slice, rejecting any length other than `N`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BytesError> {
        let array: [u8; N] = bytes.try_into().map_err(|_| BytesError::Length {
            expected: N,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, BytesError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if !digits.is_ascii() || digits.len() % 2 != 0 {
            return Err(BytesError::InvalidHex(format!("{s:?}")));
        }
        let decoded = (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| BytesError::InvalidHex(format!("{s:?}: {e}")))?;
        Self::from_slice(&decoded)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Render as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl<const N: usize> From<[u8; N]> for FixedBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for FixedBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl<const N: usize> fmt::Display for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const N: usize> Serialize for FixedBytes<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedBytes<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Domain newtypes ─────────────────────────────────────────────────

macro_rules! fixed_bytes_newtype {
    ($(#[$meta:meta])* $name:ident, $len:expr, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(FixedBytes<$len>);

        impl $name {
            /// Declared length in bytes.
            pub const LEN: usize = $len;

            /// Wrap an array of exactly the declared length.
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(FixedBytes::new(bytes))
            }

            /// The all-zero value.
            pub const fn zero() -> Self {
                Self(FixedBytes::zero())
            }

            /// Copy from a slice, rejecting any other length.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, BytesError> {
                FixedBytes::from_slice(bytes).map(Self)
            }

            /// Parse from hex, with or without a `0x` prefix.
            pub fn from_hex(s: &str) -> Result<Self, BytesError> {
                FixedBytes::from_hex(s).map(Self)
            }

            /// Access the raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                self.0.as_bytes()
            }

            /// Render as a lowercase hex string.
            pub fn to_hex(&self) -> String {
                self.0.to_hex()
            }
        }

        impl From<FixedBytes<$len>> for $name {
            fn from(bytes: FixedBytes<$len>) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_ref()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }
    };
}

fixed_bytes_newtype!(
    /// 32-byte hash binding an identity to off-chain identity material.
    IdentityHash,
    32,
    "idhash"
);

fixed_bytes_newtype!(
    /// 33-byte compressed public key.
    PublicKey,
    33,
    "pubkey"
);

fixed_bytes_newtype!(
    /// 32-byte globally unique credential key.
    CredentialHash,
    32,
    "credential"
);

fixed_bytes_newtype!(
    /// 32-byte globally unique disclosure request identifier.
    RequestId,
    32,
    "request"
);

fixed_bytes_newtype!(
    /// 32-byte opaque proof value, compared by exact byte equality.
    Proof,
    32,
    "proof"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_exact_length() {
        let b = Bytes32::from_slice(&[7u8; 32]).unwrap();
        assert_eq!(b.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn test_from_slice_rejects_short_and_long() {
        assert_eq!(
            Bytes32::from_slice(&[0u8; 31]),
            Err(BytesError::Length { expected: 32, actual: 31 })
        );
        assert_eq!(
            PublicKey::from_slice(&[0u8; 32]),
            Err(BytesError::Length { expected: 33, actual: 32 })
        );
        assert!(PublicKey::from_slice(&[2u8; 33]).is_ok());
    }

    #[test]
    fn test_zero_value() {
        assert!(Proof::zero().as_bytes().iter().all(|b| *b == 0));
        assert!(FixedBytes::<32>::zero().is_zero());
        assert!(!FixedBytes::new([1u8; 32]).is_zero());
    }

    #[test]
    fn test_hex_accepts_prefix() {
        let plain = CredentialHash::from_hex(&"ab".repeat(32)).unwrap();
        let prefixed = CredentialHash::from_hex(&format!("0x{}", "ab".repeat(32))).unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.to_hex(), "ab".repeat(32));
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(matches!(RequestId::from_hex("zz"), Err(BytesError::InvalidHex(_))));
        assert!(matches!(RequestId::from_hex("abc"), Err(BytesError::InvalidHex(_))));
        assert!(matches!(RequestId::from_hex("é1"), Err(BytesError::InvalidHex(_))));
        assert!(matches!(
            RequestId::from_hex("abcd"),
            Err(BytesError::Length { expected: 32, actual: 2 })
        ));
    }

    #[test]
    fn test_display_carries_namespace() {
        let id = RequestId::new([0xcc; 32]);
        assert_eq!(id.to_string(), format!("request:{}", "cc".repeat(32)));
        assert!(format!("{id:?}").starts_with("RequestId(0xcccc"));
    }

    #[test]
    fn test_serde_is_hex_string() {
        let key = PublicKey::new([0x02; 33]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", "02".repeat(33)));
        let parsed: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_serde_rejects_wrong_length() {
        let json = format!("\"{}\"", "02".repeat(32));
        assert!(serde_json::from_str::<PublicKey>(&json).is_err());
    }
}
