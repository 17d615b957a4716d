//! # Error Types: Registry Error Taxonomy
//!
//! A single error type crosses the registry boundary. It has exactly six
//! kinds, and each kind carries a stable numeric code that other systems
//! match on. The detail string is for logs and humans only; it is not part
//! of the compatibility contract.
//!
//! ## Code Table
//!
//! | Kind                       | Code |
//! |----------------------------|------|
//! | `UnauthorizedAccess`       | 100  |
//! | `IdentityExists`           | 101  |
//! | `IdentityNotFound`         | 102  |
//! | `InvalidVerificationProof` | 103  |
//! | `CredentialExpired`        | 104  |
//! | `InvalidInput`             | 105  |
//!
//! `UnauthorizedAccess` also covers "record not found" on the revoke and
//! approve paths and credential-list capacity overflow. Those causes are
//! distinguishable only through the detail string.

use thiserror::Error;

/// Stable numeric error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    /// Caller lacks permission, or the target is revoked, missing, or full.
    UnauthorizedAccess = 100,
    /// Duplicate registration.
    IdentityExists = 101,
    /// The caller has no identity.
    IdentityNotFound = 102,
    /// Submitted proof does not match the expected value.
    InvalidVerificationProof = 103,
    /// Expiration timestamp is not strictly in the future.
    CredentialExpired = 104,
    /// Malformed length, out-of-range value, or duplicate identifier.
    InvalidInput = 105,
}

impl ErrorCode {
    /// The numeric code.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Look up a code by its numeric value.
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            100 => Some(Self::UnauthorizedAccess),
            101 => Some(Self::IdentityExists),
            102 => Some(Self::IdentityNotFound),
            103 => Some(Self::InvalidVerificationProof),
            104 => Some(Self::CredentialExpired),
            105 => Some(Self::InvalidInput),
            _ => None,
        }
    }

    /// The kind name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnauthorizedAccess => "UnauthorizedAccess",
            Self::IdentityExists => "IdentityExists",
            Self::IdentityNotFound => "IdentityNotFound",
            Self::InvalidVerificationProof => "InvalidVerificationProof",
            Self::CredentialExpired => "CredentialExpired",
            Self::InvalidInput => "InvalidInput",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.as_str(), self.as_u32())
    }
}

/// Error returned by every mutating registry operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the owner or issuer, the identity is revoked, the
    /// record is missing on a path that treats absence as an authorization
    /// failure, or a bounded collection is full.
    #[error("unauthorized access: {0}")]
    UnauthorizedAccess(String),

    /// The caller already has an identity.
    #[error("identity already exists: {0}")]
    IdentityExists(String),

    /// The operation requires an identity the caller does not have.
    #[error("identity not found: {0}")]
    IdentityNotFound(String),

    /// Submitted proof failed the equality check.
    #[error("invalid verification proof: {0}")]
    InvalidVerificationProof(String),

    /// Supplied expiration is not strictly after the current ledger time.
    #[error("credential expired: {0}")]
    CredentialExpired(String),

    /// Malformed length, out-of-range timestamp, or duplicate identifier
    /// on a create path.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl RegistryError {
    /// The stable code for this error kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnauthorizedAccess(_) => ErrorCode::UnauthorizedAccess,
            Self::IdentityExists(_) => ErrorCode::IdentityExists,
            Self::IdentityNotFound(_) => ErrorCode::IdentityNotFound,
            Self::InvalidVerificationProof(_) => ErrorCode::InvalidVerificationProof,
            Self::CredentialExpired(_) => ErrorCode::CredentialExpired,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
        }
    }

    /// The human-readable detail.
    pub fn detail(&self) -> &str {
        match self {
            Self::UnauthorizedAccess(d)
            | Self::IdentityExists(d)
            | Self::IdentityNotFound(d)
            | Self::InvalidVerificationProof(d)
            | Self::CredentialExpired(d)
            | Self::InvalidInput(d) => d,
        }
    }
}
