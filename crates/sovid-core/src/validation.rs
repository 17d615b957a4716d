//! # Input Validation
//!
//! Pure checks applied to raw caller input before any record is loaded.
//! Each function either returns the validated, typed value or the
//! `RegistryError` the operation must abort with. Nothing here holds state.
//!
//! ## Bounds
//!
//! | Value                | Bound                           |
//! |----------------------|---------------------------------|
//! | identity hash        | exactly 32 bytes                |
//! | public key           | exactly 33 bytes                |
//! | credential hash      | exactly 32 bytes                |
//! | request id, proof    | exactly 32 bytes                |
//! | expiration           | `1 ..= 9_999_999_999`           |
//! | category, attribute  | at most 64 chars                |
//! | attributes per request | at most 5                     |
//! | credentials per identity | at most 10                  |

use subtle::ConstantTimeEq;

use crate::bounded::{BoundError, BoundedString, BoundedVec};
use crate::bytes::{BytesError, CredentialHash, IdentityHash, Proof, PublicKey, RequestId};
use crate::error::RegistryError;
use crate::temporal::LedgerTime;

/// Identity hash length in bytes.
pub const IDENTITY_HASH_LEN: usize = IdentityHash::LEN;
/// Public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = PublicKey::LEN;
/// Proof length in bytes.
pub const PROOF_LEN: usize = Proof::LEN;
/// Capacity of an identity's credential list.
pub const MAX_CREDENTIALS: usize = 10;
/// Maximum attributes named by a disclosure request.
pub const MAX_ATTRIBUTES: usize = 5;
/// Maximum length of a category or attribute label, in chars.
pub const MAX_LABEL_LEN: usize = 64;
/// Smallest accepted expiration timestamp.
pub const MIN_EXPIRY: u64 = 1;
/// Largest accepted expiration timestamp.
pub const MAX_EXPIRY: u64 = 9_999_999_999;

/// An identity's ordered credential references.
pub type CredentialList = BoundedVec<CredentialHash, MAX_CREDENTIALS>;
/// A bounded free-form label.
pub type Label = BoundedString<MAX_LABEL_LEN>;
/// Attributes sought by a disclosure request.
pub type AttributeList = BoundedVec<Label, MAX_ATTRIBUTES>;

fn fixed<T>(
    field: &str,
    raw: &[u8],
    parse: impl FnOnce(&[u8]) -> Result<T, BytesError>,
) -> Result<T, RegistryError> {
    parse(raw).map_err(|e| RegistryError::InvalidInput(format!("{field}: {e}")))
}

/// Validate a raw identity hash.
pub fn identity_hash(raw: &[u8]) -> Result<IdentityHash, RegistryError> {
    fixed("identity_hash", raw, IdentityHash::from_slice)
}

/// Validate a raw public key.
pub fn public_key(raw: &[u8]) -> Result<PublicKey, RegistryError> {
    fixed("public_key", raw, PublicKey::from_slice)
}

/// Validate a raw credential hash.
pub fn credential_hash(raw: &[u8]) -> Result<CredentialHash, RegistryError> {
    fixed("credential_hash", raw, CredentialHash::from_slice)
}

/// Validate a raw disclosure request identifier.
pub fn request_id(raw: &[u8]) -> Result<RequestId, RegistryError> {
    fixed("request_id", raw, RequestId::from_slice)
}

/// Validate a raw proof.
pub fn proof(raw: &[u8]) -> Result<Proof, RegistryError> {
    fixed("proof", raw, Proof::from_slice)
}

/// Validate that an expiration timestamp lies in `MIN_EXPIRY ..= MAX_EXPIRY`.
pub fn expiry(expires_at: u64) -> Result<LedgerTime, RegistryError> {
    if !(MIN_EXPIRY..=MAX_EXPIRY).contains(&expires_at) {
        return Err(RegistryError::InvalidInput(format!(
            "expires_at {expires_at} outside {MIN_EXPIRY}..={MAX_EXPIRY}"
        )));
    }
    Ok(LedgerTime::from_secs(expires_at))
}

/// Require `expires_at` to be strictly after `now`.
pub fn require_future(expires_at: LedgerTime, now: LedgerTime) -> Result<(), RegistryError> {
    if expires_at <= now {
        return Err(RegistryError::CredentialExpired(format!(
            "expires_at {} is not after {now}",
            expires_at.secs()
        )));
    }
    Ok(())
}

/// Validate a single bounded label.
pub fn label(field: &str, raw: &str) -> Result<Label, RegistryError> {
    Label::try_new(raw).map_err(|e| RegistryError::InvalidInput(format!("{field}: {e}")))
}

/// Validate the attribute list of a disclosure request.
///
/// The count is checked before any individual label.
pub fn attributes<S: AsRef<str>>(raw: &[S]) -> Result<AttributeList, RegistryError> {
    if raw.len() > MAX_ATTRIBUTES {
        return Err(RegistryError::InvalidInput(format!(
            "attributes: {}",
            BoundError::Capacity {
                capacity: MAX_ATTRIBUTES,
                attempted: raw.len(),
            }
        )));
    }
    let labels = raw
        .iter()
        .enumerate()
        .map(|(i, a)| label(&format!("attributes[{i}]"), a.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    AttributeList::try_from_vec(labels)
        .map_err(|e| RegistryError::InvalidInput(format!("attributes: {e}")))
}

/// Constant-time byte equality of two proof-sized values.
pub fn proofs_match(submitted: &[u8; PROOF_LEN], expected: &[u8; PROOF_LEN]) -> bool {
    submitted[..].ct_eq(&expected[..]).into()
}
