//! # Credential Registry
//!
//! Credentials are keyed by a globally unique 32-byte hash. The issuing
//! identity is fixed at creation and is the only principal allowed to
//! revoke. Revocation is irreversible, and an expired credential stays
//! expired: validity is a pure function of the record and the ledger time.
//!
//! ## Status
//!
//! | revoked | now < expires_at | status  |
//! |---------|------------------|---------|
//! | true    | any              | Revoked |
//! | false   | false            | Expired |
//! | false   | true             | Active  |

use serde::{Deserialize, Serialize};

use sovid_core::validation::{self, Label};
use sovid_core::{CredentialHash, LedgerTime, PrincipalId, RegistryError};

use crate::event::{EventKind, RegistryEvent};
use crate::guard::AccessGuard;
use crate::identity::IdentityRegistry;
use crate::store::{RegistryState, Transaction};

// ─── Status ──────────────────────────────────────────────────────────

/// Validity of a credential at a given ledger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialStatus {
    Active,
    Expired,
    Revoked,
}

impl CredentialStatus {
    /// Whether the credential may be relied on.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
        };
        f.write_str(s)
    }
}

// ─── Credential record ───────────────────────────────────────────────

/// An attestation issued by a registered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    issuer: PrincipalId,
    issued_at: LedgerTime,
    expires_at: LedgerTime,
    category: Label,
    revoked: bool,
}

impl Credential {
    /// An unrevoked credential issued by `issuer` at `issued_at`.
    pub fn new(
        issuer: PrincipalId,
        issued_at: LedgerTime,
        expires_at: LedgerTime,
        category: Label,
    ) -> Self {
        Self {
            issuer,
            issued_at,
            expires_at,
            category,
            revoked: false,
        }
    }

    /// Principal that issued the credential.
    pub fn issuer(&self) -> &PrincipalId {
        &self.issuer
    }

    /// Ledger time of issuance.
    pub fn issued_at(&self) -> LedgerTime {
        self.issued_at
    }

    /// Ledger time from which the credential is expired.
    pub fn expires_at(&self) -> LedgerTime {
        self.expires_at
    }

    /// Free-form category label.
    pub fn category(&self) -> &str {
        self.category.as_str()
    }

    /// Whether the issuer revoked the credential.
    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Status at ledger time `now`. Revocation takes precedence over expiry.
    pub fn status_at(&self, now: LedgerTime) -> CredentialStatus {
        if self.revoked {
            CredentialStatus::Revoked
        } else if now < self.expires_at {
            CredentialStatus::Active
        } else {
            CredentialStatus::Expired
        }
    }

    /// `now < expires_at` and not revoked.
    pub fn is_valid_at(&self, now: LedgerTime) -> bool {
        self.status_at(now).is_valid()
    }

    /// This credential, revoked.
    pub fn with_revoked(&self) -> Self {
        Self {
            revoked: true,
            ..self.clone()
        }
    }
}

// ─── Operations ──────────────────────────────────────────────────────

/// Credential operations over a transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialRegistry;

impl CredentialRegistry {
    /// Issue a credential under `hash` and append it to the caller's list.
    ///
    /// The credential record is staged first and the append second; both
    /// commit together or not at all.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: bad hash length, `expires_at` out of range, category
    ///   too long, or `hash` already issued.
    /// - `CredentialExpired`: `expires_at <= now`.
    /// - `IdentityNotFound`: caller has no identity.
    /// - `UnauthorizedAccess`: caller's identity is revoked or its
    ///   credential list is full.
    pub fn issue(
        txn: &mut Transaction<'_>,
        caller: &PrincipalId,
        hash: &[u8],
        expires_at: u64,
        category: &str,
        now: LedgerTime,
    ) -> Result<Credential, RegistryError> {
        let hash = validation::credential_hash(hash)?;
        let expires_at = validation::expiry(expires_at)?;
        let category = validation::label("category", category)?;
        validation::require_future(expires_at, now)?;

        AccessGuard::active_identity(txn, caller)?;
        if txn.credential(&hash).is_some() {
            return Err(RegistryError::InvalidInput(format!(
                "{hash} has already been issued"
            )));
        }

        let credential = Credential::new(caller.clone(), now, expires_at, category);
        txn.put_credential(hash, credential.clone());
        IdentityRegistry::append_credential(txn, caller, hash)?;
        txn.record(RegistryEvent::new(EventKind::CredentialIssued, caller, hash, now));
        Ok(credential)
    }

    /// Revoke a credential. Only its issuer may do so.
    ///
    /// Revoking an already revoked credential returns it unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a bad hash length; `UnauthorizedAccess` if the
    /// credential does not exist or `caller` is not its issuer.
    pub fn revoke(
        txn: &mut Transaction<'_>,
        caller: &PrincipalId,
        hash: &[u8],
        now: LedgerTime,
    ) -> Result<Credential, RegistryError> {
        let hash = validation::credential_hash(hash)?;
        let credential = txn
            .credential(&hash)
            .ok_or_else(|| RegistryError::UnauthorizedAccess(format!("{hash} not found")))?;
        AccessGuard::require_issuer(&credential, caller)?;

        if credential.is_revoked() {
            return Ok(credential);
        }
        let revoked = credential.with_revoked();
        txn.put_credential(hash, revoked.clone());
        txn.record(RegistryEvent::new(EventKind::CredentialRevoked, caller, hash, now));
        Ok(revoked)
    }

    /// The credential stored under `hash`. Malformed hashes yield `None`.
    pub fn get(state: &RegistryState, hash: &[u8]) -> Option<Credential> {
        let hash = CredentialHash::from_slice(hash).ok()?;
        state.credential(&hash).cloned()
    }

    /// Status of the credential under `hash` at `now`.
    pub fn status(state: &RegistryState, hash: &[u8], now: LedgerTime) -> Option<CredentialStatus> {
        Self::get(state, hash).map(|c| c.status_at(now))
    }

    /// Whether the credential under `hash` exists and is valid at `now`.
    pub fn is_valid(state: &RegistryState, hash: &[u8], now: LedgerTime) -> bool {
        Self::status(state, hash, now).is_some_and(|s| s.is_valid())
    }
}
