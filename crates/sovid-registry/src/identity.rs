//! # Identity Registry
//!
//! One identity per principal. An identity is created once, may have its
//! hash and key replaced while unrevoked, accumulates up to ten credential
//! references in issuance order, and can be frozen permanently by its
//! owner. It is never deleted.
//!
//! ## Lifecycle
//!
//! ```text
//! (none) ──register──▶ Active ──update──▶ Active
//!                        │
//!                        └──revoke──▶ Revoked (terminal, frozen)
//! ```
//!
//! Record updates are field-level functions returning a new value; the
//! registration time and every field not named by the update are carried
//! over unchanged.

use serde::{Deserialize, Serialize};

use sovid_core::validation::{self, CredentialList};
use sovid_core::{
    BoundError, CredentialHash, IdentityHash, LedgerTime, PrincipalId, PublicKey, RegistryError,
};

use crate::event::{EventKind, RegistryEvent};
use crate::guard::AccessGuard;
use crate::store::{RegistryState, Transaction};

// ─── Identity record ─────────────────────────────────────────────────

/// A principal's registered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    identity_hash: IdentityHash,
    registration_time: LedgerTime,
    credentials: CredentialList,
    public_key: PublicKey,
    revoked: bool,
}

impl Identity {
    /// A fresh, unrevoked identity with no credentials.
    pub fn new(
        identity_hash: IdentityHash,
        public_key: PublicKey,
        registration_time: LedgerTime,
    ) -> Self {
        Self {
            identity_hash,
            registration_time,
            credentials: CredentialList::new(),
            public_key,
            revoked: false,
        }
    }

    /// Hash binding this identity to off-chain material.
    pub fn identity_hash(&self) -> &IdentityHash {
        &self.identity_hash
    }

    /// Ledger time of registration.
    pub fn registration_time(&self) -> LedgerTime {
        self.registration_time
    }

    /// Credential references in issuance order.
    pub fn credentials(&self) -> &[CredentialHash] {
        &self.credentials
    }

    /// Compressed public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Whether the identity is permanently frozen.
    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// This identity with a new hash and key.
    pub fn with_keys(&self, identity_hash: IdentityHash, public_key: PublicKey) -> Self {
        Self {
            identity_hash,
            public_key,
            ..self.clone()
        }
    }

    /// This identity with `hash` appended to its credential list.
    ///
    /// # Errors
    ///
    /// `BoundError::Capacity` if the list already holds ten references.
    pub fn with_credential(&self, hash: CredentialHash) -> Result<Self, BoundError> {
        let mut next = self.clone();
        next.credentials.try_push(hash)?;
        Ok(next)
    }

    /// This identity, revoked.
    pub fn with_revoked(&self) -> Self {
        Self {
            revoked: true,
            ..self.clone()
        }
    }
}

// ─── Operations ──────────────────────────────────────────────────────

/// Identity operations over a transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRegistry;

impl IdentityRegistry {
    /// Create `caller`'s identity.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a length mismatch; `IdentityExists` if `caller`
    /// already registered.
    pub fn register(
        txn: &mut Transaction<'_>,
        caller: &PrincipalId,
        public_key: &[u8],
        identity_hash: &[u8],
        now: LedgerTime,
    ) -> Result<Identity, RegistryError> {
        let public_key = validation::public_key(public_key)?;
        let identity_hash = validation::identity_hash(identity_hash)?;

        if txn.identity(caller).is_some() {
            return Err(RegistryError::IdentityExists(caller.to_string()));
        }

        let identity = Identity::new(identity_hash, public_key, now);
        txn.put_identity(caller.clone(), identity.clone());
        txn.record(RegistryEvent::new(EventKind::IdentityRegistered, caller, caller, now));
        Ok(identity)
    }

    /// Replace the hash and key of `caller`'s identity.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a length mismatch; `IdentityNotFound` if `caller`
    /// has no identity; `UnauthorizedAccess` if it is revoked.
    pub fn update(
        txn: &mut Transaction<'_>,
        caller: &PrincipalId,
        identity_hash: &[u8],
        public_key: &[u8],
        now: LedgerTime,
    ) -> Result<Identity, RegistryError> {
        let identity_hash = validation::identity_hash(identity_hash)?;
        let public_key = validation::public_key(public_key)?;

        let current = AccessGuard::active_identity(txn, caller)?;
        let updated = current.with_keys(identity_hash, public_key);
        txn.put_identity(caller.clone(), updated.clone());
        txn.record(RegistryEvent::new(EventKind::IdentityUpdated, caller, caller, now));
        Ok(updated)
    }

    /// Append `hash` to `caller`'s credential list.
    ///
    /// Called by credential issuance inside the same transaction.
    ///
    /// # Errors
    ///
    /// `IdentityNotFound` if `caller` has no identity. `UnauthorizedAccess`
    /// if it is revoked, or if the list is full: capacity overflow is
    /// reported as an authorization failure to keep the established error
    /// codes.
    pub fn append_credential(
        txn: &mut Transaction<'_>,
        caller: &PrincipalId,
        hash: CredentialHash,
    ) -> Result<Identity, RegistryError> {
        let current = AccessGuard::active_identity(txn, caller)?;
        let updated = current.with_credential(hash).map_err(|e| {
            RegistryError::UnauthorizedAccess(format!("credential list of {caller} is full: {e}"))
        })?;
        txn.put_identity(caller.clone(), updated.clone());
        Ok(updated)
    }

    /// Permanently freeze `caller`'s identity.
    ///
    /// # Errors
    ///
    /// `IdentityNotFound` if `caller` has no identity; `UnauthorizedAccess`
    /// if it is already revoked.
    pub fn revoke(
        txn: &mut Transaction<'_>,
        caller: &PrincipalId,
        now: LedgerTime,
    ) -> Result<Identity, RegistryError> {
        let current = AccessGuard::active_identity(txn, caller)?;
        let revoked = current.with_revoked();
        txn.put_identity(caller.clone(), revoked.clone());
        txn.record(RegistryEvent::new(EventKind::IdentityRevoked, caller, caller, now));
        Ok(revoked)
    }

    /// The identity owned by `principal`.
    pub fn get(state: &RegistryState, principal: &PrincipalId) -> Option<Identity> {
        state.identity(principal).cloned()
    }

    /// Credential references held by `principal`, in issuance order.
    pub fn credentials_of(
        state: &RegistryState,
        principal: &PrincipalId,
    ) -> Option<Vec<CredentialHash>> {
        state.identity(principal).map(|i| i.credentials().to_vec())
    }
}
