//! # Transactional State Store
//!
//! The three keyed registries (identities, credentials, disclosure
//! requests) and the event journal live in one [`RegistryState`]. Every
//! mutating operation runs as a single [`Transaction`] against it:
//!
//! - reads see the committed state overlaid with the operation's own
//!   staged writes;
//! - writes are staged, never applied in place;
//! - the store applies the staged writes only if the operation returns
//!   `Ok`. An `Err` discards them, so a failing operation has no
//!   observable effect.
//!
//! [`InMemoryStore`] serializes writers behind a `parking_lot::RwLock`.
//! The lock is never held across an `.await` and is non-poisoning, so a
//! panicking operation cannot wedge the store. Readers run concurrently
//! with each other and never observe a half-applied operation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use sovid_core::{json_digest, Bytes32, CredentialHash, PrincipalId, RequestId};

use crate::config::RegistryConfig;
use crate::credential::Credential;
use crate::disclosure::DisclosureRequest;
use crate::event::{EventJournal, RegistryEvent};
use crate::identity::Identity;

// ─── Committed state ─────────────────────────────────────────────────

/// Committed contents of all registries.
///
/// Serializable so a host can snapshot and restore it; durability itself
/// is the host's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    identities: BTreeMap<PrincipalId, Identity>,
    credentials: BTreeMap<CredentialHash, Credential>,
    disclosures: BTreeMap<RequestId, DisclosureRequest>,
    journal: EventJournal,
}

impl RegistryState {
    /// Empty state with the configured journal policy.
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            journal: EventJournal::new(config),
            ..Self::default()
        }
    }

    /// The identity owned by `principal`.
    pub fn identity(&self, principal: &PrincipalId) -> Option<&Identity> {
        self.identities.get(principal)
    }

    /// The credential stored under `hash`.
    pub fn credential(&self, hash: &CredentialHash) -> Option<&Credential> {
        self.credentials.get(hash)
    }

    /// The disclosure request stored under `id`.
    pub fn disclosure(&self, id: &RequestId) -> Option<&DisclosureRequest> {
        self.disclosures.get(id)
    }

    /// The event journal.
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Number of registered identities.
    pub fn identity_count(&self) -> usize {
        self.identities.len()
    }

    /// Number of issued credentials.
    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    /// Number of disclosure requests.
    pub fn disclosure_count(&self) -> usize {
        self.disclosures.len()
    }

    /// SHA-256 over the canonical JSON form of the state.
    ///
    /// Equal states have equal fingerprints, so a host can check that a
    /// restored snapshot matches what it persisted.
    pub fn fingerprint(&self) -> Result<Bytes32, serde_json::Error> {
        json_digest(self)
    }
}

// ─── Transaction ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct StagedWrites {
    identities: HashMap<PrincipalId, Identity>,
    credentials: HashMap<CredentialHash, Credential>,
    disclosures: HashMap<RequestId, DisclosureRequest>,
    events: Vec<RegistryEvent>,
}

impl StagedWrites {
    fn apply(self, state: &mut RegistryState) {
        state.identities.extend(self.identities);
        state.credentials.extend(self.credentials);
        state.disclosures.extend(self.disclosures);
        for event in self.events {
            state.journal.append(event);
        }
    }
}

/// A consistent view of the committed state plus this operation's
/// staged writes.
#[derive(Debug)]
pub struct Transaction<'a> {
    base: &'a RegistryState,
    staged: StagedWrites,
}

impl<'a> Transaction<'a> {
    /// Open a transaction over `base`.
    pub fn new(base: &'a RegistryState) -> Self {
        Self {
            base,
            staged: StagedWrites::default(),
        }
    }

    /// Current identity of `principal`, including staged writes.
    pub fn identity(&self, principal: &PrincipalId) -> Option<Identity> {
        self.staged
            .identities
            .get(principal)
            .or_else(|| self.base.identity(principal))
            .cloned()
    }

    /// Stage `identity` as the record for `principal`.
    pub fn put_identity(&mut self, principal: PrincipalId, identity: Identity) {
        self.staged.identities.insert(principal, identity);
    }

    /// Current credential under `hash`, including staged writes.
    pub fn credential(&self, hash: &CredentialHash) -> Option<Credential> {
        self.staged
            .credentials
            .get(hash)
            .or_else(|| self.base.credential(hash))
            .cloned()
    }

    /// Stage `credential` under `hash`.
    pub fn put_credential(&mut self, hash: CredentialHash, credential: Credential) {
        self.staged.credentials.insert(hash, credential);
    }

    /// Current disclosure request under `id`, including staged writes.
    pub fn disclosure(&self, id: &RequestId) -> Option<DisclosureRequest> {
        self.staged
            .disclosures
            .get(id)
            .or_else(|| self.base.disclosure(id))
            .cloned()
    }

    /// Stage `request` under `id`.
    pub fn put_disclosure(&mut self, id: RequestId, request: DisclosureRequest) {
        self.staged.disclosures.insert(id, request);
    }

    /// Stage an event for the journal.
    pub fn record(&mut self, event: RegistryEvent) {
        self.staged.events.push(event);
    }

    /// Whether nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.staged.identities.is_empty()
            && self.staged.credentials.is_empty()
            && self.staged.disclosures.is_empty()
            && self.staged.events.is_empty()
    }

    fn into_staged(self) -> StagedWrites {
        self.staged
    }
}

// ─── Store abstraction ───────────────────────────────────────────────

/// Storage backend with all-or-nothing commit per operation.
pub trait StateStore: Send + Sync {
    /// Run `f` against the committed state.
    fn read<R>(&self, f: impl FnOnce(&RegistryState) -> R) -> R;

    /// Run `op` in a transaction. Staged writes are committed if and only
    /// if `op` returns `Ok`. Concurrent calls are serialized.
    fn transact<R, E>(
        &self,
        op: impl FnOnce(&mut Transaction<'_>) -> Result<R, E>,
    ) -> Result<R, E>;
}

/// Thread-safe, cloneable in-memory store. All clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<RegistryState>>,
}

impl InMemoryStore {
    /// Empty store with the configured journal policy.
    pub fn new(config: &RegistryConfig) -> Self {
        Self::from_snapshot(RegistryState::new(config))
    }

    /// Restore a store from a previously taken snapshot.
    pub fn from_snapshot(state: RegistryState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> RegistryState {
        self.state.read().clone()
    }
}

impl StateStore for InMemoryStore {
    fn read<R>(&self, f: impl FnOnce(&RegistryState) -> R) -> R {
        f(&self.state.read())
    }

    fn transact<R, E>(
        &self,
        op: impl FnOnce(&mut Transaction<'_>) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut guard = self.state.write();
        let (result, staged) = {
            let mut txn = Transaction::new(&guard);
            let result = op(&mut txn);
            (result, txn.into_staged())
        };
        if result.is_ok() {
            staged.apply(&mut guard);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use sovid_core::{IdentityHash, LedgerTime, PublicKey};

    use super::*;
    use crate::event::EventKind;

    fn alice() -> PrincipalId {
        PrincipalId::new("alice").unwrap()
    }

    fn identity() -> Identity {
        Identity::new(
            IdentityHash::new([0xaa; 32]),
            PublicKey::new([0x02; 33]),
            LedgerTime::from_secs(10),
        )
    }

    #[test]
    fn test_commit_on_ok() {
        let store = InMemoryStore::default();
        let result: Result<(), ()> = store.transact(|txn| {
            txn.put_identity(alice(), identity());
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(store.read(|s| s.identity(&alice()).cloned()), Some(identity()));
    }

    #[test]
    fn test_discard_on_err() {
        let store = InMemoryStore::default();
        let result: Result<(), &str> = store.transact(|txn| {
            txn.put_identity(alice(), identity());
            txn.record(RegistryEvent::new(
                EventKind::IdentityRegistered,
                &alice(),
                alice(),
                LedgerTime::ZERO,
            ));
            Err("abort")
        });
        assert_eq!(result, Err("abort"));
        assert!(store.read(|s| s.identity(&alice()).is_none()));
        assert!(store.read(|s| s.journal().is_empty()));
    }

    #[test]
    fn test_transaction_reads_its_own_writes() {
        let store = InMemoryStore::default();
        let seen: Result<bool, ()> = store.transact(|txn| {
            assert!(txn.identity(&alice()).is_none());
            assert!(txn.is_empty());
            txn.put_identity(alice(), identity());
            Ok(txn.identity(&alice()).is_some())
        });
        assert_eq!(seen, Ok(true));
    }

    #[test]
    fn test_clones_share_state() {
        let store = InMemoryStore::default();
        let other = store.clone();
        let _: Result<(), ()> = store.transact(|txn| {
            txn.put_identity(alice(), identity());
            Ok(())
        });
        assert_eq!(other.read(|s| s.identity_count()), 1);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let store = InMemoryStore::default();
        let _: Result<(), ()> = store.transact(|txn| {
            txn.put_identity(alice(), identity());
            Ok(())
        });
        let json = serde_json::to_string(&store.snapshot()).unwrap();
        let restored: RegistryState = serde_json::from_str(&json).unwrap();
        let restored = InMemoryStore::from_snapshot(restored);
        assert_eq!(restored.snapshot(), store.snapshot());
        assert_eq!(
            restored.snapshot().fingerprint().unwrap(),
            store.snapshot().fingerprint().unwrap()
        );
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let empty = RegistryState::default().fingerprint().unwrap();
        let store = InMemoryStore::default();
        let _: Result<(), ()> = store.transact(|txn| {
            txn.put_identity(alice(), identity());
            Ok(())
        });
        assert_ne!(store.snapshot().fingerprint().unwrap(), empty);
    }
}
