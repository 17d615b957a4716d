//! # Registry Facade
//!
//! The public operation surface. Each mutating operation:
//!
//! 1. resolves the acting principal from the [`CallContext`],
//! 2. opens a single store transaction,
//! 3. reads the ledger time once from the [`Clock`] inside it, so checks
//!    and timestamps never lag behind operations committed before it,
//! 4. runs the registry logic and logs the outcome: `info` on commit,
//!    `debug` on rejection.
//!
//! Reads take the committed state directly and never fail; malformed
//! identifiers collapse to `None` or `false`.

use sovid_core::{Clock, CredentialHash, LedgerTime, PrincipalId, RegistryError, SystemClock};

use crate::config::RegistryConfig;
use crate::credential::{Credential, CredentialRegistry, CredentialStatus};
use crate::disclosure::{DisclosureRegistry, DisclosureRequest};
use crate::event::RegistryEvent;
use crate::guard::{AccessGuard, CallContext};
use crate::identity::{Identity, IdentityRegistry};
use crate::store::{InMemoryStore, StateStore, Transaction};

/// Identity, credential and disclosure registry over a store and a clock.
#[derive(Debug, Clone)]
pub struct Registry<S = InMemoryStore, C = SystemClock> {
    store: S,
    clock: C,
}

impl Registry<InMemoryStore, SystemClock> {
    /// An empty in-memory registry on wall-clock time.
    pub fn in_memory(config: &RegistryConfig) -> Self {
        Self::new(InMemoryStore::new(config), SystemClock::new())
    }
}

impl<S: StateStore, C: Clock> Registry<S, C> {
    /// Registry over `store`, reading ledger time from `clock`.
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The ledger clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn execute<R>(
        &self,
        operation: &'static str,
        ctx: &CallContext,
        op: impl FnOnce(&mut Transaction<'_>, &PrincipalId, LedgerTime) -> Result<R, RegistryError>,
    ) -> Result<R, RegistryError> {
        let caller = AccessGuard::acting_principal(ctx);
        let mut now = LedgerTime::ZERO;
        let result = self.store.transact(|txn| {
            now = self.clock.now();
            op(txn, caller, now)
        });
        match &result {
            Ok(_) => tracing::info!(operation, principal = %caller, %now, "committed"),
            Err(e) => tracing::debug!(
                operation,
                principal = %caller,
                %now,
                code = e.code().as_u32(),
                kind = e.code().as_str(),
                detail = e.detail(),
                "rejected"
            ),
        }
        result
    }

    // ─── Identity ────────────────────────────────────────────────────

    /// Register the caller's identity.
    pub fn register(
        &self,
        ctx: &CallContext,
        public_key: &[u8],
        identity_hash: &[u8],
    ) -> Result<Identity, RegistryError> {
        self.execute("register", ctx, |txn, caller, now| {
            IdentityRegistry::register(txn, caller, public_key, identity_hash, now)
        })
    }

    /// Replace the caller's identity hash and public key.
    pub fn update(
        &self,
        ctx: &CallContext,
        identity_hash: &[u8],
        public_key: &[u8],
    ) -> Result<Identity, RegistryError> {
        self.execute("update", ctx, |txn, caller, now| {
            IdentityRegistry::update(txn, caller, identity_hash, public_key, now)
        })
    }

    /// Permanently freeze the caller's identity.
    pub fn revoke_identity(&self, ctx: &CallContext) -> Result<Identity, RegistryError> {
        self.execute("revoke_identity", ctx, |txn, caller, now| {
            IdentityRegistry::revoke(txn, caller, now)
        })
    }

    // ─── Credentials ─────────────────────────────────────────────────

    /// Issue a credential from the caller's identity.
    pub fn issue_credential(
        &self,
        ctx: &CallContext,
        credential_hash: &[u8],
        expires_at: u64,
        category: &str,
    ) -> Result<Credential, RegistryError> {
        self.execute("issue_credential", ctx, |txn, caller, now| {
            CredentialRegistry::issue(txn, caller, credential_hash, expires_at, category, now)
        })
    }

    /// Revoke a credential the caller issued.
    pub fn revoke_credential(
        &self,
        ctx: &CallContext,
        credential_hash: &[u8],
    ) -> Result<Credential, RegistryError> {
        self.execute("revoke_credential", ctx, |txn, caller, now| {
            CredentialRegistry::revoke(txn, caller, credential_hash, now)
        })
    }

    // ─── Disclosure ──────────────────────────────────────────────────

    /// Open a disclosure request.
    pub fn initiate_disclosure<A: AsRef<str>>(
        &self,
        ctx: &CallContext,
        request_id: &[u8],
        attributes: &[A],
    ) -> Result<DisclosureRequest, RegistryError> {
        self.execute("initiate_disclosure", ctx, |txn, caller, now| {
            DisclosureRegistry::initiate(txn, caller, request_id, attributes, now)
        })
    }

    /// Approve a disclosure request with the caller's identity hash.
    pub fn approve_disclosure(
        &self,
        ctx: &CallContext,
        request_id: &[u8],
        proof: &[u8],
    ) -> Result<DisclosureRequest, RegistryError> {
        self.execute("approve_disclosure", ctx, |txn, caller, now| {
            DisclosureRegistry::approve(txn, caller, request_id, proof, now)
        })
    }

    // ─── Reads ───────────────────────────────────────────────────────

    /// The identity owned by `principal`.
    pub fn get_identity(&self, principal: &PrincipalId) -> Option<Identity> {
        self.store.read(|state| IdentityRegistry::get(state, principal))
    }

    /// Credential hashes held by `principal`, in issuance order.
    pub fn credentials_of(&self, principal: &PrincipalId) -> Option<Vec<CredentialHash>> {
        self.store
            .read(|state| IdentityRegistry::credentials_of(state, principal))
    }

    /// The credential stored under `credential_hash`.
    pub fn get_credential(&self, credential_hash: &[u8]) -> Option<Credential> {
        self.store
            .read(|state| CredentialRegistry::get(state, credential_hash))
    }

    /// Whether the credential exists, is unrevoked, and has not expired.
    pub fn is_credential_valid(&self, credential_hash: &[u8]) -> bool {
        self.store
            .read(|state| CredentialRegistry::is_valid(state, credential_hash, self.clock.now()))
    }

    /// Status of the credential under `credential_hash` at the current time.
    pub fn credential_status(&self, credential_hash: &[u8]) -> Option<CredentialStatus> {
        self.store
            .read(|state| CredentialRegistry::status(state, credential_hash, self.clock.now()))
    }

    /// The disclosure request stored under `request_id`.
    pub fn get_disclosure(&self, request_id: &[u8]) -> Option<DisclosureRequest> {
        self.store
            .read(|state| DisclosureRegistry::get(state, request_id))
    }

    /// Whether the request was approved with exactly `proof`.
    pub fn verify_disclosure(&self, request_id: &[u8], proof: &[u8]) -> bool {
        self.store
            .read(|state| DisclosureRegistry::verify(state, request_id, proof))
    }

    /// Retained journal events, oldest first.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.store
            .read(|state| state.journal().events().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use sovid_core::{ErrorCode, ManualClock};

    use super::*;
    use crate::event::EventKind;

    fn ctx(name: &str) -> CallContext {
        CallContext::new(PrincipalId::new(name).unwrap())
    }

    fn registry() -> Registry<InMemoryStore, ManualClock> {
        Registry::new(
            InMemoryStore::default(),
            ManualClock::new(LedgerTime::from_secs(1_000)),
        )
    }

    #[test]
    fn test_register_uses_clock_time() {
        let registry = registry();
        let identity = registry.register(&ctx("alice"), &[2; 33], &[0xaa; 32]).unwrap();
        assert_eq!(identity.registration_time(), LedgerTime::from_secs(1_000));
        assert_eq!(
            registry.get_identity(ctx("alice").caller()),
            Some(identity)
        );
    }

    #[test]
    fn test_rejected_operation_leaves_no_event() {
        let registry = registry();
        registry.register(&ctx("alice"), &[2; 33], &[0xaa; 32]).unwrap();
        let err = registry
            .register(&ctx("alice"), &[2; 33], &[0xaa; 32])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::IdentityExists);
        let kinds: Vec<_> = registry.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::IdentityRegistered]);
    }

    #[test]
    fn test_validity_follows_clock() {
        let registry = registry();
        registry.register(&ctx("issuer"), &[2; 33], &[0xaa; 32]).unwrap();
        registry
            .issue_credential(&ctx("issuer"), &[0xbb; 32], 1_100, "diploma")
            .unwrap();
        assert!(registry.is_credential_valid(&[0xbb; 32]));
        assert_eq!(
            registry.credential_status(&[0xbb; 32]),
            Some(CredentialStatus::Active)
        );

        registry.clock().advance(100);
        assert!(!registry.is_credential_valid(&[0xbb; 32]));
        assert_eq!(
            registry.credential_status(&[0xbb; 32]),
            Some(CredentialStatus::Expired)
        );
    }

    #[test]
    fn test_reads_on_unknown_keys() {
        let registry = registry();
        assert!(registry.get_identity(ctx("ghost").caller()).is_none());
        assert!(registry.credentials_of(ctx("ghost").caller()).is_none());
        assert!(registry.get_credential(&[0; 32]).is_none());
        assert!(registry.credential_status(&[0; 7]).is_none());
        assert!(registry.get_disclosure(&[0; 32]).is_none());
        assert!(!registry.verify_disclosure(&[0; 32], &[0; 32]));
        assert!(registry.events().is_empty());
    }

    #[test]
    fn test_in_memory_constructor_respects_journal_config() {
        let registry = Registry::in_memory(&RegistryConfig::default().with_journal(false));
        registry.register(&ctx("alice"), &[2; 33], &[0xaa; 32]).unwrap();
        assert!(registry.events().is_empty());
        assert!(registry.get_identity(ctx("alice").caller()).is_some());
    }
}
