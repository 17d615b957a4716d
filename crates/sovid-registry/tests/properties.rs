//! Property tests for the registry invariants.

use proptest::prelude::*;

use sovid_core::{ErrorCode, LedgerTime, ManualClock, PrincipalId, MAX_CREDENTIALS};
use sovid_registry::{CallContext, InMemoryStore, Registry};

const START: u64 = 1_000_000;

fn ctx(name: &str) -> CallContext {
    CallContext::new(PrincipalId::new(name).unwrap())
}

fn registry() -> Registry<InMemoryStore, ManualClock> {
    Registry::new(
        InMemoryStore::default(),
        ManualClock::new(LedgerTime::from_secs(START)),
    )
}

fn registered(name: &str) -> (Registry<InMemoryStore, ManualClock>, CallContext) {
    let registry = registry();
    let caller = ctx(name);
    registry
        .register(&caller, &[0x02; 33], &[0xaa; 32])
        .expect("fresh registry accepts registration");
    (registry, caller)
}

proptest! {
    #[test]
    fn prop_register_is_exactly_once(
        name in "[a-z]{1,12}",
        attempts in 1usize..6,
        pk in any::<[u8; 32]>(),
    ) {
        let registry = registry();
        let caller = ctx(&name);
        let mut key = vec![0x02];
        key.extend_from_slice(&pk);
        let results: Vec<_> = (0..attempts)
            .map(|_| registry.register(&caller, &key, &pk))
            .collect();
        prop_assert!(results[0].is_ok());
        for later in &results[1..] {
            prop_assert_eq!(later.as_ref().unwrap_err().code(), ErrorCode::IdentityExists);
        }
        prop_assert_eq!(registry.store().snapshot().identity_count(), 1);
    }

    #[test]
    fn prop_credential_hash_is_globally_unique(hash in any::<[u8; 32]>()) {
        let (registry, first) = registered("first");
        let second = ctx("second");
        registry.register(&second, &[0x03; 33], &[0xbb; 32]).unwrap();

        registry.issue_credential(&first, &hash, START + 10, "a").unwrap();
        let err = registry
            .issue_credential(&second, &hash, START + 10, "b")
            .unwrap_err();
        prop_assert_eq!(err.code(), ErrorCode::InvalidInput);
        let stored = registry.get_credential(&hash).unwrap();
        prop_assert_eq!(stored.issuer(), first.caller());
    }

    #[test]
    fn prop_validity_matches_expiry_and_revocation(
        lifetime in 1u64..1_000,
        elapsed in 0u64..2_000,
        revoke in any::<bool>(),
    ) {
        let (registry, issuer) = registered("issuer");
        let hash = [0x5a; 32];
        registry
            .issue_credential(&issuer, &hash, START + lifetime, "x")
            .unwrap();
        if revoke {
            registry.revoke_credential(&issuer, &hash).unwrap();
        }
        registry.clock().advance(elapsed);

        let expected = elapsed < lifetime && !revoke;
        prop_assert_eq!(registry.is_credential_valid(&hash), expected);
    }

    #[test]
    fn prop_credential_list_never_exceeds_capacity(attempts in 0usize..20) {
        let (registry, issuer) = registered("issuer");
        let mut accepted = 0;
        for i in 0..attempts {
            match registry.issue_credential(&issuer, &[i as u8; 32], START + 10, "x") {
                Ok(_) => accepted += 1,
                Err(e) => {
                    prop_assert_eq!(e.code(), ErrorCode::UnauthorizedAccess);
                }
            }
        }
        prop_assert_eq!(accepted, attempts.min(MAX_CREDENTIALS));
        let held = registry.credentials_of(issuer.caller()).unwrap();
        prop_assert_eq!(held.len(), accepted);
        prop_assert_eq!(registry.store().snapshot().credential_count(), accepted);
    }

    #[test]
    fn prop_verify_iff_approved_with_that_proof(
        identity_hash in any::<[u8; 32]>(),
        probe in any::<[u8; 32]>(),
        approve in any::<bool>(),
    ) {
        let registry = registry();
        let owner = ctx("owner");
        registry.register(&owner, &[0x02; 33], &identity_hash).unwrap();
        let request = [0xcc; 32];
        registry.initiate_disclosure(&ctx("bank"), &request, &["name"]).unwrap();
        if approve {
            registry.approve_disclosure(&owner, &request, &identity_hash).unwrap();
        }
        prop_assert_eq!(
            registry.verify_disclosure(&request, &probe),
            approve && probe == identity_hash
        );
        prop_assert_eq!(
            registry.verify_disclosure(&request, &identity_hash),
            approve
        );
    }

    #[test]
    fn prop_malformed_lengths_are_invalid_input(len in 0usize..64) {
        prop_assume!(len != 32 && len != 33);
        let registry = registry();
        let caller = ctx("alice");
        let raw = vec![0x01; len];
        let err = registry.register(&caller, &raw, &[0xaa; 32]).unwrap_err();
        prop_assert_eq!(err.code(), ErrorCode::InvalidInput);
        let err = registry.register(&caller, &[0x02; 33], &raw).unwrap_err();
        prop_assert_eq!(err.code(), ErrorCode::InvalidInput);
        prop_assert!(registry.get_identity(caller.caller()).is_none());
        prop_assert!(!registry.verify_disclosure(&raw, &raw));
    }
}
