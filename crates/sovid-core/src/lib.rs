//! # sovid-core: Foundational Types for the Identity Registry
//!
//! This crate is the leaf of the workspace. It defines the primitives every
//! registry operation is built from and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for fixed-length values.** `IdentityHash`,
//!    `PublicKey`, `CredentialHash`, `RequestId`, `Proof`. Distinct types
//!    over [`FixedBytes`], so a proof can never be passed where a request
//!    identifier is expected.
//!
//! 2. **Bounded collections reject, never truncate.** [`BoundedVec`] and
//!    [`BoundedString`] return a typed [`BoundError`] when a push or
//!    construction would exceed the declared bound.
//!
//! 3. **Validation is pure.** The [`validation`] module checks raw caller
//!    input (byte lengths, timestamp ranges, label bounds, proof equality)
//!    and holds no state.
//!
//! 4. **Six error kinds, stable codes.** [`RegistryError`] is the single
//!    error type crossing the registry boundary; each kind maps to a fixed
//!    numeric [`ErrorCode`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sovid-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod bounded;
pub mod bytes;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod validation;

// Re-export primary types for ergonomic imports.
pub use bounded::{BoundError, BoundedString, BoundedVec};
pub use bytes::{Bytes32, BytesError, CredentialHash, FixedBytes, IdentityHash, Proof, PublicKey, RequestId};
pub use digest::{json_digest, sha256_digest};
pub use error::{ErrorCode, RegistryError};
pub use identity::PrincipalId;
pub use temporal::{Clock, LedgerTime, ManualClock, SystemClock};
pub use validation::{
    AttributeList, CredentialList, Label, IDENTITY_HASH_LEN, MAX_ATTRIBUTES, MAX_CREDENTIALS,
    MAX_EXPIRY, MAX_LABEL_LEN, MIN_EXPIRY, PROOF_LEN, PUBLIC_KEY_LEN,
};
