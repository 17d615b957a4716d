//! # Disclosure Registry
//!
//! Two-phase workflow for third-party attribute disclosure:
//!
//! ```text
//! (none) ──initiate──▶ Unapproved ──approve──▶ Approved
//! ```
//!
//! Any principal may open a request under an unused identifier. An
//! identity owner approves it by submitting a proof equal to their own
//! identity hash, which binds the approval to that identity. The requester
//! later checks the outcome with [`DisclosureRegistry::verify`].
//!
//! Proofs are opaque 32-byte values compared in constant time. No
//! cryptographic verification happens here.

use serde::{Deserialize, Serialize};

use sovid_core::validation::{self, AttributeList};
use sovid_core::{LedgerTime, PrincipalId, Proof, RegistryError, RequestId};

use crate::event::{EventKind, RegistryEvent};
use crate::guard::AccessGuard;
use crate::store::{RegistryState, Transaction};

/// Workflow state of a disclosure request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisclosureState {
    Unapproved,
    Approved,
}

/// A request to disclose identity attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureRequest {
    requester: PrincipalId,
    requested_attributes: AttributeList,
    approved: bool,
    proof: Proof,
}

impl DisclosureRequest {
    /// An unapproved request with a zero proof.
    pub fn new(requester: PrincipalId, requested_attributes: AttributeList) -> Self {
        Self {
            requester,
            requested_attributes,
            approved: false,
            proof: Proof::zero(),
        }
    }

    /// Principal that opened the request.
    pub fn requester(&self) -> &PrincipalId {
        &self.requester
    }

    /// Attribute names sought, in request order.
    pub fn requested_attributes(&self) -> impl Iterator<Item = &str> {
        self.requested_attributes.iter().map(|a| a.as_str())
    }

    /// Whether an identity owner approved the request.
    pub fn is_approved(&self) -> bool {
        self.approved
    }

    /// Last approving proof, zero until approved.
    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    /// Workflow state derived from the approval flag.
    pub fn state(&self) -> DisclosureState {
        if self.approved {
            DisclosureState::Approved
        } else {
            DisclosureState::Unapproved
        }
    }

    /// This request, approved with `proof`.
    pub fn with_approval(&self, proof: Proof) -> Self {
        Self {
            approved: true,
            proof,
            ..self.clone()
        }
    }
}

/// Disclosure operations over a transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisclosureRegistry;

impl DisclosureRegistry {
    /// Open a request under `request_id`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a bad identifier length, too many or too long
    /// attributes, or an identifier already in use.
    pub fn initiate<S: AsRef<str>>(
        txn: &mut Transaction<'_>,
        caller: &PrincipalId,
        request_id: &[u8],
        attributes: &[S],
        now: LedgerTime,
    ) -> Result<DisclosureRequest, RegistryError> {
        let request_id = validation::request_id(request_id)?;
        let attributes = validation::attributes(attributes)?;

        if txn.disclosure(&request_id).is_some() {
            return Err(RegistryError::InvalidInput(format!(
                "{request_id} is already in use"
            )));
        }

        let request = DisclosureRequest::new(caller.clone(), attributes);
        txn.put_disclosure(request_id, request.clone());
        txn.record(RegistryEvent::new(
            EventKind::DisclosureInitiated,
            caller,
            request_id,
            now,
        ));
        Ok(request)
    }

    /// Approve a request with a proof equal to the caller's identity hash.
    ///
    /// Approving an already approved request replaces its proof.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: bad identifier or proof length.
    /// - `UnauthorizedAccess`: no request under `request_id`, or the
    ///   caller's identity is revoked.
    /// - `IdentityNotFound`: caller has no identity.
    /// - `InvalidVerificationProof`: proof differs from the caller's
    ///   identity hash.
    pub fn approve(
        txn: &mut Transaction<'_>,
        caller: &PrincipalId,
        request_id: &[u8],
        proof: &[u8],
        now: LedgerTime,
    ) -> Result<DisclosureRequest, RegistryError> {
        let request_id = validation::request_id(request_id)?;
        let proof = validation::proof(proof)?;

        let request = txn.disclosure(&request_id).ok_or_else(|| {
            RegistryError::UnauthorizedAccess(format!("{request_id} not found"))
        })?;
        let approver = AccessGuard::active_identity(txn, caller)?;
        if !validation::proofs_match(proof.as_bytes(), approver.identity_hash().as_bytes()) {
            return Err(RegistryError::InvalidVerificationProof(format!(
                "proof does not match identity of {caller}"
            )));
        }

        let approved = request.with_approval(proof);
        txn.put_disclosure(request_id, approved.clone());
        txn.record(RegistryEvent::new(
            EventKind::DisclosureApproved,
            caller,
            request_id,
            now,
        ));
        Ok(approved)
    }

    /// Whether the request exists, is approved, and carries `proof`.
    /// Malformed input yields `false`.
    pub fn verify(state: &RegistryState, request_id: &[u8], proof: &[u8]) -> bool {
        let (Ok(request_id), Ok(proof)) =
            (RequestId::from_slice(request_id), Proof::from_slice(proof))
        else {
            return false;
        };
        state.disclosure(&request_id).is_some_and(|request| {
            request.is_approved()
                && validation::proofs_match(proof.as_bytes(), request.proof().as_bytes())
        })
    }

    /// The request stored under `request_id`.
    pub fn get(state: &RegistryState, request_id: &[u8]) -> Option<DisclosureRequest> {
        let request_id = RequestId::from_slice(request_id).ok()?;
        state.disclosure(&request_id).cloned()
    }
}
