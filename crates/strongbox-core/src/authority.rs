//! Authority trait seam
//!
//! The vault depends on its authority only through this trait, which keeps
//! signature-verification policy decoupled from fund custody: the trusted
//! signer set can evolve behind the trait without the vault changing.

use std::sync::Arc;

use crate::identifiers::{Address, AuthId};
use crate::signature::RecoverableSignature;
use crate::Amount;

/// An authorization authority the vault validates tokens against.
///
/// Implementations answer one question: was this signature, over the
/// canonical digest of (vault, recipient, amount, auth_id), produced by an
/// identity the authority currently trusts? Both methods are read-only and
/// must not mutate authority state.
pub trait Authority: Send + Sync {
    /// Whether `identity` is currently a trusted signer
    fn is_trusted_signer(&self, identity: Address) -> bool;

    /// Validate a withdrawal authorization.
    ///
    /// Recomputes the canonical digest for the supplied fields, recovers the
    /// signing identity, and reports whether it is trusted *at call time*.
    /// Returns `false` (never an error) for signatures that do not recover —
    /// callers must treat "not validated" as the only negative signal.
    fn validate(
        &self,
        vault: Address,
        recipient: Address,
        amount: Amount,
        auth_id: AuthId,
        signature: &RecoverableSignature,
    ) -> bool;
}

/// Shared reference to an authority, held by each vault for its lifetime
pub type AuthorityRef = Arc<dyn Authority>;
