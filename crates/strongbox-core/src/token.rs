//! Single-use authorization tokens
//!
//! A token is the requester-side bundle of everything the vault needs to
//! release funds: the recipient, the amount, the single-use id, and the
//! authority signature binding all of them to one vault. Tokens are never
//! persisted; they travel as call arguments.

use serde::{Deserialize, Serialize};

use crate::identifiers::{Address, AuthId};
use crate::signature::RecoverableSignature;
use crate::Amount;

/// A signed, single-use permission to withdraw from one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationToken {
    /// Identity the funds are released to
    pub recipient: Address,

    /// Value to release, in value units
    pub amount: Amount,

    /// Single-use authorization id consumed on withdrawal
    pub auth_id: AuthId,

    /// Authority signature over the canonical withdrawal digest
    pub signature: RecoverableSignature,
}
