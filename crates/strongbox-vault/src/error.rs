//! Vault rejection taxonomy
//!
//! Every variant rejects the entire operation; none leaves partial state
//! behind. Retry is the caller's concern and needs a freshly signed token
//! with a new authorization id.

use strongbox_core::{Amount, AuthId};

use crate::settlement::SettlementError;

/// Reasons a vault operation is rejected.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The authorization id was consumed by an earlier withdrawal
    #[error("authorization {auth_id} already used")]
    AlreadyUsed {
        /// The consumed authorization id
        auth_id: AuthId,
    },

    /// The signature did not recover to a currently trusted identity, or
    /// the supplied fields do not match what was signed
    #[error("invalid authorization")]
    InvalidAuthorization,

    /// The vault balance is lower than the requested amount
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the authorization releases
        requested: Amount,
        /// Balance held at the time of the call
        available: Amount,
    },

    /// Value movement to the recipient could not complete
    #[error("value transfer to recipient failed")]
    TransferFailed(#[source] SettlementError),

    /// Crediting the vault would overflow its balance
    #[error("deposit would overflow the vault balance")]
    BalanceOverflow,
}
