//! Value-movement seam
//!
//! Releasing funds is the one externally observable effect in the protocol,
//! so it goes through a trait: the vault commits its own state first, then
//! asks the settlement target to credit the recipient, and rolls back if the
//! credit is refused. [`MemoryLedger`] is the in-process implementation used
//! by tests and single-process deployments.

use std::collections::BTreeMap;

use strongbox_core::{Address, Amount};

/// Errors a settlement target may return when refusing a credit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    /// The recipient refused the transfer
    #[error("recipient {recipient} rejected the transfer: {reason}")]
    Rejected {
        /// Identity that refused the credit
        recipient: Address,
        /// Target-supplied explanation
        reason: String,
    },

    /// Crediting would overflow the recipient's balance
    #[error("crediting {recipient} would overflow its balance")]
    BalanceOverflow {
        /// Identity whose balance would overflow
        recipient: Address,
    },
}

/// A destination for value released by the vault.
///
/// `credit` must be all-or-nothing: on `Err` the target must be left exactly
/// as it was, because the vault will roll its own state back and report
/// `TransferFailed`.
pub trait Settlement {
    /// Credit `amount` to `recipient`
    fn credit(&mut self, recipient: Address, amount: Amount) -> Result<(), SettlementError>;
}

/// In-memory settlement ledger mapping identities to balances.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: BTreeMap<Address, Amount>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance currently credited to `account`
    pub fn balance_of(&self, account: Address) -> Amount {
        self.accounts.get(&account).copied().unwrap_or(0)
    }
}

impl Settlement for MemoryLedger {
    fn credit(&mut self, recipient: Address, amount: Amount) -> Result<(), SettlementError> {
        let balance = self.accounts.entry(recipient).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(SettlementError::BalanceOverflow { recipient })?;
        Ok(())
    }
}
