//! The custody vault state machine
//!
//! State per vault: a balance, the set of consumed authorization ids, and an
//! append-only audit log of released withdrawals. All mutation goes through
//! `deposit` and `withdraw` on `&mut self`, which serializes every
//! transition through a single execution context; two withdrawals racing for
//! one authorization id cannot interleave, so exactly one observes it
//! unused.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use strongbox_core::{
    Address, Amount, AuthId, AuthorityRef, AuthorizationToken, RecoverableSignature,
};

use crate::error::VaultError;
use crate::settlement::Settlement;

/// Audit record emitted for every released withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    /// Identity the funds were released to
    pub recipient: Address,

    /// Value released, in value units
    pub amount: Amount,

    /// Authorization id consumed by this withdrawal
    pub auth_id: AuthId,
}

/// A custodial vault releasing funds under single-use authorizations.
///
/// The vault stores an immutable reference to the authority it trusts, so
/// the authority must exist before the vault is constructed. Its own
/// identity is bound into every digest it validates, which stops tokens
/// issued for one vault from being replayed against another.
pub struct Vault {
    address: Address,
    authority: AuthorityRef,
    balance: Amount,
    consumed: BTreeSet<AuthId>,
    withdrawals: Vec<WithdrawalRecord>,
}

impl Vault {
    /// Create an empty vault with identity `address`, validating against
    /// `authority`.
    pub fn new(address: Address, authority: AuthorityRef) -> Self {
        Self {
            address,
            authority,
            balance: 0,
            consumed: BTreeSet::new(),
            withdrawals: Vec::new(),
        }
    }

    /// The vault's own identity
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current balance held in custody
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Whether `auth_id` has been consumed by a past withdrawal
    pub fn is_consumed(&self, auth_id: AuthId) -> bool {
        self.consumed.contains(&auth_id)
    }

    /// Audit log of every released withdrawal, oldest first
    pub fn withdrawals(&self) -> &[WithdrawalRecord] {
        &self.withdrawals
    }

    /// Accept a deposit of `amount` into custody.
    ///
    /// No business validation; any party may deposit. The only rejection is
    /// arithmetic: a deposit that would overflow the balance leaves the
    /// vault unchanged. Returns the new balance.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, VaultError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(VaultError::BalanceOverflow)?;
        info!(vault = %self.address, amount = %amount, balance = %self.balance, "deposit accepted");
        Ok(self.balance)
    }

    /// Release `amount` to `recipient` under a single-use authorization.
    ///
    /// The order of operations is load-bearing:
    ///
    /// 1. a consumed `auth_id` fails with [`VaultError::AlreadyUsed`] before
    ///    anything else is looked at;
    /// 2. the authority validates (vault, recipient, amount, auth_id,
    ///    signature) at call time, else [`VaultError::InvalidAuthorization`];
    /// 3. the balance must cover `amount`, else
    ///    [`VaultError::InsufficientFunds`];
    /// 4. the consumed-flag and the debit are committed *before* the
    ///    settlement credit runs, so nothing reached during value movement
    ///    can observe the authorization as still unused;
    /// 5. a refused credit rolls the commit back and fails with
    ///    [`VaultError::TransferFailed`] — every failure path leaves the
    ///    vault exactly as it was.
    pub fn withdraw(
        &mut self,
        settlement: &mut dyn Settlement,
        recipient: Address,
        amount: Amount,
        auth_id: AuthId,
        signature: &RecoverableSignature,
    ) -> Result<WithdrawalRecord, VaultError> {
        if self.consumed.contains(&auth_id) {
            warn!(vault = %self.address, auth_id = %auth_id, "replayed authorization rejected");
            return Err(VaultError::AlreadyUsed { auth_id });
        }

        if !self
            .authority
            .validate(self.address, recipient, amount, auth_id, signature)
        {
            warn!(vault = %self.address, auth_id = %auth_id, "authorization failed validation");
            return Err(VaultError::InvalidAuthorization);
        }

        if self.balance < amount {
            warn!(
                vault = %self.address,
                requested = %amount,
                available = %self.balance,
                "withdrawal exceeds balance"
            );
            return Err(VaultError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        // Commit the consumed-flag and the debit before value moves.
        self.consumed.insert(auth_id);
        self.balance -= amount;

        if let Err(err) = settlement.credit(recipient, amount) {
            // Roll the whole transaction back; the id stays unconsumed.
            self.consumed.remove(&auth_id);
            self.balance += amount;
            warn!(vault = %self.address, auth_id = %auth_id, %err, "settlement refused the credit");
            return Err(VaultError::TransferFailed(err));
        }

        let record = WithdrawalRecord {
            recipient,
            amount,
            auth_id,
        };
        self.withdrawals.push(record);
        info!(
            vault = %self.address,
            recipient = %record.recipient,
            amount = %record.amount,
            auth_id = %record.auth_id,
            "withdrawal released"
        );
        Ok(record)
    }

    /// [`withdraw`](Self::withdraw) with the arguments taken from a token.
    pub fn withdraw_token(
        &mut self,
        settlement: &mut dyn Settlement,
        token: &AuthorizationToken,
    ) -> Result<WithdrawalRecord, VaultError> {
        self.withdraw(
            settlement,
            token.recipient,
            token.amount,
            token.auth_id,
            &token.signature,
        )
    }
}
