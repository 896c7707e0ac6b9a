//! Strongbox Vault - replay-protected fund custody
//!
//! A [`Vault`] holds a balance and releases funds only when presented with a
//! single-use authorization token that validates against the authority the
//! vault was constructed with. Every authorization id is consumed exactly
//! once; the consumed-flag is committed before value moves, so the release
//! path can never be re-entered into a double spend.
//!
//! Value leaves the vault through the [`Settlement`] seam. The crate ships
//! [`MemoryLedger`], an in-memory settlement target; embedders provide their
//! own implementation to route value elsewhere.

#![forbid(unsafe_code)]

/// Vault rejection taxonomy
pub mod error;

/// Value-movement seam and the in-memory ledger
pub mod settlement;

/// The custody vault state machine
pub mod vault;

pub use error::VaultError;
pub use settlement::{MemoryLedger, Settlement, SettlementError};
pub use vault::{Vault, WithdrawalRecord};

pub use strongbox_core::{Address, Amount, AuthId, AuthorityRef, AuthorizationToken};
