//! Canonical message hashing for authorization tokens
//!
//! The signer and the verifier must agree byte-for-byte on the message that
//! binds an authorization to one vault, one recipient, one amount, and one
//! authorization id. This module is the single definition of that encoding.

use sha3::{Digest, Keccak256};

use crate::identifiers::{Address, AuthId};
use crate::Amount;

/// Keccak-256 hash of arbitrary bytes
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the canonical withdrawal digest.
///
/// The digest is keccak-256 over the packed encoding
/// `vault(20) || recipient(20) || amount(16, big-endian) || auth_id(32)`.
/// Field order is fixed; changing any field yields a different digest, which
/// makes a signature over the digest bind all four fields at once.
pub fn withdrawal_digest(
    vault: Address,
    recipient: Address,
    amount: Amount,
    auth_id: AuthId,
) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(vault.as_bytes());
    hasher.update(recipient.as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.update(auth_id.as_bytes());
    hasher.finalize().into()
}
