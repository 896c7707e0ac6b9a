//! Strongbox Core - shared protocol types
//!
//! This crate provides the foundational types shared by the authorization
//! authority and the custody vault: identity and authorization-id newtypes,
//! the canonical withdrawal digest, the recoverable signature format, and the
//! `Authority` trait seam the vault validates against.
//!
//! Nothing in this crate holds mutable state. The authority and vault crates
//! build their state machines on top of these pure types.

#![forbid(unsafe_code)]

/// Identity and authorization-id newtypes
pub mod identifiers;

/// Canonical message hashing shared by signer and verifier
pub mod digest;

/// Recoverable secp256k1 signatures
pub mod signature;

/// Single-use authorization tokens
pub mod token;

/// Authority trait seam
pub mod authority;

pub use authority::{Authority, AuthorityRef};
pub use digest::{keccak256, withdrawal_digest};
pub use identifiers::{Address, AuthId, IdentifierError};
pub use signature::{RecoverableSignature, SignatureError};
pub use token::AuthorizationToken;

/// Value units moved by the custody protocol.
///
/// Encoded as a fixed-width 16-byte big-endian integer inside the canonical
/// withdrawal digest.
pub type Amount = u128;
