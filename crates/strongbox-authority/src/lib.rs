//! Strongbox Authority - trusted-signer registry and token issuer
//!
//! The authority side of the custody protocol has two halves:
//!
//! - [`SignerRegistry`]: the set of identities trusted to sign authorization
//!   tokens, mutable only by its owner, implementing the core [`Authority`]
//!   trait the vault validates against.
//! - [`TokenIssuer`]: the off-chain signing half that turns a keypair and a
//!   (vault, recipient, amount, auth_id) tuple into a complete
//!   [`AuthorizationToken`](strongbox_core::AuthorizationToken).
//!
//! Trust is evaluated at validation time: revoking a signer invalidates
//! every token it signed that has not yet been consumed.

#![forbid(unsafe_code)]

/// Owner-gated trusted-signer registry
pub mod registry;

/// Off-chain token signing
pub mod issuer;

pub use issuer::{IssuerError, TokenIssuer};
pub use registry::{RegistryError, SignerRegistry};

pub use strongbox_core::{Authority, AuthorityRef};
