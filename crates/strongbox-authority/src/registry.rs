//! Owner-gated trusted-signer registry
//!
//! The registry holds the set of identities whose signatures authorize
//! withdrawals. Only the owner fixed at construction may change the set, and
//! the set never drops below one member. Validation is read-only and checks
//! membership at call time, so revocation takes effect immediately for every
//! token not yet consumed.

use std::collections::BTreeSet;

use parking_lot::RwLock;
use tracing::{debug, info};

use strongbox_core::{
    withdrawal_digest, Address, Amount, AuthId, Authority, RecoverableSignature,
};

/// Errors produced by registry administration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Caller is not the registry owner
    #[error("caller is not the registry owner")]
    NotOwner,

    /// The null identity can never be owner or signer
    #[error("the zero address is not a valid identity")]
    NullIdentity,

    /// Removing this signer would empty the trusted set
    #[error("cannot remove the last trusted signer")]
    LastSigner,
}

/// The set of identities trusted to sign authorization tokens.
///
/// The owner is fixed at construction and seeded as the initial trusted
/// signer. Mutation goes through [`add_signer`](Self::add_signer) and
/// [`remove_signer`](Self::remove_signer), both gated on the caller being
/// the owner; validation goes through the [`Authority`] trait.
#[derive(Debug)]
pub struct SignerRegistry {
    owner: Address,
    trusted: RwLock<BTreeSet<Address>>,
}

impl SignerRegistry {
    /// Create a registry owned by `owner`, with `owner` as the initial
    /// trusted signer.
    pub fn new(owner: Address) -> Result<Self, RegistryError> {
        if owner.is_zero() {
            return Err(RegistryError::NullIdentity);
        }
        let mut trusted = BTreeSet::new();
        trusted.insert(owner);
        Ok(Self {
            owner,
            trusted: RwLock::new(trusted),
        })
    }

    /// The identity allowed to mutate the trusted set
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Number of currently trusted signers
    pub fn signer_count(&self) -> usize {
        self.trusted.read().len()
    }

    /// Add `signer` to the trusted set. Owner only.
    pub fn add_signer(&self, caller: Address, signer: Address) -> Result<(), RegistryError> {
        if caller != self.owner {
            return Err(RegistryError::NotOwner);
        }
        if signer.is_zero() {
            return Err(RegistryError::NullIdentity);
        }
        self.trusted.write().insert(signer);
        info!(signer = %signer, "trusted signer added");
        Ok(())
    }

    /// Remove `signer` from the trusted set. Owner only.
    ///
    /// Removing an identity that is not in the set succeeds as a no-op.
    /// Removing the final member is rejected so the registry always has at
    /// least one trusted signer.
    pub fn remove_signer(&self, caller: Address, signer: Address) -> Result<(), RegistryError> {
        if caller != self.owner {
            return Err(RegistryError::NotOwner);
        }
        if signer.is_zero() {
            return Err(RegistryError::NullIdentity);
        }
        let mut trusted = self.trusted.write();
        if trusted.contains(&signer) && trusted.len() == 1 {
            return Err(RegistryError::LastSigner);
        }
        if trusted.remove(&signer) {
            info!(signer = %signer, "trusted signer removed");
        }
        Ok(())
    }
}

impl Authority for SignerRegistry {
    fn is_trusted_signer(&self, identity: Address) -> bool {
        self.trusted.read().contains(&identity)
    }

    fn validate(
        &self,
        vault: Address,
        recipient: Address,
        amount: Amount,
        auth_id: AuthId,
        signature: &RecoverableSignature,
    ) -> bool {
        let digest = withdrawal_digest(vault, recipient, amount, auth_id);
        let signer = match signature.recover(&digest) {
            Ok(signer) => signer,
            Err(err) => {
                debug!(%err, "authorization signature did not recover");
                return false;
            }
        };
        let trusted = self.is_trusted_signer(signer);
        if !trusted {
            debug!(signer = %signer, "recovered signer is not trusted");
        }
        trusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::TokenIssuer;

    fn registry_with_issuer() -> (SignerRegistry, TokenIssuer) {
        let issuer = TokenIssuer::random();
        let registry = SignerRegistry::new(issuer.address()).unwrap();
        (registry, issuer)
    }

    #[test]
    fn test_owner_is_initial_trusted_signer() {
        let (registry, issuer) = registry_with_issuer();
        assert_eq!(registry.owner(), issuer.address());
        assert!(registry.is_trusted_signer(issuer.address()));
        assert_eq!(registry.signer_count(), 1);
    }

    #[test]
    fn test_rejects_zero_owner() {
        assert_eq!(
            SignerRegistry::new(Address::ZERO).unwrap_err(),
            RegistryError::NullIdentity
        );
    }

    #[test]
    fn test_only_owner_mutates_signer_set() {
        let (registry, _) = registry_with_issuer();
        let outsider = Address::new([9; 20]);
        let candidate = Address::new([5; 20]);

        assert_eq!(
            registry.add_signer(outsider, candidate),
            Err(RegistryError::NotOwner)
        );
        assert_eq!(
            registry.remove_signer(outsider, candidate),
            Err(RegistryError::NotOwner)
        );

        registry.add_signer(registry.owner(), candidate).unwrap();
        assert!(registry.is_trusted_signer(candidate));
        registry.remove_signer(registry.owner(), candidate).unwrap();
        assert!(!registry.is_trusted_signer(candidate));
    }

    #[test]
    fn test_rejects_zero_signer() {
        let (registry, _) = registry_with_issuer();
        assert_eq!(
            registry.add_signer(registry.owner(), Address::ZERO),
            Err(RegistryError::NullIdentity)
        );
    }

    #[test]
    fn test_keeps_at_least_one_signer() {
        let (registry, issuer) = registry_with_issuer();
        assert_eq!(
            registry.remove_signer(registry.owner(), issuer.address()),
            Err(RegistryError::LastSigner)
        );

        // with a second member the first becomes removable
        let second = Address::new([5; 20]);
        registry.add_signer(registry.owner(), second).unwrap();
        registry
            .remove_signer(registry.owner(), issuer.address())
            .unwrap();
        assert_eq!(registry.signer_count(), 1);
    }

    #[test]
    fn test_remove_absent_signer_is_noop() {
        let (registry, _) = registry_with_issuer();
        registry
            .remove_signer(registry.owner(), Address::new([5; 20]))
            .unwrap();
        assert_eq!(registry.signer_count(), 1);
    }

    #[test]
    fn test_validate_accepts_trusted_signature() {
        let (registry, issuer) = registry_with_issuer();
        let vault = Address::new([1; 20]);
        let recipient = Address::new([2; 20]);
        let auth_id = AuthId::from_label("validate-ok");
        let token = issuer.issue(vault, recipient, 100, auth_id).unwrap();

        assert!(registry.validate(vault, recipient, 100, auth_id, &token.signature));
    }

    #[test]
    fn test_validate_binds_every_field() {
        let (registry, issuer) = registry_with_issuer();
        let vault = Address::new([1; 20]);
        let recipient = Address::new([2; 20]);
        let auth_id = AuthId::from_label("validate-binding");
        let token = issuer.issue(vault, recipient, 100, auth_id).unwrap();
        let sig = &token.signature;

        let other = Address::new([9; 20]);
        assert!(!registry.validate(other, recipient, 100, auth_id, sig));
        assert!(!registry.validate(vault, other, 100, auth_id, sig));
        assert!(!registry.validate(vault, recipient, 101, auth_id, sig));
        assert!(!registry.validate(vault, recipient, 100, AuthId::from_label("x"), sig));
    }

    #[test]
    fn test_validate_rejects_untrusted_signer() {
        let (registry, _) = registry_with_issuer();
        let stranger = TokenIssuer::random();
        let vault = Address::new([1; 20]);
        let recipient = Address::new([2; 20]);
        let auth_id = AuthId::from_label("untrusted");
        let token = stranger.issue(vault, recipient, 100, auth_id).unwrap();

        assert!(!registry.validate(vault, recipient, 100, auth_id, &token.signature));
    }

    #[test]
    fn test_trust_is_evaluated_at_validation_time() {
        let (registry, owner_issuer) = registry_with_issuer();
        let delegate = TokenIssuer::random();
        registry
            .add_signer(registry.owner(), delegate.address())
            .unwrap();

        let vault = Address::new([1; 20]);
        let recipient = Address::new([2; 20]);
        let auth_id = AuthId::from_label("revocation");
        let token = delegate.issue(vault, recipient, 100, auth_id).unwrap();
        assert!(registry.validate(vault, recipient, 100, auth_id, &token.signature));

        registry
            .remove_signer(registry.owner(), delegate.address())
            .unwrap();
        assert!(!registry.validate(vault, recipient, 100, auth_id, &token.signature));

        registry
            .add_signer(registry.owner(), delegate.address())
            .unwrap();
        assert!(registry.validate(vault, recipient, 100, auth_id, &token.signature));

        // unrelated to the owner's own signing power
        let own = owner_issuer.issue(vault, recipient, 1, auth_id).unwrap();
        assert!(registry.validate(vault, recipient, 1, auth_id, &own.signature));
    }
}
