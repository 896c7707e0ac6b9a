//! Off-chain token signing
//!
//! The issuer is the "server side" of the protocol: it holds a secp256k1
//! signing key and turns a (vault, recipient, amount, auth_id) tuple into a
//! signed [`AuthorizationToken`]. Issuing is pure signing; whether the
//! resulting token is honored depends entirely on the issuer's identity
//! being trusted by the registry when the vault validates it.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use tracing::debug;

use strongbox_core::{
    withdrawal_digest, Address, Amount, AuthId, AuthorizationToken, RecoverableSignature,
};

/// Errors produced when constructing an issuer or signing a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IssuerError {
    /// Supplied secret bytes are not a valid secp256k1 scalar
    #[error("invalid secret key bytes")]
    InvalidSecretKey,

    /// The signing operation itself failed
    #[error("signing failed")]
    SigningFailed,
}

/// An authorization-token signer.
#[derive(Debug)]
pub struct TokenIssuer {
    signing_key: SigningKey,
}

impl TokenIssuer {
    /// Generate an issuer with a fresh random keypair
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Construct an issuer from 32 secret-key bytes
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, IssuerError> {
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| IssuerError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// The identity this issuer signs as
    pub fn address(&self) -> Address {
        Address::from_public_key(self.signing_key.verifying_key())
    }

    /// Sign a single-use authorization for withdrawing `amount` to
    /// `recipient` from the vault identified by `vault`.
    ///
    /// The caller supplies the `auth_id`; issuing the same id twice yields
    /// tokens of which at most one can ever be consumed.
    pub fn issue(
        &self,
        vault: Address,
        recipient: Address,
        amount: Amount,
        auth_id: AuthId,
    ) -> Result<AuthorizationToken, IssuerError> {
        let digest = withdrawal_digest(vault, recipient, amount, auth_id);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&digest)
            .map_err(|_| IssuerError::SigningFailed)?;
        debug!(vault = %vault, recipient = %recipient, auth_id = %auth_id, "authorization issued");
        Ok(AuthorizationToken {
            recipient,
            amount,
            auth_id,
            signature: RecoverableSignature::from_parts(signature, recovery_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_recovers_to_issuer() {
        let issuer = TokenIssuer::random();
        let vault = Address::new([1; 20]);
        let recipient = Address::new([2; 20]);
        let auth_id = AuthId::from_label("issue");

        let token = issuer.issue(vault, recipient, 250, auth_id).unwrap();
        assert_eq!(token.recipient, recipient);
        assert_eq!(token.amount, 250);
        assert_eq!(token.auth_id, auth_id);

        let digest = withdrawal_digest(vault, recipient, 250, auth_id);
        assert_eq!(token.signature.recover(&digest).unwrap(), issuer.address());
    }

    #[test]
    fn test_deterministic_issuer_from_secret_bytes() {
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let issuer = TokenIssuer::from_secret_bytes(&secret).unwrap();
        assert_eq!(
            issuer.address(),
            Address::from_hex("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap()
        );
    }

    #[test]
    fn test_rejects_invalid_secret_bytes() {
        // zero is not a valid scalar
        assert_eq!(
            TokenIssuer::from_secret_bytes(&[0u8; 32]).unwrap_err(),
            IssuerError::InvalidSecretKey
        );
    }
}
