//! Recoverable secp256k1 signatures
//!
//! Authorization tokens carry a 65-byte signature `r || s || v` from which
//! the signer identity is recovered directly, so verification never needs an
//! externally supplied public key. Parsing is strict: non-canonical `s`
//! scalars and unknown recovery ids are rejected up front, and recovery
//! failures surface as errors the authority folds into a negative
//! validation result.

use std::fmt;

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::identifiers::Address;

/// Errors produced when parsing or applying a recoverable signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Signature blob was not exactly 65 bytes
    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),

    /// `r` or `s` is zero or not a valid curve scalar
    #[error("invalid signature scalars")]
    InvalidScalars,

    /// `s` lies in the upper half of the curve order
    #[error("non-canonical signature: s scalar not normalized")]
    NonCanonical,

    /// Trailing recovery byte is not a recognized recovery id
    #[error("invalid recovery id byte: {0}")]
    InvalidRecoveryId(u8),

    /// No public key could be recovered from (digest, signature)
    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// A 65-byte recoverable ECDSA signature over secp256k1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableSignature {
    signature: Signature,
    recovery_id: RecoveryId,
}

impl RecoverableSignature {
    /// Assemble a signature from its parsed parts.
    ///
    /// The `s` scalar must already be normalized to the lower half of the
    /// curve order; signatures produced by `sign_prehash_recoverable` are.
    pub fn from_parts(signature: Signature, recovery_id: RecoveryId) -> Self {
        Self {
            signature,
            recovery_id,
        }
    }

    /// Parse a signature from the 65-byte wire format `r || s || v`.
    ///
    /// Accepts recovery bytes 0/1 as well as the legacy 27/28 convention.
    pub fn from_bytes(bytes: &[u8; 65]) -> Result<Self, SignatureError> {
        let signature =
            Signature::from_slice(&bytes[..64]).map_err(|_| SignatureError::InvalidScalars)?;
        if signature.normalize_s().is_some() {
            return Err(SignatureError::NonCanonical);
        }
        let v = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            other => return Err(SignatureError::InvalidRecoveryId(other)),
        };
        let recovery_id =
            RecoveryId::from_byte(v).ok_or(SignatureError::InvalidRecoveryId(bytes[64]))?;
        Ok(Self {
            signature,
            recovery_id,
        })
    }

    /// Parse a signature from a byte slice of arbitrary length
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != 65 {
            return Err(SignatureError::InvalidLength(bytes.len()));
        }
        let mut fixed = [0u8; 65];
        fixed.copy_from_slice(bytes);
        Self::from_bytes(&fixed)
    }

    /// Serialize to the 65-byte wire format `r || s || v`
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(self.signature.to_bytes().as_slice());
        out[64] = self.recovery_id.to_byte();
        out
    }

    /// Recover the signer identity from a message digest.
    ///
    /// Recovery needs no public key; the identity is derived from the key
    /// the signature itself determines for the given digest. A signature
    /// applied to a digest other than the one it was produced for recovers
    /// to a different identity, which is what makes the digest binding.
    pub fn recover(&self, digest: &[u8; 32]) -> Result<Address, SignatureError> {
        let key = VerifyingKey::recover_from_prehash(digest, &self.signature, self.recovery_id)
            .map_err(|_| SignatureError::RecoveryFailed)?;
        Ok(Address::from_public_key(&key))
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        let decoded = hex::decode(stripped).map_err(serde::de::Error::custom)?;
        Self::from_slice(&decoded).map_err(serde::de::Error::custom)
    }
}
