//! Core identifier types for the Strongbox protocol
//!
//! Identities are 20-byte addresses derived from secp256k1 public keys;
//! authorization ids are opaque 256-bit values chosen by the requester.

use std::fmt;
use std::str::FromStr;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::keccak256;

/// Errors produced when parsing identifiers from external input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IdentifierError {
    /// Input was not valid hexadecimal
    #[error("invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Input decoded to the wrong number of bytes
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    Length {
        /// Required byte length
        expected: usize,
        /// Byte length actually supplied
        actual: usize,
    },
}

/// A 20-byte identity in the custody protocol.
///
/// Addresses identify signers, recipients, and vaults alike. An address is
/// the last 20 bytes of the keccak-256 hash of the uncompressed secp256k1
/// public key, so signer identities can be recovered from signatures alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The reserved null identity. Never a valid signer.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create an address from raw bytes
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive the address of a secp256k1 public key
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        // skip the 0x04 uncompressed-point tag
        let digest = keccak256(&point.as_bytes()[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Parse an address from a hex string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(stripped)?;
        if decoded.len() != 20 {
            return Err(IdentifierError::Length {
                expected: 20,
                actual: decoded.len(),
            });
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Get the raw address bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the reserved null identity
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 256-bit single-use authorization identifier.
///
/// Chosen by the requester, bound into the signed message, and consumed by
/// the vault on first successful withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuthId(pub [u8; 32]);

impl AuthId {
    /// Create an authorization id from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive an authorization id from a human-chosen label
    pub fn from_label(label: &str) -> Self {
        Self(keccak256(label.as_bytes()))
    }

    /// Parse an authorization id from a hex string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(stripped)?;
        if decoded.len() != 32 {
            return Err(IdentifierError::Length {
                expected: 32,
                actual: decoded.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Get the raw id bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for AuthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AuthId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for AuthId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for AuthId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AuthId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_round_trip() {
        let addr = Address::new([0xab; 20]);
        let parsed = Address::from_hex(&addr.to_string()).unwrap();
        assert_eq!(addr, parsed);

        // prefix is optional on input
        let bare = hex::encode([0xab; 20]);
        assert_eq!(Address::from_hex(&bare).unwrap(), addr);
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        let err = Address::from_hex("0xdeadbeef").unwrap_err();
        assert_eq!(
            err,
            IdentifierError::Length {
                expected: 20,
                actual: 4
            }
        );
        assert!(Address::from_hex("0xzz").is_err());
    }

    #[test]
    fn test_known_key_derives_known_address() {
        // secp256k1 secret key 0x...01 has a widely published address
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let signing_key = k256::ecdsa::SigningKey::from_slice(&secret).unwrap();
        let addr = Address::from_public_key(signing_key.verifying_key());
        assert_eq!(
            addr,
            Address::from_hex("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap()
        );
    }

    #[test]
    fn test_auth_id_from_label_is_deterministic() {
        let a = AuthId::from_label("unique-id-123");
        let b = AuthId::from_label("unique-id-123");
        let c = AuthId::from_label("unique-id-456");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let addr = Address::new([0x11; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);

        let id = AuthId::from_label("serde");
        let json = serde_json::to_string(&id).unwrap();
        let back: AuthId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1; 20]).is_zero());
    }
}
