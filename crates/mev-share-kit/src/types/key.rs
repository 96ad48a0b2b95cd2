//! Secp256k1 keys, signatures and Ethereum message hashing.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

pub use alloy_primitives::keccak256;
use alloy_primitives::{Address, B256, eip191_hash_message};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ParseKeyError, SignerError};

/// Length of a raw secp256k1 secret key.
pub const SECRET_KEY_LEN: usize = 32;

/// Length of a recoverable signature: `r || s || v`.
pub const SIGNATURE_LEN: usize = 65;

// ============================================================================
// Hashing
// ============================================================================

/// EIP-191 personal message digest:
/// `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`.
///
/// # Example
///
/// ```rust
/// use mev_share_kit::hash_message;
///
/// let digest = hash_message(b"hello world");
/// assert_eq!(
///     digest.to_string(),
///     "0xd9eba16ed0ecae432b71fe008c98cc872bb4cc214d3220a36f365326cf807d68"
/// );
/// ```
pub fn hash_message(message: impl AsRef<[u8]>) -> B256 {
    eip191_hash_message(message)
}

fn address_of(verifying_key: &VerifyingKey) -> Address {
    let point = verifying_key.to_encoded_point(false);
    // Skip the 0x04 SEC1 tag; the address is the last 20 bytes of the hash.
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash.as_slice()[12..])
}

// ============================================================================
// SecretKey
// ============================================================================

/// A secp256k1 secret key.
///
/// Parses from 32 bytes of hex, with or without a `0x` prefix.
///
/// # Example
///
/// ```rust
/// use mev_share_kit::SecretKey;
///
/// let key: SecretKey = "0x0000000000000000000000000000000000000000000000000000000000000001"
///     .parse()
///     .unwrap();
/// assert_eq!(
///     key.address().to_string(),
///     "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
/// );
/// ```
#[derive(Clone)]
pub struct SecretKey {
    inner: SigningKey,
}

impl SecretKey {
    /// Generate a new random key.
    pub fn random() -> Self {
        Self {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a secret key from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        if bytes.len() != SECRET_KEY_LEN {
            return Err(ParseKeyError::InvalidLength {
                expected: SECRET_KEY_LEN,
                actual: bytes.len(),
            });
        }
        let inner = SigningKey::from_slice(bytes).map_err(|_| ParseKeyError::InvalidScalar)?;
        Ok(Self { inner })
    }

    /// Raw key bytes.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LEN] {
        let mut out = [0u8; SECRET_KEY_LEN];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// The Ethereum address controlled by this key.
    pub fn address(&self) -> Address {
        address_of(self.inner.verifying_key())
    }

    /// Sign a 32-byte digest as-is (no further hashing).
    pub fn sign_hash(&self, hash: &B256) -> Result<Signature, SignerError> {
        let (signature, recovery_id) = self
            .inner
            .sign_prehash_recoverable(hash.as_slice())
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;

        let mut data = [0u8; SIGNATURE_LEN];
        data[..64].copy_from_slice(&signature.to_bytes());
        data[64] = recovery_id.to_byte();
        Ok(Signature { data })
    }

    /// Sign an EIP-191 personal message.
    pub fn sign_message(&self, message: impl AsRef<[u8]>) -> Result<Signature, SignerError> {
        self.sign_hash(&hash_message(message))
    }
}

impl FromStr for SecretKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl TryFrom<&str> for SecretKey {
    type Error = ParseKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({})", self.address())
    }
}

// ============================================================================
// Signature
// ============================================================================

/// A recoverable secp256k1 signature, `r || s || v`, with `v` the raw
/// recovery id (0 or 1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    data: [u8; SIGNATURE_LEN],
}

impl Signature {
    /// Create a signature from 65 raw bytes.
    pub fn from_bytes(data: [u8; SIGNATURE_LEN]) -> Self {
        Self { data }
    }

    /// Raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.data
    }

    /// The recovery byte. Both `0/1` and the legacy `27/28` forms are accepted
    /// when recovering.
    pub fn v(&self) -> u8 {
        self.data[64]
    }

    /// Recover the address that produced this signature over `hash`.
    pub fn recover_address(&self, hash: &B256) -> Result<Address, SignerError> {
        let v = match self.v() {
            v @ (27 | 28) => v - 27,
            v => v,
        };
        let recovery_id = RecoveryId::from_byte(v)
            .ok_or_else(|| SignerError::InvalidSignature(format!("invalid recovery id {v}")))?;
        let signature = EcdsaSignature::from_slice(&self.data[..64])
            .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
        let key = VerifyingKey::recover_from_prehash(hash.as_slice(), &signature, recovery_id)
            .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
        Ok(address_of(&key))
    }
}

impl FromStr for Signature {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
        let data: [u8; SIGNATURE_LEN] = bytes.as_slice().try_into().map_err(|_| {
            SignerError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self { data })
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.data))
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
