//! Signer trait and the in-memory implementation.
//!
//! A `Signer` owns a secp256k1 identity: it knows its Ethereum address and
//! signs 32-byte digests. The RPC client uses it to authenticate every
//! request with an `X-Flashbots-Signature` header.
//!
//! # Example
//!
//! ```rust,no_run
//! use mev_share_kit::{InMemorySigner, RpcClient};
//!
//! # fn example() -> Result<(), mev_share_kit::Error> {
//! let signer = InMemorySigner::new(
//!     "0x0000000000000000000000000000000000000000000000000000000000000001",
//! )?;
//! let client = RpcClient::new("https://relay.flashbots.net", signer);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use alloy_primitives::{Address, B256};

use crate::error::SignerError;
use crate::types::{SecretKey, Signature};

// ============================================================================
// Signer Trait
// ============================================================================

/// Trait for signing request digests.
///
/// Implementations must produce 65-byte `r || s || v` signatures that
/// recover to [`Signer::address`].
///
/// # Example Implementation
///
/// ```rust,ignore
/// use mev_share_kit::{Address, B256, SecretKey, Signature, Signer, SignerError};
///
/// struct VaultSigner {
///     key: SecretKey,
/// }
///
/// impl Signer for VaultSigner {
///     fn address(&self) -> Address {
///         self.key.address()
///     }
///
///     fn sign_hash(&self, hash: &B256) -> Result<Signature, SignerError> {
///         self.key.sign_hash(hash)
///     }
/// }
/// ```
pub trait Signer: Send + Sync {
    /// The address requests are attributed to.
    fn address(&self) -> Address;

    /// Sign a 32-byte digest as-is.
    fn sign_hash(&self, hash: &B256) -> Result<Signature, SignerError>;
}

/// Implement `Signer` for `Arc<dyn Signer>` for convenience.
impl Signer for Arc<dyn Signer> {
    fn address(&self) -> Address {
        (**self).address()
    }

    fn sign_hash(&self, hash: &B256) -> Result<Signature, SignerError> {
        (**self).sign_hash(hash)
    }
}

// ============================================================================
// InMemorySigner
// ============================================================================

/// A signer with a single key stored in memory.
///
/// Suitable for searcher bots and tests. The address is derived once at
/// construction.
#[derive(Clone)]
pub struct InMemorySigner {
    secret_key: SecretKey,
    address: Address,
}

impl InMemorySigner {
    /// Create a signer from a hex-encoded private key (with or without `0x`).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not 32 bytes of valid hex or is not a
    /// valid secp256k1 scalar.
    pub fn new(secret_key: impl AsRef<str>) -> Result<Self, crate::error::Error> {
        let secret_key: SecretKey = secret_key.as_ref().parse()?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Create a signer from a SecretKey directly.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let address = secret_key.address();
        Self {
            secret_key,
            address,
        }
    }

    /// Create a signer with a freshly generated key.
    pub fn random() -> Self {
        Self::from_secret_key(SecretKey::random())
    }
}

impl std::fmt::Debug for InMemorySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySigner")
            .field("address", &self.address)
            .finish()
    }
}

impl Signer for InMemorySigner {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_hash(&self, hash: &B256) -> Result<Signature, SignerError> {
        self.secret_key.sign_hash(hash)
    }
}
