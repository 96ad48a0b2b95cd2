//! Error types for mev-share-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) - Main error type, returned by every client operation
//!   - [`TransportError`] - Network failures, unexpected HTTP status, malformed envelopes
//!   - `Remote` - The JSON-RPC response carried an `error` object
//!   - [`SignerError`] - Signing operation failures
//!   - [`ParseKeyError`] - Invalid private key format
//! - [`DecodeError`] - A single stream frame failed to decode. Only ever seen
//!   inside [`Event::Error`](crate::Event::Error), never fatal to a subscription.
//!
//! # Example
//!
//! ```rust,no_run
//! use mev_share_kit::*;
//!
//! # async fn example(client: RpcClient, bundle: Bundle) -> Result<(), Error> {
//! match client.send_bundle(bundle).await {
//!     Ok(response) => println!("Bundle hash: {}", response.bundle_hash),
//!     Err(Error::Remote { code, message }) => {
//!         println!("Relay rejected the bundle ({code}): {message}");
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Error parsing a secp256k1 private key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid secret key: scalar is zero or out of range")]
    InvalidScalar,
}

/// Error during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

// ============================================================================
// Transport Errors
// ============================================================================

/// Network, HTTP and envelope-level failures.
///
/// These are always surfaced to the caller and never retried internally.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Create an unexpected-status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        TransportError::Status {
            status,
            body: body.into(),
        }
    }

    /// The HTTP status code, if the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ============================================================================
// Stream Decode Errors
// ============================================================================

/// A stream frame that could not be decoded into a hint.
#[derive(Debug, Error)]
#[error("Failed to decode hint: {source}")]
pub struct DecodeError {
    line: String,
    #[source]
    source: serde_json::Error,
}

impl DecodeError {
    pub(crate) fn new(line: impl Into<String>, source: serde_json::Error) -> Self {
        Self {
            line: line.into(),
            source,
        }
    }

    /// The frame payload that failed to decode, with any `data:` prefix removed.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The underlying JSON error.
    pub fn json_error(&self) -> &serde_json::Error {
        &self.source
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for mev-share-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Transport ───
    #[error(transparent)]
    Transport(#[from] TransportError),

    // ─── Remote ───
    #[error("Remote error: {message} (code: {code})")]
    Remote { code: i64, message: String },

    // ─── Signing ───
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    // ─── Keys ───
    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),
}

impl Error {
    /// Create a remote (JSON-RPC level) error.
    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        Error::Remote {
            code,
            message: message.into(),
        }
    }

    /// Returns true if the service answered with a JSON-RPC error object.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote { .. })
    }

    /// Returns true if the request failed before a JSON-RPC answer was decoded.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(TransportError::Http(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Transport(TransportError::Json(e))
    }
}
