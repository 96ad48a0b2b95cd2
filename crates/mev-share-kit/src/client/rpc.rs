//! Signed JSON-RPC client for the MEV-Share relay.

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use super::signer::Signer;
use crate::error::{Error, TransportError};
use crate::types::{
    BUNDLE_VERSION, Bundle, PrivateTxOptions, SendBundleResponse, SimBundleOverrides,
    SimBundleResponse, encode_private_tx_params, hash_message, keccak256,
};

/// Header carrying `<address>:<signature>` on every relay request.
pub const SIGNATURE_HEADER: &str = "X-Flashbots-Signature";

/// Network configuration presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint for bundles and private transactions.
    pub relay_url: &'static str,
    /// Base URL of the hint stream and history API.
    pub stream_url: &'static str,
    /// The network identifier (e.g., "mainnet", "sepolia").
    pub network_id: &'static str,
}

/// Mainnet configuration.
pub const MAINNET: NetworkConfig = NetworkConfig {
    relay_url: "https://relay.flashbots.net",
    stream_url: "https://mev-share.flashbots.net",
    network_id: "mainnet",
};

/// Sepolia configuration.
pub const SEPOLIA: NetworkConfig = NetworkConfig {
    relay_url: "https://relay-sepolia.flashbots.net",
    stream_url: "https://mev-share-sepolia.flashbots.net",
    network_id: "sepolia",
};

/// JSON-RPC request structure.
#[derive(Serialize)]
struct JsonRpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

/// JSON-RPC response structure.
#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Signed JSON-RPC client for the relay.
///
/// Every request body is signed by the client's [`Signer`] and sent with an
/// [`SIGNATURE_HEADER`] header. No retries are attempted.
///
/// # Example
///
/// ```rust,no_run
/// use mev_share_kit::{Bundle, InMemorySigner, RpcClient, MAINNET};
///
/// # async fn example() -> Result<(), mev_share_kit::Error> {
/// let signer = InMemorySigner::random();
/// let client = RpcClient::new(MAINNET.relay_url, signer);
///
/// let bundle = Bundle::new(17_891_729).tx(vec![0x02, 0xf8], false);
/// let response = client.send_bundle(bundle).await?;
/// println!("bundle hash: {}", response.bundle_hash);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    signer: Arc<dyn Signer>,
}

impl RpcClient {
    /// Create a new RPC client with the given URL and signer.
    pub fn new(url: impl Into<String>, signer: impl Signer + 'static) -> Self {
        Self::with_http_client(url, signer, reqwest::Client::new())
    }

    /// Create a new RPC client that sends through a caller-configured
    /// `reqwest::Client` (proxies, timeouts, TLS settings).
    pub fn with_http_client(
        url: impl Into<String>,
        signer: impl Signer + 'static,
        client: reqwest::Client,
    ) -> Self {
        Self {
            url: url.into(),
            client,
            signer: Arc::new(signer),
        }
    }

    /// Get the relay URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The address requests are signed with.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Compute the `X-Flashbots-Signature` value for a request body.
    ///
    /// The signed message is the lowercase `0x`-hex of `keccak256(body)`,
    /// hashed as an EIP-191 personal message. The result has the form
    /// `<checksummed address>:0x<65-byte signature>`.
    pub fn signature_header(&self, body: &[u8]) -> Result<String, Error> {
        let signature = self.signer.sign_hash(&signing_digest(body))?;
        Ok(format!("{}:{}", self.signer.address(), signature))
    }

    /// Send a signed JSON-RPC request and return the raw response body.
    ///
    /// The body is returned whatever the HTTP status; JSON-RPC errors are not
    /// interpreted here. `params` is serialized as-is and should be a
    /// positional array (a slice or tuple).
    pub async fn call_with_signature<P: Serialize>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Vec<u8>, Error> {
        let (_, body) = self.send_signed(method, params).await?;
        Ok(body)
    }

    /// Make a signed call and decode the JSON-RPC envelope.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, Error> {
        let (status, body) = self.send_signed(method, params).await?;
        decode_response(status, &body)
    }

    async fn send_signed<P: Serialize>(
        &self,
        method: &str,
        params: P,
    ) -> Result<(StatusCode, Vec<u8>), Error> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };
        let body = serde_json::to_vec(&request)?;
        let signature = self.signature_header(&body)?;

        debug!(method, url = %self.url, signer = %self.signer.address(), "sending signed request");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }

    // ========================================================================
    // MEV-Share methods
    // ========================================================================

    /// Submit a bundle with `mev_sendBundle`.
    ///
    /// The bundle version is always sent as [`BUNDLE_VERSION`].
    pub async fn send_bundle(&self, mut bundle: Bundle) -> Result<SendBundleResponse, Error> {
        bundle.version = BUNDLE_VERSION.to_string();
        self.call("mev_sendBundle", [&bundle]).await
    }

    /// Simulate a bundle with `mev_simBundle`.
    ///
    /// As with [`send_bundle`](Self::send_bundle), the version is always sent
    /// as [`BUNDLE_VERSION`].
    pub async fn sim_bundle(
        &self,
        mut bundle: Bundle,
        overrides: &SimBundleOverrides,
    ) -> Result<SimBundleResponse, Error> {
        bundle.version = BUNDLE_VERSION.to_string();
        self.call("mev_simBundle", (&bundle, overrides)).await
    }

    /// Submit a signed raw transaction with `eth_sendPrivateTransaction`.
    ///
    /// Returns the transaction hash.
    pub async fn send_private_transaction(
        &self,
        signed_raw_tx: &str,
        options: &PrivateTxOptions,
    ) -> Result<B256, Error> {
        let params = encode_private_tx_params(signed_raw_tx, options);
        self.call("eth_sendPrivateTransaction", [&params]).await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("url", &self.url)
            .field("address", &self.signer.address())
            .finish()
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// The digest actually signed for a request body.
fn signing_digest(body: &[u8]) -> B256 {
    let text = format!("0x{}", hex::encode(keccak256(body)));
    hash_message(text)
}

/// Decode a JSON-RPC envelope.
///
/// A present `error` always wins. A body that is not an envelope is reported
/// with the HTTP status when that status was not a success.
fn decode_response<R: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<R, Error> {
    let response: JsonRpcResponse<R> = match serde_json::from_slice(body) {
        Ok(response) => response,
        Err(_) if !status.is_success() => {
            return Err(TransportError::status(
                status.as_u16(),
                String::from_utf8_lossy(body),
            )
            .into());
        }
        Err(e) => return Err(TransportError::Json(e).into()),
    };

    if let Some(error) = response.error {
        return Err(Error::remote(error.code, error.message));
    }

    response.result.ok_or_else(|| {
        TransportError::InvalidResponse("Missing result in response".to_string()).into()
    })
}
