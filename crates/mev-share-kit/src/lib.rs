//! A typed Rust client for the MEV-Share matchmaker.
//!
//! **mev-share-kit** covers the searcher side of MEV-Share:
//!
//! - sending and simulating bundles (`mev_sendBundle`, `mev_simBundle`)
//! - sending private transactions (`eth_sendPrivateTransaction`)
//! - streaming transaction hints over server-sent events
//! - querying historical hints
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mev_share_kit::*;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mev_share_kit::Error> {
//!     let events = EventClient::new(MAINNET.stream_url);
//!     let relay = RpcClient::new(MAINNET.relay_url, InMemorySigner::random());
//!
//!     let (tx, mut rx) = mpsc::channel(64);
//!     let subscription = events.subscribe(tx).await?;
//!
//!     // Backrun the first hint we see.
//!     if let Some(Event::Data(hint)) = rx.recv().await {
//!         let bundle = Bundle::new(18_000_000)
//!             .max_block(18_000_003)
//!             .hash(hint.hash)
//!             .tx(vec![0x02, 0xf8], false);
//!         let response = relay.send_bundle(bundle).await?;
//!         println!("bundle hash: {}", response.bundle_hash);
//!     }
//!
//!     subscription.stop();
//!     Ok(())
//! }
//! ```
//!
//! # Core Types
//!
//! - [`Bundle`], [`BundleItem`] - Bundle body, inclusion and privacy settings
//! - [`Hints`] - What the matchmaker may share about your transactions
//! - [`MatchmakerEvent`] - A hint received from the stream
//! - [`SecretKey`], [`Signature`] - secp256k1 identity used to sign requests
//! - [`Address`], [`B256`], [`Bytes`], [`U256`] - Re-exported from `alloy-primitives`
//!
//! # Hex Decoding
//!
//! Every binary or numeric field the matchmaker sends as `0x`-hex is decoded
//! before it reaches you. `""` and `"0x"` decode to empty bytes or zero:
//!
//! ```
//! use mev_share_kit::decode_hex;
//!
//! assert!(decode_hex("0x").unwrap().is_empty());
//! assert_eq!(decode_hex("0x0102").unwrap(), vec![1, 2]);
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{DecodeError, Error, ParseKeyError, SignerError, TransportError};
pub use types::*;

// Re-export client types
pub use client::{
    EventClient, InMemorySigner, MAINNET, NetworkConfig, RpcClient, SEPOLIA, SIGNATURE_HEADER,
    Signer, Subscription,
};

// Re-export primitive types
pub use alloy_primitives::{Address, B256, Bytes, FixedBytes, U256};
