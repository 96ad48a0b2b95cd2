//! Clients for the MEV-Share relay and matchmaker.
//!
//! - [`RpcClient`] - Signed JSON-RPC: bundles, simulation, private transactions
//! - [`EventClient`] - Hint stream subscription and history queries
//!
//! The two clients share no state. Only the RPC client needs a [`Signer`].

mod history;
mod rpc;
mod signer;
mod stream;

pub use rpc::{MAINNET, NetworkConfig, RpcClient, SEPOLIA, SIGNATURE_HEADER};
pub use signer::{InMemorySigner, Signer};
pub use stream::{EventClient, Subscription};
