//! `eth_sendPrivateTransaction` parameters.

use serde::{Deserialize, Serialize};

use super::encoding::u64_hex;
use super::hints::Hints;

/// Caller-facing options for a private transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrivateTxOptions {
    /// What the matchmaker may reveal about the transaction.
    pub hints: Hints,
    /// Last block the transaction may be included in.
    pub max_block_number: Option<u64>,
    /// Builders allowed to receive the transaction. Empty means the relay default.
    pub builders: Vec<String>,
}

impl PrivateTxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hints(mut self, hints: Hints) -> Self {
        self.hints = hints;
        self
    }

    pub fn max_block_number(mut self, block: u64) -> Self {
        self.max_block_number = Some(block);
        self
    }

    pub fn builders<I, S>(mut self, builders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builders = builders.into_iter().map(Into::into).collect();
        self
    }
}

/// The single positional parameter of `eth_sendPrivateTransaction`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateTxParams {
    /// Signed raw transaction, hex encoded.
    pub tx: String,
    #[serde(
        default,
        with = "u64_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_block_number: Option<u64>,
    pub preferences: PrivateTxPreferences,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateTxPreferences {
    /// Always `true`: the transaction is shared with every allowed builder.
    pub fast: bool,
    pub privacy: PrivateTxPrivacy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub builders: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateTxPrivacy {
    #[serde(default, skip_serializing_if = "Hints::is_empty")]
    pub hints: Hints,
}

/// Build the request parameter for a signed raw transaction.
///
/// # Example
///
/// ```rust
/// use mev_share_kit::{encode_private_tx_params, Hints, PrivateTxOptions};
///
/// let options = PrivateTxOptions::new()
///     .hints(Hints { call_data: true, logs: true, ..Default::default() })
///     .max_block_number(100)
///     .builders(["b1", "b2"]);
///
/// let params = encode_private_tx_params("0xabc", &options);
/// assert_eq!(
///     serde_json::to_string(&params).unwrap(),
///     r#"{"tx":"0xabc","maxBlockNumber":"0x64","preferences":{"fast":true,"privacy":{"hints":["calldata","logs"]},"builders":["b1","b2"]}}"#
/// );
/// ```
pub fn encode_private_tx_params(signed_raw_tx: &str, options: &PrivateTxOptions) -> PrivateTxParams {
    PrivateTxParams {
        tx: signed_raw_tx.to_string(),
        max_block_number: options.max_block_number,
        preferences: PrivateTxPreferences {
            fast: true,
            privacy: PrivateTxPrivacy {
                hints: options.hints,
            },
            builders: options.builders.clone(),
        },
    }
}
