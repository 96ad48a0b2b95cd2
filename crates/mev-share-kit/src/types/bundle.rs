//! Bundle submission and simulation types (`mev_sendBundle`, `mev_simBundle`).

use std::fmt;

use alloy_primitives::{Address, B256, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::encoding::{deserialize_quantity, null_default, u64_hex};
use super::event::Log;
use super::hints::Hints;

/// Protocol version sent with every bundle.
pub const BUNDLE_VERSION: &str = "v0.1";

// ============================================================================
// Bundle
// ============================================================================

/// A MEV-Share bundle: an ordered list of transactions and transaction
/// references to be included atomically.
///
/// # Example
///
/// ```rust
/// use mev_share_kit::{Bundle, Hints};
/// use alloy_primitives::{B256, Bytes};
///
/// let bundle = Bundle::new(17_891_729)
///     .max_block(17_891_731)
///     .hash(B256::repeat_byte(0x11))
///     .tx(Bytes::from_static(&[0x02, 0xf8]), false)
///     .hints(Hints { logs: true, ..Default::default() });
///
/// assert_eq!(bundle.body.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Protocol version. Always overwritten with [`BUNDLE_VERSION`] when sent.
    pub version: String,
    /// Blocks the bundle is valid for.
    pub inclusion: Inclusion,
    /// Bundle items, in execution order.
    pub body: Vec<BundleItem>,
    /// Refund requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<Validity>,
    /// What may be shared with searchers, and with which builders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<BundlePrivacy>,
}

impl Bundle {
    /// An empty bundle targeting `block`.
    pub fn new(block: u64) -> Self {
        Self {
            version: BUNDLE_VERSION.to_string(),
            inclusion: Inclusion {
                block,
                max_block: None,
            },
            body: Vec::new(),
            validity: None,
            privacy: None,
        }
    }

    /// Keep the bundle valid up to and including `max_block`.
    pub fn max_block(mut self, max_block: u64) -> Self {
        self.inclusion.max_block = Some(max_block);
        self
    }

    /// Append a body item.
    pub fn item(mut self, item: BundleItem) -> Self {
        self.body.push(item);
        self
    }

    /// Append a reference to a transaction seen on the hint stream.
    pub fn hash(self, hash: B256) -> Self {
        self.item(BundleItem::Hash { hash })
    }

    /// Append a signed raw transaction.
    pub fn tx(self, tx: impl Into<Bytes>, can_revert: bool) -> Self {
        self.item(BundleItem::Tx {
            tx: tx.into(),
            can_revert,
        })
    }

    /// Set refund requirements.
    pub fn validity(mut self, validity: Validity) -> Self {
        self.validity = Some(validity);
        self
    }

    /// Set the hints shared with searchers, keeping any builder allow-list.
    pub fn hints(mut self, hints: Hints) -> Self {
        self.privacy.get_or_insert_with(Default::default).hints = hints;
        self
    }

    /// Restrict the builders that may receive the bundle, keeping any hints.
    pub fn builders<I, S>(mut self, builders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.privacy.get_or_insert_with(Default::default).builders =
            builders.into_iter().map(Into::into).collect();
        self
    }
}

/// Block range a bundle may land in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inclusion {
    /// First block the bundle is valid for.
    #[serde(with = "u64_hex")]
    pub block: u64,
    /// Last block the bundle is valid for; defaults to `block` server-side.
    #[serde(
        default,
        with = "u64_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_block: Option<u64>,
}

/// One entry of a bundle body.
///
/// Serialized per variant: `{"hash":..}`, `{"tx":..,"canRevert":..}` or
/// `{"bundle":{..}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleItem {
    /// A transaction previously seen on the hint stream, referenced by hash.
    Hash { hash: B256 },
    /// A signed raw transaction.
    Tx {
        tx: Bytes,
        #[serde(rename = "canRevert", default, skip_serializing_if = "is_false")]
        can_revert: bool,
    },
    /// A nested bundle.
    Bundle { bundle: Box<Bundle> },
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Refund requirements of a bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validity {
    /// Refund shares owed to the body items that created the opportunity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refund: Vec<Refund>,
    /// How the bundle's own refund is split between addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refund_config: Vec<RefundConfig>,
}

/// Percentage of the bundle's value owed to one body item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    /// Index into the bundle body.
    pub body_idx: u64,
    /// Percentage (0-100).
    pub percent: u64,
}

/// Percentage of the refund paid to one address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundConfig {
    pub address: Address,
    pub percent: u64,
}

/// Bundle privacy preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlePrivacy {
    /// Hints shared with searchers.
    #[serde(default, skip_serializing_if = "Hints::is_empty")]
    pub hints: Hints,
    /// Builders allowed to receive the bundle.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub builders: Vec<String>,
}

/// Result of `mev_sendBundle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBundleResponse {
    pub bundle_hash: B256,
}

// ============================================================================
// Simulation
// ============================================================================

/// A block referenced by number or by hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockRef {
    Number(u64),
    Hash(B256),
}

impl From<u64> for BlockRef {
    fn from(number: u64) -> Self {
        BlockRef::Number(number)
    }
}

impl From<B256> for BlockRef {
    fn from(hash: B256) -> Self {
        BlockRef::Hash(hash)
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Number(n) => write!(f, "{n:#x}"),
            BlockRef::Hash(h) => write!(f, "{h}"),
        }
    }
}

impl Serialize for BlockRef {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockRef {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(d)?;
        // A 32-byte hash is 66 characters with its prefix; anything else is a number.
        if s.len() == 66 {
            s.parse().map(BlockRef::Hash).map_err(serde::de::Error::custom)
        } else {
            super::encoding::decode_u64(&s)
                .map(BlockRef::Number)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Overrides applied to the simulated block. Unset fields use the server's
/// defaults and are omitted from the request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimBundleOverrides {
    /// Block to simulate on top of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_block: Option<BlockRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<Address>,
    #[serde(
        default,
        with = "u64_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<u64>,
    #[serde(
        default,
        with = "u64_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub gas_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee: Option<U256>,
    /// Simulation timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Result of `mev_simBundle`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimBundleResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Block the simulation ran on top of.
    #[serde(default, with = "u64_hex")]
    pub state_block: u64,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub mev_gas_price: U256,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub profit: U256,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub refundable_value: U256,
    #[serde(default, with = "u64_hex")]
    pub gas_used: u64,
    /// Per-item logs, nested for sub-bundles.
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub logs: Vec<SimBundleLogs>,
}

/// Logs of one simulated body item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimBundleLogs {
    /// Logs emitted by a transaction item.
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tx_logs: Vec<Log>,
    /// Logs of a nested bundle item, one entry per nested body item.
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bundle_logs: Vec<SimBundleLogs>,
}
