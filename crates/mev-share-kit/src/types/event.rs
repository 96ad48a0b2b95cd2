//! Hint records delivered by the matchmaker event stream.

use alloy_primitives::{Address, B256, Bytes, FixedBytes, U256};
use serde::{Deserialize, Serialize};

use super::encoding::{
    deserialize_bytes, deserialize_opt_quantity, deserialize_selector, is_empty_bytes, null_default,
};
use crate::error::DecodeError;

/// A log entry revealed by a hint.
///
/// `data` is decoded from hex; `""`, `"0x"` and a missing field all yield
/// empty bytes. A missing `address` is the zero address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    #[serde(default)]
    pub address: Address,
    #[serde(default, deserialize_with = "null_default")]
    pub topics: Vec<B256>,
    #[serde(
        default,
        deserialize_with = "deserialize_bytes",
        skip_serializing_if = "is_empty_bytes"
    )]
    pub data: Bytes,
}

/// What the matchmaker revealed about one pending transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransaction {
    /// Recipient, if the `contract_address` hint was shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// 4-byte selector, if shared.
    #[serde(
        default,
        deserialize_with = "deserialize_selector",
        skip_serializing_if = "Option::is_none"
    )]
    pub function_selector: Option<FixedBytes<4>>,
    /// Full calldata, if shared.
    #[serde(
        default,
        deserialize_with = "deserialize_bytes",
        skip_serializing_if = "is_empty_bytes"
    )]
    pub call_data: Bytes,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub mev_gas_price: Option<U256>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub gas_used: Option<U256>,
}

/// A hint about a pending transaction or bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchmakerEvent {
    /// Transaction or bundle hash; usable as a [`BundleItem::Hash`](crate::BundleItem::Hash).
    pub hash: B256,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub logs: Vec<Log>,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub txs: Vec<PendingTransaction>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub mev_gas_price: Option<U256>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub gas_used: Option<U256>,
}

/// One item delivered to a subscription's channel.
#[derive(Debug)]
pub enum Event {
    /// A decoded hint.
    Data(MatchmakerEvent),
    /// A frame that could not be decoded. The subscription keeps running.
    Error(DecodeError),
}

impl Event {
    /// Decode one frame payload.
    pub(crate) fn decode(payload: &str) -> Self {
        match serde_json::from_str(payload) {
            Ok(event) => Event::Data(event),
            Err(e) => Event::Error(DecodeError::new(payload, e)),
        }
    }

    /// The hint, if this is a data event.
    pub fn data(&self) -> Option<&MatchmakerEvent> {
        match self {
            Event::Data(event) => Some(event),
            Event::Error(_) => None,
        }
    }

    /// The decode error, if this is an error event.
    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            Event::Data(_) => None,
            Event::Error(e) => Some(e),
        }
    }

    /// Returns true if the frame failed to decode.
    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error(_))
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<MatchmakerEvent, DecodeError> {
        match self {
            Event::Data(event) => Ok(event),
            Event::Error(e) => Err(e),
        }
    }
}

impl From<Event> for Result<MatchmakerEvent, DecodeError> {
    fn from(event: Event) -> Self {
        event.into_result()
    }
}
