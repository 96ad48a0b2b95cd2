//! Historical hint query types.
//!
//! Unlike the JSON-RPC surface, the history endpoints encode numbers as
//! plain JSON integers.

use serde::{Deserialize, Serialize};

use super::encoding::null_default;
use super::event::MatchmakerEvent;

/// Filter for [`EventClient::get_event_history`](crate::EventClient::get_event_history).
///
/// Unset fields are omitted from the request body.
///
/// # Example
///
/// ```rust
/// use mev_share_kit::EventHistoryParams;
///
/// let params = EventHistoryParams::new().block_start(10_000).block_end(20_000).limit(50);
/// assert_eq!(
///     serde_json::to_string(&params).unwrap(),
///     r#"{"blockStart":10000,"blockEnd":20000,"limit":50}"#
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHistoryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_end: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_end: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Page size; the server caps it at [`EventHistoryInfo::max_limit`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl EventHistoryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_start(mut self, block: u64) -> Self {
        self.block_start = Some(block);
        self
    }

    pub fn block_end(mut self, block: u64) -> Self {
        self.block_end = Some(block);
        self
    }

    pub fn timestamp_start(mut self, timestamp: u64) -> Self {
        self.timestamp_start = Some(timestamp);
        self
    }

    pub fn timestamp_end(mut self, timestamp: u64) -> Self {
        self.timestamp_end = Some(timestamp);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One historical hint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHistory {
    /// Block the hinted transaction landed in.
    #[serde(default)]
    pub block: u64,
    /// Unix timestamp at which the hint was emitted.
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub hint: MatchmakerEvent,
}

/// Bounds of the stored history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHistoryInfo {
    pub count: u64,
    pub min_block: u64,
    pub max_block: u64,
    pub min_timestamp: u64,
    /// Largest page the server will return.
    pub max_limit: u64,
}
