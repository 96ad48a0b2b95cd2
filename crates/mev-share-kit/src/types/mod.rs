//! Wire types for the MEV-Share matchmaker.
//!
//! Everything the service encodes as a `0x`-hex string is decoded into
//! native bytes or integers before it reaches these types.

mod bundle;
mod encoding;
mod event;
mod hints;
mod history;
mod key;
mod private_tx;

pub use bundle::{
    BUNDLE_VERSION, BlockRef, Bundle, BundleItem, BundlePrivacy, Inclusion, Refund, RefundConfig,
    SendBundleResponse, SimBundleLogs, SimBundleOverrides, SimBundleResponse, Validity,
};
pub use encoding::{InvalidQuantity, decode_hex, decode_quantity, decode_u64};
pub use event::{Event, Log, MatchmakerEvent, PendingTransaction};
pub use hints::{HINT_TOKENS, Hints};
pub use history::{EventHistory, EventHistoryInfo, EventHistoryParams};
pub use key::{SECRET_KEY_LEN, SIGNATURE_LEN, SecretKey, Signature, hash_message, keccak256};
pub use private_tx::{
    PrivateTxOptions, PrivateTxParams, PrivateTxPreferences, PrivateTxPrivacy,
    encode_private_tx_params,
};
