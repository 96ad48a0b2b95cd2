//! Decoding of `0x`-prefixed hex strings as the matchmaker encodes them.
//!
//! Every binary or numeric field on the wire goes through the helpers here:
//! an optional `0x` prefix is stripped, `""` and bare `"0x"` decode to the
//! zero value, and anything else must be valid hex.

use alloy_primitives::{Bytes, FixedBytes, U256};
use serde::{Deserialize, Deserializer, Serializer};

/// A hex quantity that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid hex quantity: '{0}'")]
pub struct InvalidQuantity(pub String);

fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode an optionally `0x`-prefixed hex string into bytes.
///
/// `""` and `"0x"` decode to an empty vector.
///
/// # Example
///
/// ```rust
/// use mev_share_kit::decode_hex;
///
/// assert_eq!(decode_hex("0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
/// assert!(decode_hex("0x").unwrap().is_empty());
/// assert!(decode_hex("0xzz").is_err());
/// ```
pub fn decode_hex(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = strip_prefix(s);
    if digits.is_empty() {
        return Ok(Vec::new());
    }
    hex::decode(digits)
}

/// Decode an optionally `0x`-prefixed hex quantity into a `U256`.
///
/// `""` and `"0x"` decode to zero.
pub fn decode_quantity(s: &str) -> Result<U256, InvalidQuantity> {
    let digits = strip_prefix(s);
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16).map_err(|_| InvalidQuantity(s.to_string()))
}

/// Decode an optionally `0x`-prefixed hex quantity into a `u64`.
pub fn decode_u64(s: &str) -> Result<u64, InvalidQuantity> {
    let digits = strip_prefix(s);
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16).map_err(|_| InvalidQuantity(s.to_string()))
}

/// Quantities arrive as hex strings from the matchmaker, but plain JSON
/// numbers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuantityRepr {
    Str(String),
    Num(u64),
}

// ============================================================================
// serde helpers
// ============================================================================

/// Bytes field: absent, `null`, `""` and `"0x"` all become empty bytes.
pub(crate) fn deserialize_bytes<'de, D>(d: D) -> Result<Bytes, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(d)?;
    match s {
        None => Ok(Bytes::new()),
        Some(s) => decode_hex(&s)
            .map(Bytes::from)
            .map_err(serde::de::Error::custom),
    }
}

/// Optional big-integer field: absent or `null` is `None`, `""`/`"0x"` is zero.
pub(crate) fn deserialize_opt_quantity<'de, D>(d: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<QuantityRepr>::deserialize(d)? {
        None => Ok(None),
        Some(QuantityRepr::Num(n)) => Ok(Some(U256::from(n))),
        Some(QuantityRepr::Str(s)) => decode_quantity(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Big-integer field that defaults to zero when absent.
pub(crate) fn deserialize_quantity<'de, D>(d: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt_quantity(d).map(Option::unwrap_or_default)
}

/// 4-byte function selector.
///
/// Shorter payloads decode to `None` rather than being padded; longer ones
/// are truncated to their first four bytes.
pub(crate) fn deserialize_selector<'de, D>(d: D) -> Result<Option<FixedBytes<4>>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(d)?;
    let Some(s) = s else {
        return Ok(None);
    };
    let bytes = decode_hex(&s).map_err(serde::de::Error::custom)?;
    if bytes.len() < 4 {
        return Ok(None);
    }
    Ok(Some(FixedBytes::from_slice(&bytes[..4])))
}

pub(crate) fn is_empty_bytes(bytes: &Bytes) -> bool {
    bytes.is_empty()
}

/// `null` becomes `T::default()`.
pub(crate) fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// `u64` as a `0x`-prefixed hex quantity, e.g. `100` ⇄ `"0x64"`.
pub(crate) mod u64_hex {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(value: &u64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{value:#x}"))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        match QuantityRepr::deserialize(d)? {
            QuantityRepr::Num(n) => Ok(n),
            QuantityRepr::Str(s) => decode_u64(&s).map_err(serde::de::Error::custom),
        }
    }

    /// Optional variant; pair with `skip_serializing_if = "Option::is_none"`.
    pub(crate) mod option {
        use super::*;

        pub(crate) fn serialize<S: Serializer>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, s),
                None => s.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<u64>, D::Error> {
            match Option::<QuantityRepr>::deserialize(d)? {
                None => Ok(None),
                Some(QuantityRepr::Num(n)) => Ok(Some(n)),
                Some(QuantityRepr::Str(s)) => decode_u64(&s)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}
