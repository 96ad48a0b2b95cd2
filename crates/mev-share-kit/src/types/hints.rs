//! Privacy hint preferences.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Hint tokens in the order they are always written on the wire.
pub const HINT_TOKENS: [&str; 7] = [
    "calldata",
    "contract_address",
    "function_selector",
    "logs",
    "tx_hash",
    "hash",
    "special_logs",
];

/// Which parts of a transaction or bundle the matchmaker may share with searchers.
///
/// Serializes to the list of enabled tokens in canonical order:
///
/// ```rust
/// use mev_share_kit::Hints;
///
/// let hints = Hints {
///     logs: true,
///     call_data: true,
///     ..Default::default()
/// };
/// assert_eq!(hints.tokens(), vec!["calldata", "logs"]);
/// assert_eq!(serde_json::to_string(&hints).unwrap(), r#"["calldata","logs"]"#);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hints {
    /// Share the transaction calldata.
    pub call_data: bool,
    /// Share the `to` address.
    pub contract_address: bool,
    /// Share the 4-byte function selector.
    pub function_selector: bool,
    /// Share all emitted logs.
    pub logs: bool,
    /// Share the transaction hash.
    pub tx_hash: bool,
    /// Share the bundle hash.
    pub hash: bool,
    /// Share a curated subset of logs (e.g. DEX swaps).
    pub special_logs: bool,
}

impl Hints {
    /// Every hint enabled.
    pub fn all() -> Self {
        Self {
            call_data: true,
            contract_address: true,
            function_selector: true,
            logs: true,
            tx_hash: true,
            hash: true,
            special_logs: true,
        }
    }

    fn flags(&self) -> [bool; 7] {
        [
            self.call_data,
            self.contract_address,
            self.function_selector,
            self.logs,
            self.tx_hash,
            self.hash,
            self.special_logs,
        ]
    }

    fn flag_mut(&mut self, token: &str) -> Option<&mut bool> {
        Some(match token {
            "calldata" => &mut self.call_data,
            "contract_address" => &mut self.contract_address,
            "function_selector" => &mut self.function_selector,
            "logs" => &mut self.logs,
            "tx_hash" => &mut self.tx_hash,
            "hash" => &mut self.hash,
            "special_logs" => &mut self.special_logs,
            _ => return None,
        })
    }

    /// Enabled tokens, in canonical order.
    pub fn tokens(&self) -> Vec<&'static str> {
        HINT_TOKENS
            .iter()
            .zip(self.flags())
            .filter_map(|(token, enabled)| enabled.then_some(*token))
            .collect()
    }

    /// Returns true if no hint is enabled.
    pub fn is_empty(&self) -> bool {
        !self.flags().contains(&true)
    }
}

impl fmt::Display for Hints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(","))
    }
}

impl Serialize for Hints {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(self.tokens())
    }
}

impl<'de> Deserialize<'de> for Hints {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let tokens: Vec<String> = Deserialize::deserialize(d)?;
        let mut hints = Hints::default();
        for token in &tokens {
            let flag = hints.flag_mut(token).ok_or_else(|| {
                serde::de::Error::unknown_variant(token, &HINT_TOKENS)
            })?;
            *flag = true;
        }
        Ok(hints)
    }
}
