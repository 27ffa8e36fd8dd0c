use serde::{Deserialize, Serialize};

/// A reported activity count: the (possibly fuzzed) distinct-visitor
/// estimate plus whether fuzzing was applied.
///
/// Field declaration order is load-bearing: `serde_json` serializes struct
/// fields in declaration order, and `count` before `is_fuzzed` is also their
/// sorted order, so `to_json` produces the byte-stable, sorted-key payload
/// the cache format requires without any extra bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInfo {
    pub count: u64,
    pub is_fuzzed: bool,
}

impl ActivityInfo {
    pub fn new(count: u64, is_fuzzed: bool) -> Self {
        Self { count, is_fuzzed }
    }

    /// Serializes to the cache payload format: `{"count":N,"is_fuzzed":B}`.
    pub fn to_json(&self) -> String {
        // A struct of a u64 and a bool always serializes; there is no
        // fallible path (no floats, no maps, no custom Serialize impl).
        serde_json::to_string(self).expect("ActivityInfo serialization is infallible")
    }

    /// Parses the cache payload format. Callers treat an `Err` as a cache
    /// miss rather than surfacing it (§7 DecodeError).
    pub fn from_json(value: &str) -> serde_json::Result<Self> {
        serde_json::from_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let info = ActivityInfo::new(42, true);
        let serialized = info.to_json();
        let deserialized = ActivityInfo::from_json(&serialized).unwrap();
        assert_eq!(info, deserialized);
    }

    #[test]
    fn json_payload_is_sorted_and_stable() {
        let info = ActivityInfo::new(125, false);
        assert_eq!(info.to_json(), r#"{"count":125,"is_fuzzed":false}"#);
    }
}
