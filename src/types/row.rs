use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a row's entity, independent of its index in the cache.
///
/// Used to re-anchor the row window after data is appended. Deserializes
/// from a string or a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawRowKey", into = "String")]
pub struct RowKey(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRowKey {
    Text(String),
    Number(u64),
}

impl From<RawRowKey> for RowKey {
    fn from(raw: RawRowKey) -> Self {
        match raw {
            RawRowKey::Text(s) => Self(s),
            RawRowKey::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<RowKey> for String {
    fn from(key: RowKey) -> Self {
        key.0
    }
}

impl RowKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for RowKey {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<usize> for RowKey {
    fn from(n: usize) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row eligible for rendering in one pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub key: RowKey,
    /// Row height in pixels
    pub height: f64,
}

impl Row {
    pub fn new(key: impl Into<RowKey>, height: f64) -> Self {
        Self {
            key: key.into(),
            height,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key_from_string_or_number() {
        let rows: Vec<Row> =
            serde_json::from_str(r#"[{"key": "a1", "height": 30}, {"key": 42, "height": 25.5}]"#)
                .unwrap();
        assert_eq!(rows[0].key.as_str(), "a1");
        assert_eq!(rows[1].key, RowKey::from(42u64));
        assert_eq!(rows[1].height, 25.5);
        assert_eq!(serde_json::to_string(&rows[1].key).unwrap(), r#""42""#);
    }
}
