use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Tri-state scrollbar visibility setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawScrollbarPolicy")]
pub enum ScrollbarPolicy {
    /// Scrollbar is never shown
    Never,
    /// Scrollbar is always shown (default)
    #[default]
    Always,
    /// Scrollbar appears only when the content overflows
    WhenNeeded,
}

/// Accepts either the names or the numeric codes `0 | 1 | 2`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScrollbarPolicy {
    Code(u8),
    Name(String),
}

impl TryFrom<RawScrollbarPolicy> for ScrollbarPolicy {
    type Error = GridError;

    fn try_from(raw: RawScrollbarPolicy) -> Result<Self> {
        match raw {
            RawScrollbarPolicy::Code(0) => Ok(Self::Never),
            RawScrollbarPolicy::Code(1) => Ok(Self::Always),
            RawScrollbarPolicy::Code(2) => Ok(Self::WhenNeeded),
            RawScrollbarPolicy::Code(n) => Err(GridError::InvalidConfig(format!(
                "unknown scrollbar policy code {n}"
            ))),
            RawScrollbarPolicy::Name(name) => match name.as_str() {
                "never" => Ok(Self::Never),
                "always" => Ok(Self::Always),
                "whenNeeded" => Ok(Self::WhenNeeded),
                other => Err(GridError::InvalidConfig(format!(
                    "unknown scrollbar policy '{other}'"
                ))),
            },
        }
    }
}

/// Grid-wide options read by every render container.
///
/// Containers only ever read these; the owning grid is the single writer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Row caches at or below this length are rendered whole
    pub virtualization_threshold: usize,
    /// Column caches at or below this length are rendered whole
    pub column_virtualization_threshold: usize,
    /// Rows the target index must move before the window is recomputed
    pub scroll_threshold: usize,
    /// Extra rows materialized on each side of the visible window
    pub excess_rows: usize,
    /// Extra columns materialized on each side of the visible window
    pub excess_columns: usize,
    /// Nominal row height in pixels
    pub row_height: f64,
    pub enable_infinite_scroll: bool,
    pub enable_horizontal_scrollbar: ScrollbarPolicy,
    pub enable_vertical_scrollbar: ScrollbarPolicy,
    /// Right-to-left writing direction
    pub rtl: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            virtualization_threshold: 20,
            column_virtualization_threshold: 10,
            scroll_threshold: 4,
            excess_rows: 4,
            excess_columns: 4,
            row_height: 30.0,
            enable_infinite_scroll: false,
            enable_horizontal_scrollbar: ScrollbarPolicy::Always,
            enable_vertical_scrollbar: ScrollbarPolicy::Always,
            rtl: false,
        }
    }
}

impl GridOptions {
    /// Parse options from JSON, filling unset fields with defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the options fail [`GridOptions::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that the options can produce finite geometry.
    ///
    /// # Errors
    /// Returns [`GridError::InvalidConfig`] for a non-positive or non-finite row height.
    pub fn validate(&self) -> Result<()> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "rowHeight must be a positive number, got {}",
                self.row_height
            )));
        }
        Ok(())
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
    fn test_defaults_fill_missing_fields() {
        let options = GridOptions::from_json(r#"{"excessRows": 10}"#).unwrap();
        assert_eq!(options.excess_rows, 10);
        assert_eq!(options.virtualization_threshold, 20);
        assert_eq!(options.row_height, 30.0);
        assert_eq!(options.enable_vertical_scrollbar, ScrollbarPolicy::Always);
    }

    #[test]
    fn test_scrollbar_policy_names_and_codes() {
        let options = GridOptions::from_json(
            r#"{"enableHorizontalScrollbar": 0, "enableVerticalScrollbar": "whenNeeded"}"#,
        )
        .unwrap();
        assert_eq!(options.enable_horizontal_scrollbar, ScrollbarPolicy::Never);
        assert_eq!(options.enable_vertical_scrollbar, ScrollbarPolicy::WhenNeeded);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(GridOptions::from_json(r#"{"enableVerticalScrollbar": 7}"#).is_err());
        assert!(GridOptions::from_json(r#"{"enableVerticalScrollbar": "sometimes"}"#).is_err());
    }

    #[test]
    fn test_invalid_row_height() {
        let err = GridOptions::from_json(r#"{"rowHeight": 0}"#).unwrap_err();
        assert!(matches!(err, GridError::InvalidConfig(_)));
    }
}
