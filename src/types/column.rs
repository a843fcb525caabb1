use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GridError;

/// Sizing rule of a column as written in its definition.
///
/// Strings containing `*` are flexible ("star") widths whose weight is the
/// character length of the token, so `"**"` weighs twice as much as `"*"`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnWidth {
    /// Fixed width in pixels
    Pixels(u32),
    /// Percentage of the width left after fixed columns (`50.0` = 50%)
    Percent(f64),
    /// Flexible share of whatever remains, with the given weight
    Star(u32),
    /// Anything else; excluded from every sizing pool
    Unspecified(String),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        Self::Star(1)
    }
}

impl ColumnWidth {
    /// True for percent and star widths, the ones that absorb leftover pixels.
    pub fn is_elastic(&self) -> bool {
        matches!(self, Self::Percent(_) | Self::Star(_))
    }

    /// Parse a width, keeping unrecognised text as [`ColumnWidth::Unspecified`].
    pub fn parse_lenient(text: &str) -> Self {
        text.parse()
            .unwrap_or_else(|_| Self::Unspecified(text.to_string()))
    }

    /// Convert a raw JSON number into a pixel width.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_number(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 {
            Self::Pixels(value.min(f64::from(u32::MAX)) as u32)
        } else {
            Self::Unspecified(value.to_string())
        }
    }
}

impl FromStr for ColumnWidth {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.contains('*') {
            let weight = u32::try_from(text.chars().count())
                .map_err(|_| GridError::InvalidWidth(s.to_string()))?;
            return Ok(Self::Star(weight));
        }
        if let Some(number) = text.strip_suffix('%') {
            let percent: f64 = number
                .trim()
                .parse()
                .map_err(|_| GridError::InvalidWidth(s.to_string()))?;
            if !percent.is_finite() || percent < 0.0 {
                return Err(GridError::InvalidWidth(s.to_string()));
            }
            return Ok(Self::Percent(percent));
        }
        text.parse::<u32>()
            .map(Self::Pixels)
            .map_err(|_| GridError::InvalidWidth(s.to_string()))
    }
}

impl fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Star(weight) => {
                for _ in 0..*weight {
                    f.write_str("*")?;
                }
                Ok(())
            }
            Self::Unspecified(raw) => f.write_str(raw),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWidth {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for ColumnWidth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawWidth::deserialize(deserializer)? {
            RawWidth::Number(n) => Self::from_number(n),
            RawWidth::Text(text) => Self::parse_lenient(&text),
        })
    }
}

impl Serialize for ColumnWidth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Pixels(px) => serializer.serialize_u32(*px),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

fn default_visible() -> bool {
    true
}

/// A column eligible for rendering in one pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Stable identifier, used in the column's layout class
    pub uid: String,
    #[serde(default)]
    pub width: ColumnWidth,
    #[serde(default)]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Pixel width assigned by the last width-allocation pass
    #[serde(default, skip_deserializing)]
    pub drawn_width: u32,
}

impl Column {
    pub fn new(uid: impl Into<String>, width: ColumnWidth) -> Self {
        Self {
            uid: uid.into(),
            width,
            min_width: None,
            max_width: None,
            visible: true,
            drawn_width: 0,
        }
    }

    #[must_use]
    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    #[must_use]
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Clamp a candidate width to `[min_width, max_width]`.
    ///
    /// Returns `None` when the width already fits. The minimum is checked
    /// first, so a column whose bounds cross resolves to its minimum.
    /// A bound of zero counts as unset.
    pub fn clamp(&self, width: u32) -> Option<u32> {
        match (self.min_width, self.max_width) {
            (Some(min), _) if min > 0 && width < min => Some(min),
            (_, Some(max)) if max > 0 && width > max => Some(max),
            _ => None,
        }
    }

    /// Whether remainder distribution may still add a pixel to this column.
    pub fn can_grow(&self) -> bool {
        if !self.visible || matches!(self.width, ColumnWidth::Unspecified(_)) {
            return false;
        }
        match self.max_width {
            Some(max) if max > 0 => self.drawn_width < max,
            _ => true,
        }
    }

    /// Class name the rendering layer attaches to this column's cells.
    pub fn class_name(&self) -> String {
        format!("ui-grid-col{}", self.uid)
    }

    /// Layout rule pinning this column to its drawn width.
    pub fn class_definition(&self, grid_id: &str) -> String {
        format!(
            " .grid{grid_id} .{} {{ min-width: {}px; max-width: {}px; }}",
            self.class_name(),
            self.drawn_width,
            self.drawn_width
        )
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
    fn test_parse_widths() {
        assert_eq!(
            "120".parse::<ColumnWidth>().unwrap(),
            ColumnWidth::Pixels(120)
        );
        assert_eq!(
            "50%".parse::<ColumnWidth>().unwrap(),
            ColumnWidth::Percent(50.0)
        );
        assert_eq!(
            "33.5 %".parse::<ColumnWidth>().unwrap(),
            ColumnWidth::Percent(33.5)
        );
        assert_eq!("*".parse::<ColumnWidth>().unwrap(), ColumnWidth::Star(1));
        assert_eq!("***".parse::<ColumnWidth>().unwrap(), ColumnWidth::Star(3));
        assert!("auto".parse::<ColumnWidth>().is_err());
        assert!("-5%".parse::<ColumnWidth>().is_err());
    }

    #[test]
    fn test_star_weight_is_token_length() {
        // "2*" is two characters long, so it weighs the same as "**"
        assert_eq!(ColumnWidth::parse_lenient("2*"), ColumnWidth::Star(2));
    }

    #[test]
    fn test_lenient_keeps_unknown_text() {
        assert_eq!(
            ColumnWidth::parse_lenient("auto"),
            ColumnWidth::Unspecified("auto".to_string())
        );
    }

    #[test]
    fn test_deserialize_column() {
        let json = r#"{"uid":"name","width":"**","minWidth":40}"#;
        let col: Column = serde_json::from_str(json).unwrap();
        assert_eq!(col.width, ColumnWidth::Star(2));
        assert_eq!(col.min_width, Some(40));
        assert_eq!(col.max_width, None);
        assert!(col.visible);

        let col: Column = serde_json::from_str(r#"{"uid":"age","width":80}"#).unwrap();
        assert_eq!(col.width, ColumnWidth::Pixels(80));

        let col: Column = serde_json::from_str(r#"{"uid":"x"}"#).unwrap();
        assert_eq!(col.width, ColumnWidth::Star(1));
    }

    #[test]
    fn test_serialize_width_as_written() {
        let value = serde_json::to_value(ColumnWidth::Percent(25.0)).unwrap();
        assert_eq!(value, serde_json::json!("25%"));
        let value = serde_json::to_value(ColumnWidth::Star(2)).unwrap();
        assert_eq!(value, serde_json::json!("**"));
        let value = serde_json::to_value(ColumnWidth::Pixels(90)).unwrap();
        assert_eq!(value, serde_json::json!(90));
    }

    #[test]
    fn test_clamp_checks_min_first() {
        let col = Column::new("a", ColumnWidth::Star(1))
            .with_min_width(100)
            .with_max_width(50);
        assert_eq!(col.clamp(70), Some(100));

        let col = Column::new("b", ColumnWidth::Star(1))
            .with_min_width(10)
            .with_max_width(50);
        assert_eq!(col.clamp(70), Some(50));
        assert_eq!(col.clamp(5), Some(10));
        assert_eq!(col.clamp(30), None);
    }

    #[test]
    fn test_can_grow_respects_max() {
        let mut col = Column::new("c", ColumnWidth::Star(1)).with_max_width(60);
        col.drawn_width = 60;
        assert!(!col.can_grow());
        col.drawn_width = 59;
        assert!(col.can_grow());
        assert!(!Column::new("d", ColumnWidth::Unspecified("auto".into())).can_grow());
    }

    #[test]
    fn test_class_definition() {
        let mut col = Column::new("7", ColumnWidth::Pixels(80));
        col.drawn_width = 80;
        assert_eq!(
            col.class_definition("g1"),
            " .gridg1 .ui-grid-col7 { min-width: 80px; max-width: 80px; }"
        );
    }
}
