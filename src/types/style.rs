use std::fmt;

use serde::Serialize;

/// CSS-equivalent overflow value for one axis of a pane's viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Hidden,
    Scroll,
    /// Scrollbar only when the content overflows
    Auto,
}

impl Overflow {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Scroll => "scroll",
            Self::Auto => "auto",
        }
    }
}

/// Overflow rules for a pane's viewport element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewportStyle {
    #[serde(rename = "overflow-x")]
    pub overflow_x: Overflow,
    #[serde(rename = "overflow-y")]
    pub overflow_y: Overflow,
}

impl fmt::Display for ViewportStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "overflow-x: {}; overflow-y: {};",
            self.overflow_x.as_css(),
            self.overflow_y.as_css()
        )
    }
}

/// Leading margins that place a windowed slice at its true scroll position.
///
/// Values are pixels; unset sides are omitted from the CSS text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InlineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<f64>,
}

impl InlineStyle {
    pub fn is_empty(&self) -> bool {
        self.margin_top.is_none() && self.margin_left.is_none() && self.margin_right.is_none()
    }

    /// Set the horizontal leading margin, which is on the right under RTL.
    pub fn set_leading_margin(&mut self, offset: f64, rtl: bool) {
        if rtl {
            self.margin_right = Some(offset);
        } else {
            self.margin_left = Some(offset);
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sides = [
            ("margin-top", self.margin_top),
            ("margin-left", self.margin_left),
            ("margin-right", self.margin_right),
        ];
        let mut first = true;
        for (name, value) in sides {
            if let Some(px) = value {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{name}: {px}px;")?;
                first = false;
            }
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
    fn test_inline_style_css() {
        let mut style = InlineStyle {
            margin_top: Some(90.0),
            ..InlineStyle::default()
        };
        style.set_leading_margin(150.0, false);
        assert_eq!(style.to_string(), "margin-top: 90px; margin-left: 150px;");

        let mut rtl = InlineStyle::default();
        rtl.set_leading_margin(40.5, true);
        assert_eq!(rtl.to_string(), "margin-right: 40.5px;");
        assert!(InlineStyle::default().is_empty());
    }

    #[test]
    fn test_viewport_style_css() {
        let style = ViewportStyle {
            overflow_x: Overflow::Scroll,
            overflow_y: Overflow::Hidden,
        };
        assert_eq!(style.to_string(), "overflow-x: scroll; overflow-y: hidden;");
        let json = serde_json::to_value(style).unwrap();
        assert_eq!(json["overflow-x"], "scroll");
    }
}
