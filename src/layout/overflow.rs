//! Which pane owns which scrollbar.
//!
//! Only one pane shows the vertical scrollbar: the body, unless a pinned
//! pane sits on its trailing side (right in LTR, left in RTL), in which case
//! that pinned pane takes it. Pinned panes never scroll horizontally.

use crate::types::{Overflow, PaneName, ScrollbarPolicy, ViewportStyle};

fn scrollbar_overflow(policy: ScrollbarPolicy) -> Overflow {
    match policy {
        ScrollbarPolicy::Never => Overflow::Hidden,
        ScrollbarPolicy::Always => Overflow::Scroll,
        ScrollbarPolicy::WhenNeeded => Overflow::Auto,
    }
}

/// Overflow rules for a pane.
///
/// `trailing_pinned` says whether the pinned pane on the trailing side
/// (right in LTR, left in RTL) currently holds columns.
pub fn viewport_style(
    pane: PaneName,
    rtl: bool,
    trailing_pinned: bool,
    horizontal: ScrollbarPolicy,
    vertical: ScrollbarPolicy,
) -> ViewportStyle {
    let trailing_pane = if rtl { PaneName::Left } else { PaneName::Right };
    match pane {
        PaneName::Body => ViewportStyle {
            overflow_x: scrollbar_overflow(horizontal),
            overflow_y: if trailing_pinned {
                Overflow::Hidden
            } else {
                scrollbar_overflow(vertical)
            },
        },
        pinned => ViewportStyle {
            overflow_x: Overflow::Hidden,
            overflow_y: if pinned == trailing_pane {
                scrollbar_overflow(vertical)
            } else {
                Overflow::Hidden
            },
        },
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
    fn test_body_owns_vertical_without_trailing_pane() {
        let style = viewport_style(
            PaneName::Body,
            false,
            false,
            ScrollbarPolicy::Always,
            ScrollbarPolicy::Always,
        );
        assert_eq!(style.overflow_x, Overflow::Scroll);
        assert_eq!(style.overflow_y, Overflow::Scroll);
    }

    #[test]
    fn test_body_yields_vertical_to_trailing_pane() {
        let style = viewport_style(
            PaneName::Body,
            false,
            true,
            ScrollbarPolicy::Always,
            ScrollbarPolicy::Always,
        );
        assert_eq!(style.overflow_y, Overflow::Hidden);
    }

    #[test]
    fn test_pinned_panes_by_direction() {
        let right = viewport_style(
            PaneName::Right,
            false,
            true,
            ScrollbarPolicy::Always,
            ScrollbarPolicy::WhenNeeded,
        );
        assert_eq!(right.overflow_x, Overflow::Hidden);
        assert_eq!(right.overflow_y, Overflow::Auto);

        let left = viewport_style(
            PaneName::Left,
            false,
            true,
            ScrollbarPolicy::Always,
            ScrollbarPolicy::Always,
        );
        assert_eq!(left.overflow_y, Overflow::Hidden);

        let left_rtl = viewport_style(
            PaneName::Left,
            true,
            true,
            ScrollbarPolicy::Always,
            ScrollbarPolicy::Always,
        );
        assert_eq!(left_rtl.overflow_y, Overflow::Scroll);
    }

    #[test]
    fn test_never_hides_body_scrollbars() {
        let style = viewport_style(
            PaneName::Body,
            false,
            false,
            ScrollbarPolicy::Never,
            ScrollbarPolicy::Never,
        );
        assert_eq!(style.overflow_x, Overflow::Hidden);
        assert_eq!(style.overflow_y, Overflow::Hidden);
    }
}
