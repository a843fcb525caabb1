//! Windowing math: which contiguous slice of a cache to materialize.
//!
//! Everything here is pure and index-based; the container feeds in its
//! caches and scroll state and applies the resulting range.

use std::ops::Range;

use crate::types::{Column, Row, ScrollDirection};

/// Number of rows, counted back from the end of the cache, needed to cover
/// the viewport without a gap.
///
/// This bounds how close the window's start may get to the end.
pub fn min_rows_to_render(rows: &[Row], viewport_height: f64) -> usize {
    let mut covered = 0.0;
    let mut count = 0;
    for row in rows.iter().rev() {
        if covered >= viewport_height {
            break;
        }
        covered += row.height;
        count += 1;
    }
    count
}

/// Largest number of consecutive columns that can be visible at once.
///
/// Walks forward accumulating drawn widths until the viewport is covered.
/// Past that point, a column still counts if the trailing run ending at it
/// is narrower than the viewport, which covers a partially visible column
/// at either edge.
pub fn min_columns_to_render(columns: &[Column], viewport_width: f64) -> usize {
    let mut count = 0;
    let mut covered = 0.0;
    for (i, column) in columns.iter().enumerate() {
        if covered < viewport_width {
            covered += f64::from(column.drawn_width);
            count += 1;
        } else {
            let start = i.saturating_sub(count);
            let trailing: f64 = columns
                .get(start..=i)
                .map(|run| run.iter().map(|c| f64::from(c.drawn_width)).sum())
                .unwrap_or(0.0);
            if trailing < viewport_width {
                count += 1;
            }
        }
    }
    count
}

/// Index the window should start from for a scroll percentage.
///
/// `ceil(max_index * percentage)`, never past `max_index`. A non-finite
/// percentage counts as zero and anything outside `[0, 1]` is clamped.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn target_index(max_index: usize, percentage: f64) -> usize {
    let percentage = if percentage.is_finite() {
        percentage.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let max = max_index as f64;
    let index = (max * percentage).min(max).ceil();
    (index as usize).min(max_index)
}

/// Scroll movement since the last applied window, used to skip recomputes
/// on small deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hysteresis {
    pub previous_position: f64,
    pub position: f64,
    pub previous_index: usize,
    /// Rows the target must move past before the window changes
    pub threshold: usize,
}

impl Hysteresis {
    /// True when the target has not moved far enough in the scroll direction
    /// to justify a new window. Reaching `max_index` always recomputes.
    pub fn suppresses(&self, target: usize, max_index: usize) -> bool {
        if target >= max_index {
            return false;
        }
        if self.previous_position < self.position {
            target < self.previous_index.saturating_add(self.threshold)
        } else if self.previous_position > self.position {
            target.saturating_add(self.threshold) > self.previous_index
        } else {
            false
        }
    }
}

/// Inputs for the plain (non-anchored) window around a target index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRequest {
    pub cache_len: usize,
    /// Minimum number of items that fill the viewport
    pub min_visible: usize,
    pub target: usize,
    /// Margin materialized on each side
    pub excess: usize,
    /// False below the virtualization threshold: the whole cache is rendered
    pub virtualize: bool,
}

impl WindowRequest {
    pub fn max_index(&self) -> usize {
        self.cache_len.saturating_sub(self.min_visible)
    }

    /// Range to materialize, always within `0..cache_len`.
    pub fn range(&self) -> Range<usize> {
        if !self.virtualize {
            let end = self
                .cache_len
                .max(self.min_visible.saturating_add(self.excess));
            return 0..end.min(self.cache_len);
        }
        let start = self.target.saturating_sub(self.excess);
        let end = self
            .cache_len
            .min(self.target.saturating_add(self.min_visible).saturating_add(self.excess));
        start.min(end)..end
    }
}

/// Inputs for re-anchoring the row window after rows were appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRequest {
    pub direction: ScrollDirection,
    /// Index of the anchor row in the (grown) cache
    pub anchor: usize,
    pub cache_len: usize,
    pub min_visible: usize,
    pub excess: usize,
}

impl AnchorRequest {
    /// Position inside the previously rendered window of the row to anchor on.
    ///
    /// Scrolling up anchors near the start of the old window (past the top
    /// margin unless already at the top); scrolling down anchors `min_visible`
    /// rows in.
    pub fn anchor_offset(
        direction: ScrollDirection,
        target: usize,
        excess: usize,
        min_visible: usize,
    ) -> Option<usize> {
        match direction {
            ScrollDirection::Up if target > 0 => Some(excess),
            ScrollDirection::Up => Some(0),
            ScrollDirection::Down => Some(min_visible),
            ScrollDirection::None => None,
        }
    }

    pub fn range(&self) -> Option<Range<usize>> {
        let (start, end) = match self.direction {
            ScrollDirection::Up => {
                let start = self.anchor;
                (start, start.saturating_add(self.excess).saturating_add(self.min_visible))
            }
            ScrollDirection::Down => (
                self.anchor
                    .saturating_sub(self.excess.saturating_add(self.min_visible)),
                self.anchor
                    .saturating_add(self.min_visible)
                    .saturating_add(self.excess),
            ),
            ScrollDirection::None => return None,
        };
        let end = end.min(self.cache_len);
        Some(start.min(end)..end)
    }
}

/// What a windowing pass decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowDecision {
    /// Hysteresis held the current window
    Keep,
    /// Materialize this range; `target` becomes the new scroll index
    Apply { range: Range<usize>, target: usize },
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
    use crate::types::ColumnWidth;

    fn rows(n: usize, height: f64) -> Vec<Row> {
        (0..n).map(|i| Row::new(i, height)).collect()
    }

    fn columns(widths: &[u32]) -> Vec<Column> {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let mut col = Column::new(i.to_string(), ColumnWidth::Pixels(*w));
                col.drawn_width = *w;
                col
            })
            .collect()
    }

    #[test]
    fn test_min_rows_exact_fit() {
        assert_eq!(min_rows_to_render(&rows(1000, 30.0), 300.0), 10);
    }

    #[test]
    fn test_min_rows_partial_row() {
        // 310px needs an 11th, partially visible row
        assert_eq!(min_rows_to_render(&rows(1000, 30.0), 310.0), 11);
    }

    #[test]
    fn test_min_rows_small_cache() {
        assert_eq!(min_rows_to_render(&rows(3, 30.0), 300.0), 3);
        assert_eq!(min_rows_to_render(&[], 300.0), 0);
    }

    #[test]
    fn test_min_rows_uses_tail_heights() {
        let mut cache = rows(20, 10.0);
        cache.push(Row::new("tall", 200.0));
        // The last row alone covers 200 of 250px, then five 10px rows
        assert_eq!(min_rows_to_render(&cache, 250.0), 6);
    }

    #[test]
    fn test_min_columns_uniform() {
        let cols = columns(&[100; 20]);
        assert_eq!(min_columns_to_render(&cols, 500.0), 5);
        // The fifth column is only partly visible at 450px
        assert_eq!(min_columns_to_render(&cols, 450.0), 5);
        assert_eq!(min_columns_to_render(&cols, 550.0), 6);
    }

    #[test]
    fn test_min_columns_mixed_widths() {
        let cols = columns(&[300, 50, 50, 50, 50, 300]);
        // The forward walk covers 400px with three columns; the run of narrow
        // columns ending at index 4 is only 200px wide and adds one more.
        assert_eq!(min_columns_to_render(&cols, 400.0), 4);
    }

    #[test]
    fn test_target_index_bounds() {
        assert_eq!(target_index(990, 0.0), 0);
        assert_eq!(target_index(990, 1.0), 990);
        assert_eq!(target_index(990, 0.5), 495);
        assert_eq!(target_index(990, 0.5001), 496);
        assert_eq!(target_index(990, 3.0), 990);
        assert_eq!(target_index(990, f64::NAN), 0);
        assert_eq!(target_index(0, 0.7), 0);
    }

    #[test]
    fn test_hysteresis_down() {
        let h = Hysteresis {
            previous_position: 0.0,
            position: 30.0,
            previous_index: 10,
            threshold: 4,
        };
        assert!(h.suppresses(12, 990));
        assert!(!h.suppresses(14, 990));
        // At the boundary the window must catch up
        assert!(!h.suppresses(12, 12));
    }

    #[test]
    fn test_hysteresis_up() {
        let h = Hysteresis {
            previous_position: 300.0,
            position: 270.0,
            previous_index: 10,
            threshold: 4,
        };
        assert!(h.suppresses(8, 990));
        assert!(!h.suppresses(6, 990));
    }

    #[test]
    fn test_hysteresis_up_near_top() {
        let h = Hysteresis {
            previous_position: 60.0,
            position: 30.0,
            previous_index: 2,
            threshold: 4,
        };
        assert!(h.suppresses(0, 990));
    }

    #[test]
    fn test_window_request_virtualized() {
        let req = WindowRequest {
            cache_len: 1000,
            min_visible: 10,
            target: 0,
            excess: 5,
            virtualize: true,
        };
        assert_eq!(req.range(), 0..15);
        let req = WindowRequest { target: 500, ..req };
        assert_eq!(req.range(), 495..515);
        let req = WindowRequest { target: 990, ..req };
        assert_eq!(req.range(), 985..1000);
    }

    #[test]
    fn test_window_request_below_threshold() {
        let req = WindowRequest {
            cache_len: 5,
            min_visible: 5,
            target: 3,
            excess: 4,
            virtualize: false,
        };
        assert_eq!(req.range(), 0..5);
    }

    #[test]
    fn test_anchor_offsets() {
        assert_eq!(
            AnchorRequest::anchor_offset(ScrollDirection::Up, 7, 4, 10),
            Some(4)
        );
        assert_eq!(
            AnchorRequest::anchor_offset(ScrollDirection::Up, 0, 4, 10),
            Some(0)
        );
        assert_eq!(
            AnchorRequest::anchor_offset(ScrollDirection::Down, 7, 4, 10),
            Some(10)
        );
        assert_eq!(
            AnchorRequest::anchor_offset(ScrollDirection::None, 7, 4, 10),
            None
        );
    }

    #[test]
    fn test_anchor_ranges() {
        let down = AnchorRequest {
            direction: ScrollDirection::Down,
            anchor: 100,
            cache_len: 200,
            min_visible: 10,
            excess: 4,
        };
        assert_eq!(down.range(), Some(86..114));

        let up = AnchorRequest {
            direction: ScrollDirection::Up,
            anchor: 50,
            ..down
        };
        assert_eq!(up.range(), Some(50..64));

        let at_end = AnchorRequest {
            anchor: 195,
            ..down
        };
        assert_eq!(at_end.range(), Some(181..200));
    }

    #[test]
    fn test_huge_margins_saturate() {
        let req = WindowRequest {
            cache_len: 1000,
            min_visible: 10,
            target: 495,
            excess: usize::MAX,
            virtualize: true,
        };
        assert_eq!(req.range(), 0..1000);
        assert_eq!(WindowRequest { virtualize: false, ..req }.range(), 0..1000);

        let down = AnchorRequest {
            direction: ScrollDirection::Down,
            anchor: 100,
            cache_len: 200,
            min_visible: 10,
            excess: usize::MAX,
        };
        assert_eq!(down.range(), Some(0..200));
        let up = AnchorRequest {
            direction: ScrollDirection::Up,
            ..down
        };
        assert_eq!(up.range(), Some(100..200));

        let h = Hysteresis {
            previous_position: 0.0,
            position: 30.0,
            previous_index: 10,
            threshold: usize::MAX,
        };
        assert!(h.suppresses(500, 990));
        let h = Hysteresis {
            previous_position: 60.0,
            position: 30.0,
            ..h
        };
        assert!(h.suppresses(0, 990));
    }
}
