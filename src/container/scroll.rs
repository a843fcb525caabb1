//! Scroll entry points and row/column windowing for [`RenderContainer`].
//!
//! A scroll event arrives as a position, a fraction of the scroll length, or
//! both. It is turned into a target index, filtered through hysteresis
//! (rows only), and then the window around the target is materialized.

use std::ops::Range;

use super::RenderContainer;
use crate::layout::{target_index, AnchorRequest, Hysteresis, WindowDecision, WindowRequest};
use crate::types::ScrollDirection;

/// Fraction of `length` scrolled at `position`; zero when nothing scrolls.
fn scroll_ratio(position: f64, length: f64) -> f64 {
    if length > 0.0 && position.is_finite() {
        position / length
    } else {
        0.0
    }
}

fn same_position(position: f64, previous: Option<f64>) -> bool {
    previous.is_some_and(|prev| (position - prev).abs() < f64::EPSILON)
}

impl RenderContainer {
    /// Apply a vertical scroll.
    ///
    /// With only a percentage, the position is derived from the vertical
    /// scroll length. Repeating the last applied position is a no-op unless
    /// `force` is set. Always requests a refresh once the rows are adjusted.
    pub fn adjust_scroll_vertical(
        &mut self,
        scroll_top: Option<f64>,
        scroll_percentage: Option<f64>,
        force: bool,
    ) {
        let scroll_top = match (scroll_top, scroll_percentage) {
            (Some(top), _) => top,
            (None, Some(percentage)) => {
                self.refresh_vertical_scroll_length().max(0.0) * percentage
            }
            (None, None) => {
                log::warn!(
                    "{} pane: vertical scroll without position or percentage ignored",
                    self.name
                );
                return;
            }
        };
        if !force && same_position(scroll_top, self.scroll.prev_scroll_top) {
            self.flush_canvas_height_change();
            return;
        }

        let percentage = match scroll_percentage {
            Some(percentage) => percentage,
            None => scroll_ratio(scroll_top, self.refresh_vertical_scroll_length()),
        };
        self.adjust_rows(Some(scroll_top), Some(percentage), false);

        self.scroll.prev_scroll_top = Some(scroll_top);
        self.scroll.prev_scroll_top_percentage = percentage;
        self.grid.queue_refresh();
    }

    /// Apply a horizontal scroll. Same contract as
    /// [`RenderContainer::adjust_scroll_vertical`], against the horizontal
    /// scroll length.
    pub fn adjust_scroll_horizontal(
        &mut self,
        scroll_left: Option<f64>,
        scroll_percentage: Option<f64>,
        force: bool,
    ) {
        let scroll_left = match (scroll_left, scroll_percentage) {
            (Some(left), _) => left,
            (None, Some(percentage)) => self.horizontal_scroll_length().max(0.0) * percentage,
            (None, None) => {
                log::warn!(
                    "{} pane: horizontal scroll without position or percentage ignored",
                    self.name
                );
                return;
            }
        };
        if !force && same_position(scroll_left, self.scroll.prev_scroll_left) {
            return;
        }

        let percentage = match scroll_percentage {
            Some(percentage) => percentage,
            None => scroll_ratio(scroll_left, self.horizontal_scroll_length()),
        };
        self.adjust_columns(Some(scroll_left), Some(percentage));

        self.scroll.prev_scroll_left = Some(scroll_left);
        self.scroll.prev_scroll_left_percentage = percentage;
        self.grid.queue_refresh();
    }

    /// Recompute the row window for a scroll position and/or percentage.
    ///
    /// Above the virtualization threshold, small moves in the scroll
    /// direction keep the current window once one has been rendered. With
    /// infinite scroll and
    /// `post_data_loaded`, the window is re-anchored on a row from the old
    /// window so the user's view does not jump.
    pub fn adjust_rows(
        &mut self,
        scroll_top: Option<f64>,
        scroll_percentage: Option<f64>,
        post_data_loaded: bool,
    ) -> WindowDecision {
        let options = self.grid.options();
        let min_rows = self.min_rows_to_render();
        let percentage = match scroll_percentage {
            Some(percentage) => percentage,
            None => {
                let length = self.refresh_vertical_scroll_length();
                scroll_ratio(scroll_top.unwrap_or(0.0), length)
            }
        };

        let cache_len = self.visible_row_cache.len();
        let mut request = WindowRequest {
            cache_len,
            min_visible: min_rows,
            target: 0,
            excess: options.excess_rows,
            virtualize: cache_len > options.virtualization_threshold,
        };
        let max_row_index = request.max_index();
        request.target = target_index(max_row_index, percentage);

        let has_window = !self.rendered_rows.is_empty();
        if request.virtualize && !options.enable_infinite_scroll && has_window {
            if let (Some(position), Some(previous_position)) =
                (scroll_top, self.scroll.prev_scroll_top)
            {
                let hysteresis = Hysteresis {
                    previous_position,
                    position,
                    previous_index: self.scroll.prev_row_scroll_index,
                    threshold: options.scroll_threshold,
                };
                if hysteresis.suppresses(request.target, max_row_index) {
                    log::trace!(
                        "{} pane: row {} within scroll threshold of {}",
                        self.name,
                        request.target,
                        self.scroll.prev_row_scroll_index
                    );
                    self.flush_canvas_height_change();
                    return WindowDecision::Keep;
                }
            }
        }

        let anchored = if request.virtualize && options.enable_infinite_scroll && post_data_loaded
        {
            self.anchored_row_range(request.target, min_rows, options.excess_rows)
        } else {
            None
        };
        let (range, target) = anchored.unwrap_or_else(|| (request.range(), request.target));

        self.update_viewable_row_range(range.clone());
        self.scroll.prev_row_scroll_index = target;
        self.flush_canvas_height_change();
        WindowDecision::Apply { range, target }
    }

    /// Window anchored on a row of the currently rendered window, found by key.
    fn anchored_row_range(
        &self,
        target: usize,
        min_rows: usize,
        excess: usize,
    ) -> Option<(Range<usize>, usize)> {
        let direction = self.grid.scroll_direction();
        if direction == ScrollDirection::None {
            return None;
        }
        let offset = AnchorRequest::anchor_offset(direction, target, excess, min_rows)?;
        let Some(anchor_row) = self.rendered_rows.get(offset) else {
            log::debug!(
                "{} pane: no rendered row at offset {offset} to anchor on",
                self.name
            );
            return None;
        };
        let Some(anchor) = self.row_index_of(&anchor_row.key) else {
            log::debug!(
                "{} pane: anchor row '{}' left the cache",
                self.name,
                anchor_row.key
            );
            return None;
        };
        let request = AnchorRequest {
            direction,
            anchor,
            cache_len: self.visible_row_cache.len(),
            min_visible: min_rows,
            excess,
        };
        log::debug!(
            "{} pane: re-anchored on row '{}' at index {anchor}",
            self.name,
            anchor_row.key
        );
        request.range().map(|range| (range, anchor))
    }

    /// Recompute the column window for a scroll position and/or percentage.
    ///
    /// Columns are virtualized only when there are more of them than the
    /// column threshold and they overflow the viewport. No hysteresis.
    pub fn adjust_columns(
        &mut self,
        scroll_left: Option<f64>,
        scroll_percentage: Option<f64>,
    ) -> WindowDecision {
        let options = self.grid.options();
        let min_columns = self.min_columns_to_render();
        let percentage = scroll_percentage.unwrap_or_else(|| {
            scroll_ratio(scroll_left.unwrap_or(0.0), self.horizontal_scroll_length())
        });

        let cache_len = self.visible_column_cache.len();
        let mut request = WindowRequest {
            cache_len,
            min_visible: min_columns,
            target: 0,
            excess: options.excess_columns,
            virtualize: cache_len > options.column_virtualization_threshold
                && self.canvas_width() > self.viewport_width(),
        };
        request.target = target_index(request.max_index(), percentage);

        let range = request.range();
        self.update_viewable_column_range(range.clone());
        self.scroll.prev_column_scroll_index = request.target;
        WindowDecision::Apply {
            range,
            target: request.target,
        }
    }

    /// Re-derive both windows from the last applied scroll percentages, e.g.
    /// after data was loaded. Requests a refresh.
    pub fn redraw_in_place(&mut self) {
        let rows = self.scroll.prev_scroll_top_percentage;
        let columns = self.scroll.prev_scroll_left_percentage;
        self.adjust_rows(None, Some(rows), true);
        self.adjust_columns(None, Some(columns));
        self.grid.queue_refresh();
    }

    /// Materialize `range` of the row cache. The range is clamped to the cache.
    pub fn update_viewable_row_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.visible_row_cache.len());
        let start = range.start.min(end);
        self.rendered_rows = self
            .visible_row_cache
            .get(start..end)
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        self.current_top_row = start;
        log::trace!("{} pane: rows {start}..{end}", self.name);
    }

    /// Materialize `range` of the column cache and recompute the column
    /// offset. The range is clamped to the cache.
    pub fn update_viewable_column_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.visible_column_cache.len());
        let start = range.start.min(end);
        self.rendered_columns = self
            .visible_column_cache
            .get(start..end)
            .map(<[_]>::to_vec)
            .unwrap_or_default();
        self.current_first_column = start;
        self.update_column_offset();
        log::trace!("{} pane: columns {start}..{end}", self.name);
    }

    /// Sum of drawn widths of the columns left of the window.
    pub fn update_column_offset(&mut self) {
        self.column_offset = self
            .visible_column_cache
            .get(..self.current_first_column)
            .map(|skipped| skipped.iter().map(|c| f64::from(c.drawn_width)).sum())
            .unwrap_or(0.0);
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
    use std::rc::Rc;

    use super::*;
    use crate::grid::{GridContext, GridHost};
    use crate::types::{Column, ColumnWidth, GridGeometry, GridOptions, PaneName, Row};

    fn host(options: GridOptions) -> Rc<GridHost> {
        Rc::new(GridHost::new(
            "1",
            options,
            GridGeometry {
                grid_height: 300.0,
                grid_width: 500.0,
                ..GridGeometry::default()
            },
        ))
    }

    fn body(host: &Rc<GridHost>, rows: usize) -> RenderContainer {
        let grid: Rc<dyn GridContext> = Rc::clone(host) as Rc<dyn GridContext>;
        let mut container = RenderContainer::new(PaneName::Body, grid);
        container.set_visible_rows((0..rows).map(|i| Row::new(i, 30.0)).collect());
        container
    }

    fn large_grid_options() -> GridOptions {
        GridOptions {
            virtualization_threshold: 100,
            excess_rows: 5,
            ..GridOptions::default()
        }
    }

    #[test]
    fn test_scroll_ratio_guards() {
        assert_eq!(scroll_ratio(50.0, 100.0), 0.5);
        assert_eq!(scroll_ratio(50.0, 0.0), 0.0);
        assert_eq!(scroll_ratio(50.0, -20.0), 0.0);
        assert_eq!(scroll_ratio(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn test_first_window() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(Some(0.0), None, true);
        assert_eq!(container.current_top_row(), 0);
        assert_eq!(container.rendered_rows().len(), 15);
        assert_eq!(host.refresh_requests(), 1);
    }

    #[test]
    fn test_scroll_to_middle_and_end() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(None, Some(0.5), true);
        assert_eq!(container.current_top_row(), 490);
        assert_eq!(container.rendered_rows().len(), 20);

        container.adjust_scroll_vertical(None, Some(1.0), true);
        assert_eq!(container.current_top_row(), 985);
        assert_eq!(container.rendered_rows().len(), 15);
        assert_eq!(container.scroll_state().prev_row_scroll_index, 990);
    }

    #[test]
    fn test_repeat_position_is_noop() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(Some(600.0), None, false);
        let top = container.current_top_row();
        container.adjust_scroll_vertical(Some(600.0), None, false);
        assert_eq!(container.current_top_row(), top);
        assert_eq!(host.refresh_requests(), 1);
    }

    #[test]
    fn test_missing_inputs_ignored() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(None, None, true);
        container.adjust_scroll_horizontal(None, None, true);
        assert!(container.rendered_rows().is_empty());
        assert_eq!(host.refresh_requests(), 0);
    }

    #[test]
    fn test_hysteresis_keeps_window() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(Some(0.0), None, true);
        // One row down: target index 1, within the threshold of 4
        let decision = container.adjust_rows(Some(30.0), None, false);
        assert_eq!(decision, WindowDecision::Keep);
        assert_eq!(container.current_top_row(), 0);
    }

    #[test]
    fn test_first_small_scroll_fills_viewport() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(Some(30.0), None, false);
        assert_eq!(container.current_top_row(), 0);
        assert!(container.rendered_rows().len() >= container.min_rows_to_render());
        assert_eq!(container.scroll_state().prev_scroll_top, Some(30.0));
    }

    #[test]
    fn test_small_scroll_after_reset_fills_viewport() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(Some(0.0), None, true);
        container.reset();
        container.set_visible_rows((0..1000_usize).map(|i| Row::new(i, 30.0)).collect());
        let decision = container.adjust_rows(Some(30.0), None, false);
        assert_eq!(
            decision,
            WindowDecision::Apply {
                range: 0..16,
                target: 1
            }
        );
    }

    #[test]
    fn test_huge_excess_rows_render_whole_cache() {
        let json = r#"{"virtualizationThreshold": 100, "excessRows": 18446744073709551615}"#;
        let host = host(GridOptions::from_json(json).unwrap());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(None, Some(0.5), true);
        assert_eq!(container.current_top_row(), 0);
        assert_eq!(container.rendered_rows().len(), 1000);
    }

    #[test]
    fn test_repeat_percentage_still_notifies_canvas_change() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(None, Some(0.0), false);
        assert_eq!(host.take_canvas_height_events(), vec![(0.0, 30000.0)]);

        container.append_rows((1000..1100_usize).map(|i| Row::new(i, 30.0)));
        container.adjust_scroll_vertical(None, Some(0.0), false);
        assert_eq!(host.take_canvas_height_events(), vec![(30000.0, 33000.0)]);
        assert_eq!(host.refresh_requests(), 1);
    }

    #[test]
    fn test_below_threshold_renders_everything() {
        let host = host(GridOptions::default());
        let mut container = body(&host, 5);
        let decision = container.adjust_rows(Some(0.0), None, false);
        assert_eq!(
            decision,
            WindowDecision::Apply {
                range: 0..5,
                target: 0
            }
        );
        assert_eq!(container.rendered_rows().len(), 5);
    }

    #[test]
    fn test_canvas_notification_after_window() {
        let host = host(large_grid_options());
        let mut container = body(&host, 1000);
        container.adjust_scroll_vertical(Some(300.0), None, false);
        assert_eq!(host.take_canvas_height_events(), vec![(0.0, 30000.0)]);
        container.adjust_scroll_vertical(Some(3000.0), None, false);
        assert!(host.take_canvas_height_events().is_empty());
    }

    #[test]
    fn test_infinite_scroll_reanchors_down() {
        let host = host(GridOptions {
            enable_infinite_scroll: true,
            ..large_grid_options()
        });
        let mut container = body(&host, 200);
        container.adjust_scroll_vertical(None, Some(1.0), true);
        let anchor_key = container.rendered_rows()[10].key.clone();

        container.append_rows((200..300_usize).map(|i| Row::new(i, 30.0)));
        host.set_scroll_direction(ScrollDirection::Down);
        container.redraw_in_place();

        let anchor = container.row_index_of(&anchor_key).unwrap();
        assert_eq!(container.scroll_state().prev_row_scroll_index, anchor);
        assert_eq!(container.current_top_row(), anchor - 15);
        assert_eq!(container.rendered_rows().len(), 30);
    }

    #[test]
    fn test_infinite_scroll_without_direction_uses_percentage() {
        let host = host(GridOptions {
            enable_infinite_scroll: true,
            ..large_grid_options()
        });
        let mut container = body(&host, 200);
        container.adjust_scroll_vertical(None, Some(0.0), true);
        container.redraw_in_place();
        assert_eq!(container.current_top_row(), 0);
    }

    #[test]
    fn test_columns_virtualize_when_overflowing() {
        let host = host(GridOptions::default());
        let grid: Rc<dyn GridContext> = Rc::clone(&host) as Rc<dyn GridContext>;
        let mut container = RenderContainer::new(PaneName::Body, grid);
        container.set_visible_columns(
            (0..30)
                .map(|i| Column::new(i.to_string(), ColumnWidth::Pixels(100)))
                .collect(),
        );
        container.update_column_widths();
        container.adjust_scroll_horizontal(None, Some(1.0), true);

        // 3000px canvas, 500px viewport: 5 columns fill it, so the last
        // window starts at 25 - 4
        assert_eq!(container.current_first_column(), 21);
        assert_eq!(container.rendered_columns().len(), 9);
        assert_eq!(container.column_offset(), 2100.0);
    }

    #[test]
    fn test_columns_not_virtualized_when_they_fit() {
        let host = host(GridOptions::default());
        let grid: Rc<dyn GridContext> = Rc::clone(&host) as Rc<dyn GridContext>;
        let mut container = RenderContainer::new(PaneName::Body, grid);
        container.set_visible_columns(
            (0..12)
                .map(|i| Column::new(i.to_string(), ColumnWidth::Star(1)))
                .collect(),
        );
        container.update_column_widths();
        container.adjust_scroll_horizontal(Some(0.0), None, true);
        assert_eq!(container.current_first_column(), 0);
        assert_eq!(container.rendered_columns().len(), 12);
    }

    #[test]
    fn test_update_range_is_clamped() {
        let host = host(large_grid_options());
        let mut container = body(&host, 10);
        container.update_viewable_row_range(8..40);
        assert_eq!(container.current_top_row(), 8);
        assert_eq!(container.rendered_rows().len(), 2);
        container.update_viewable_row_range(50..60);
        assert_eq!(container.current_top_row(), 10);
        assert!(container.rendered_rows().is_empty());
    }
}
