//! Width allocation and per-render style hooks for [`RenderContainer`].

use super::RenderContainer;
use crate::layout::widths::floor_px;
use crate::layout::{allocate_column_widths, viewport_style, WidthAllocation};
use crate::types::{InlineStyle, ViewportStyle};

impl RenderContainer {
    /// Assign drawn widths to the column cache for the current viewport and
    /// publish one layout rule per visible column.
    ///
    /// The space reserved for the vertical scrollbar is not available to
    /// columns. Updates the canvas width, the rendered column copies and
    /// the column offset.
    pub fn update_column_widths(&mut self) -> WidthAllocation {
        let scrollbar_width = self.grid.geometry().scrollbar_width;
        let available_width = floor_px(self.viewport_width() - scrollbar_width);
        let allocation = allocate_column_widths(&mut self.visible_column_cache, available_width);

        let grid_id = self.grid.id();
        let rules: String = self
            .visible_column_cache
            .iter()
            .filter(|column| column.visible)
            .map(|column| column.class_definition(grid_id))
            .collect();
        *self.column_styles.borrow_mut() = rules;

        self.canvas_width = f64::from(allocation.canvas_width);
        let first = self.current_first_column;
        self.update_viewable_column_range(first..first + self.rendered_columns.len());

        if !allocation.unresolved.is_empty() {
            log::debug!(
                "{} pane: {} column(s) without a usable width",
                self.name,
                allocation.unresolved.len()
            );
        }
        allocation
    }

    /// Margins for the rendered row at `index` within the window.
    ///
    /// The first rendered row is pushed down by the height of the rows above
    /// the window, and every row is shifted by the column offset on the
    /// leading side.
    pub fn row_style(&self, index: usize) -> InlineStyle {
        let mut style = InlineStyle::default();
        if index == 0 && self.current_top_row != 0 {
            let hidden_height: f64 = self
                .visible_row_cache
                .get(..self.current_top_row)
                .map(|rows| rows.iter().map(|row| row.height).sum())
                .unwrap_or(0.0);
            style.margin_top = Some(hidden_height);
        }
        if self.current_first_column != 0 {
            style.set_leading_margin(self.column_offset, self.grid.is_rtl());
        }
        style
    }

    /// Leading margin for the header cell wrapper; `None` while the column
    /// window starts at the first column.
    pub fn header_cell_wrapper_style(&self) -> Option<InlineStyle> {
        if self.current_first_column == 0 {
            return None;
        }
        let mut style = InlineStyle::default();
        style.set_leading_margin(self.column_offset, self.grid.is_rtl());
        Some(style)
    }

    /// Overflow rules for this pane's viewport element.
    pub fn view_port_style(&self) -> ViewportStyle {
        let rtl = self.grid.is_rtl();
        let trailing_pinned = if rtl {
            self.grid.has_left_container_columns()
        } else {
            self.grid.has_right_container_columns()
        };
        let options = self.grid.options();
        viewport_style(
            self.name,
            rtl,
            trailing_pinned,
            options.enable_horizontal_scrollbar,
            options.enable_vertical_scrollbar,
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
    use std::rc::Rc;

    use super::*;
    use crate::grid::{GridContext, GridHost};
    use crate::types::{Column, ColumnWidth, GridGeometry, GridOptions, Overflow, PaneName, Row};

    fn container(host: &Rc<GridHost>, pane: PaneName) -> RenderContainer {
        RenderContainer::new(pane, Rc::clone(host) as Rc<dyn GridContext>)
    }

    fn host(options: GridOptions) -> Rc<GridHost> {
        Rc::new(GridHost::new(
            "7",
            options,
            GridGeometry {
                grid_height: 300.0,
                grid_width: 520.0,
                scrollbar_width: 20.0,
                ..GridGeometry::default()
            },
        ))
    }

    #[test]
    fn test_widths_leave_room_for_scrollbar() {
        let host = host(GridOptions::default());
        let mut body = container(&host, PaneName::Body);
        body.set_visible_columns(vec![
            Column::new("a", ColumnWidth::Pixels(100)),
            Column::new("b", ColumnWidth::Percent(50.0)),
            Column::new("c", ColumnWidth::Star(1)),
        ]);
        let allocation = body.update_column_widths();
        assert_eq!(allocation.available_width, 500);
        assert_eq!(body.canvas_width(), 500.0);
        let widths: Vec<u32> = body
            .visible_column_cache()
            .iter()
            .map(|c| c.drawn_width)
            .collect();
        assert_eq!(widths, vec![100, 200, 200]);
    }

    #[test]
    fn test_column_rules_published_to_grid() {
        let host = host(GridOptions::default());
        let mut body = container(&host, PaneName::Body);
        body.set_visible_columns(vec![
            Column::new("a", ColumnWidth::Pixels(120)),
            Column::new("b", ColumnWidth::Pixels(80)).hidden(),
        ]);
        body.update_column_widths();
        let expected = " .grid7 .ui-grid-cola { min-width: 120px; max-width: 120px; }";
        assert_eq!(body.column_styles(), expected);
        assert_eq!(host.build_styles(), expected);
    }

    #[test]
    fn test_row_style_offsets() {
        let host = host(GridOptions {
            virtualization_threshold: 10,
            ..GridOptions::default()
        });
        let mut body = container(&host, PaneName::Body);
        body.set_visible_rows((0..100_usize).map(|i| Row::new(i, 30.0)).collect());
        assert!(body.row_style(0).is_empty());

        body.update_viewable_row_range(3..20);
        assert_eq!(body.row_style(0).margin_top, Some(90.0));
        assert_eq!(body.row_style(1).margin_top, None);
    }

    #[test]
    fn test_row_style_uses_actual_row_heights() {
        let host = host(GridOptions::default());
        let mut body = container(&host, PaneName::Body);
        let mut rows: Vec<Row> = (0..50_usize).map(|i| Row::new(i, 30.0)).collect();
        rows[1].height = 60.0;
        body.set_visible_rows(rows);
        body.update_viewable_row_range(2..20);
        assert_eq!(body.row_style(0).margin_top, Some(90.0));
    }

    #[test]
    fn test_leading_margin_follows_direction() {
        let host = host(GridOptions::default());
        let mut body = container(&host, PaneName::Body);
        body.set_visible_columns(
            (0..20)
                .map(|i| Column::new(i.to_string(), ColumnWidth::Pixels(75)))
                .collect(),
        );
        body.update_column_widths();
        assert_eq!(body.header_cell_wrapper_style(), None);

        body.update_viewable_column_range(2..10);
        assert_eq!(body.column_offset(), 150.0);
        assert_eq!(body.row_style(4).margin_left, Some(150.0));
        assert_eq!(
            body.header_cell_wrapper_style().unwrap().to_string(),
            "margin-left: 150px;"
        );

        host.set_options(GridOptions {
            rtl: true,
            ..GridOptions::default()
        });
        let style = body.row_style(4);
        assert_eq!(style.margin_right, Some(150.0));
        assert_eq!(style.margin_left, None);
    }

    #[test]
    fn test_view_port_style_tracks_pinned_panes() {
        let host = host(GridOptions::default());
        let body = container(&host, PaneName::Body);
        let right = container(&host, PaneName::Right);
        assert_eq!(body.view_port_style().overflow_y, Overflow::Scroll);

        host.set_pinned_columns(false, true);
        assert_eq!(body.view_port_style().overflow_y, Overflow::Hidden);
        assert_eq!(right.view_port_style().overflow_y, Overflow::Scroll);
        assert_eq!(right.view_port_style().overflow_x, Overflow::Hidden);

        // Under RTL the left pane is trailing; the right pane holds nothing
        host.set_options(GridOptions {
            rtl: true,
            ..GridOptions::default()
        });
        assert_eq!(body.view_port_style().overflow_y, Overflow::Scroll);
        assert_eq!(right.view_port_style().overflow_y, Overflow::Hidden);
    }
}
