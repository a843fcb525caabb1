//! Render container tests
//!
//! Drives a body pane the way a scrolling grid would and checks the window,
//! offsets, geometry and the notifications it sends to the grid.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use std::cell::RefCell;
use std::rc::Rc;

use virtgrid::{
    Column, ColumnWidth, GridContext, GridGeometry, GridHost, GridOptions, PaneName,
    RenderContainer, ReserveSpace, Row, ScrollDirection, StyleComputation, ViewportAdjuster,
    ViewportAdjustment,
};

fn geometry() -> GridGeometry {
    GridGeometry {
        grid_height: 360.0,
        grid_width: 600.0,
        header_height: 30.0,
        footer_height: 30.0,
        scrollbar_width: 0.0,
    }
}

fn options() -> GridOptions {
    GridOptions {
        virtualization_threshold: 100,
        excess_rows: 5,
        ..GridOptions::default()
    }
}

fn pane(host: &Rc<GridHost>, name: PaneName) -> RenderContainer {
    RenderContainer::new(name, Rc::clone(host) as Rc<dyn GridContext>)
}

fn rows(range: std::ops::Range<usize>) -> Vec<Row> {
    range.map(|i| Row::new(i, 30.0)).collect()
}

#[test]
fn test_viewport_geometry() {
    let host = Rc::new(GridHost::new("1", options(), geometry()));
    let body = pane(&host, PaneName::Body);
    assert_eq!(body.viewport_height(), 300.0);
    assert_eq!(body.viewport_width(), 600.0);
    assert_eq!(body.header_viewport_width(), 600.0);

    let tall_header = pane(&host, PaneName::Left).with_header_height(60.0);
    assert_eq!(tall_header.viewport_height(), 270.0);
}

#[test]
fn test_adjusters_shrink_viewport() {
    let host = Rc::new(GridHost::new("1", options(), geometry()));
    let mut body = pane(&host, PaneName::Body);
    let footer_row: Rc<dyn ViewportAdjuster> = Rc::new(ReserveSpace {
        height: 30.0,
        width: 0.0,
    });
    body.register_viewport_adjuster(Rc::clone(&footer_row));
    body.register_viewport_adjuster(Rc::new(|a: ViewportAdjustment| {
        ViewportAdjustment::new(a.height, a.width - 17.0)
    }));
    assert_eq!(body.viewport_height(), 270.0);
    assert_eq!(body.viewport_width(), 583.0);

    assert!(body.remove_viewport_adjuster(&footer_row));
    assert!(!body.remove_viewport_adjuster(&footer_row));
    assert_eq!(body.viewport_height(), 300.0);
    assert_eq!(body.viewport_adjuster_count(), 1);
}

#[test]
fn test_window_stays_contiguous_while_scrolling() {
    let host = Rc::new(GridHost::new("1", options(), geometry()));
    let mut body = pane(&host, PaneName::Body);
    body.set_visible_rows(rows(0..1000));

    let scroll_length = body.vertical_scroll_length();
    assert_eq!(scroll_length, 29_700.0);

    let mut position = 0.0;
    while position <= scroll_length {
        body.adjust_scroll_vertical(Some(position), None, false);
        let top = body.current_top_row();
        let rendered = body.rendered_rows();
        assert!(top + rendered.len() <= body.visible_row_cache().len());
        assert_eq!(rendered, &body.visible_row_cache()[top..top + rendered.len()]);
        position += 457.0;
    }
}

#[test]
fn test_window_covers_viewport_at_every_jump() {
    let host = Rc::new(GridHost::new("1", options(), geometry()));
    let mut body = pane(&host, PaneName::Body);
    body.set_visible_rows(rows(0..1000));

    for step in 0..=20 {
        let percentage = f64::from(step) / 20.0;
        body.adjust_scroll_vertical(None, Some(percentage), true);
        let first_visible = (percentage * 29_700.0 / 30.0).floor() as usize;
        let top = body.current_top_row();
        let end = top + body.rendered_rows().len();
        assert!(top <= first_visible, "{percentage}: {top} > {first_visible}");
        assert!(end >= (first_visible + 10).min(1000), "{percentage}: ends at {end}");
    }
}

#[test]
fn test_small_moves_keep_window() {
    let host = Rc::new(GridHost::new("1", options(), geometry()));
    let mut body = pane(&host, PaneName::Body);
    body.set_visible_rows(rows(0..1000));

    body.adjust_scroll_vertical(Some(3000.0), None, false);
    let top = body.current_top_row();
    body.adjust_scroll_vertical(Some(3030.0), None, false);
    assert_eq!(body.current_top_row(), top);
    body.adjust_scroll_vertical(Some(3300.0), None, false);
    assert!(body.current_top_row() > top);
    assert_eq!(host.refresh_requests(), 3);
}

#[test]
fn test_reset_clears_window() {
    let host = Rc::new(GridHost::new("1", options(), geometry()));
    let mut body = pane(&host, PaneName::Body);
    body.set_visible_rows(rows(0..1000));
    body.adjust_scroll_vertical(None, Some(0.5), true);
    assert!(!body.rendered_rows().is_empty());

    body.reset();
    assert!(body.visible_row_cache().is_empty());
    assert!(body.rendered_rows().is_empty());
    assert_eq!(body.current_top_row(), 0);
    assert_eq!(body.canvas_height(), 0.0);
}

#[test]
fn test_canvas_height_notifications() {
    let host = Rc::new(GridHost::new("1", options(), geometry()));
    let mut body = pane(&host, PaneName::Body);
    body.set_visible_rows(rows(0..10));
    assert_eq!(body.canvas_height(), 300.0);
    assert_eq!(body.canvas_height(), 300.0);
    assert_eq!(host.take_canvas_height_events(), vec![(0.0, 300.0)]);

    body.append_rows(rows(10..15));
    assert!(body.canvas_height_should_update());
    assert_eq!(body.canvas_height(), 450.0);
    assert_eq!(host.take_canvas_height_events(), vec![(300.0, 450.0)]);
}

#[test]
fn test_infinite_scroll_up_keeps_anchor_visible() {
    let host = Rc::new(GridHost::new(
        "1",
        GridOptions {
            enable_infinite_scroll: true,
            ..options()
        },
        geometry(),
    ));
    let mut body = pane(&host, PaneName::Body);
    body.set_visible_rows(rows(500..700));
    body.adjust_scroll_vertical(None, Some(0.0), true);
    let anchor_key = body.rendered_rows()[0].key.clone();

    // A page is prepended: every row shifts down by 100
    let mut grown = rows(400..500);
    grown.extend(rows(500..700));
    body.set_visible_rows(grown);
    host.set_scroll_direction(ScrollDirection::Up);
    body.redraw_in_place();

    assert_eq!(body.row_index_of(&anchor_key), Some(100));
    assert_eq!(body.current_top_row(), 100);
    assert_eq!(body.rendered_rows()[0].key, anchor_key);
    assert_eq!(body.rendered_rows().len(), 15);
}

#[test]
fn test_horizontal_scroll_offsets() {
    let host = Rc::new(GridHost::new("1", GridOptions::default(), geometry()));
    let mut body = pane(&host, PaneName::Body);
    body.set_visible_columns(
        (0..40)
            .map(|i| Column::new(i.to_string(), ColumnWidth::Pixels(150)))
            .collect(),
    );
    body.update_column_widths();
    assert_eq!(body.canvas_width(), 6000.0);

    for step in 0..=10 {
        let percentage = f64::from(step) / 10.0;
        body.adjust_scroll_horizontal(None, Some(percentage), true);
        let first = body.current_first_column();
        let expected: f64 = body.visible_column_cache()[..first]
            .iter()
            .map(|c| f64::from(c.drawn_width))
            .sum();
        assert_eq!(body.column_offset(), expected);
        if first > 0 {
            assert_eq!(body.row_style(0).margin_left, Some(expected));
        }
    }
}

#[test]
fn test_width_pass_refreshes_rendered_columns() {
    let host = Rc::new(GridHost::new("1", GridOptions::default(), geometry()));
    let mut body = pane(&host, PaneName::Body);
    body.set_visible_columns(vec![
        Column::new("a", ColumnWidth::Star(1)),
        Column::new("b", ColumnWidth::Star(1)),
    ]);
    body.update_column_widths();
    body.adjust_scroll_horizontal(Some(0.0), None, true);
    assert_eq!(body.rendered_columns()[0].drawn_width, 300);

    host.set_geometry(GridGeometry {
        grid_width: 800.0,
        ..geometry()
    });
    body.update_column_widths();
    assert_eq!(body.rendered_columns()[0].drawn_width, 400);
    assert_eq!(body.canvas_width(), 800.0);
}

#[derive(Debug, Clone, PartialEq)]
enum GridEvent {
    CanvasHeight(f64, f64),
    Refresh,
}

/// Grid that keeps every notification in one ordered log.
#[derive(Default)]
struct RecordingGrid {
    events: RefCell<Vec<GridEvent>>,
}

impl RecordingGrid {
    fn take(&self) -> Vec<GridEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl GridContext for RecordingGrid {
    fn id(&self) -> &str {
        "rec"
    }

    fn options(&self) -> GridOptions {
        options()
    }

    fn geometry(&self) -> GridGeometry {
        geometry()
    }

    fn has_left_container_columns(&self) -> bool {
        false
    }

    fn has_right_container_columns(&self) -> bool {
        false
    }

    fn scroll_direction(&self) -> ScrollDirection {
        ScrollDirection::None
    }

    fn register_style_computation(&self, _computation: StyleComputation) {}

    fn queue_refresh(&self) {
        self.events.borrow_mut().push(GridEvent::Refresh);
    }

    fn canvas_height_changed(&self, old_height: f64, new_height: f64) {
        self.events
            .borrow_mut()
            .push(GridEvent::CanvasHeight(old_height, new_height));
    }
}

#[test]
fn test_canvas_event_precedes_refresh() {
    let grid = Rc::new(RecordingGrid::default());
    let mut body = RenderContainer::new(PaneName::Body, Rc::clone(&grid) as Rc<dyn GridContext>);
    body.set_visible_rows(rows(0..1000));
    assert!(grid.take().is_empty());

    body.adjust_scroll_vertical(Some(3015.0), None, false);
    assert_eq!(
        grid.take(),
        vec![GridEvent::CanvasHeight(0.0, 30_000.0), GridEvent::Refresh]
    );
    assert_eq!(body.current_top_row(), 96);

    // Rows arrive between scrolls: the new height is announced by the next
    // scroll, still ahead of its refresh
    body.append_rows(rows(1000..1100));
    assert!(grid.take().is_empty());
    body.adjust_scroll_vertical(None, Some(1.0), false);
    assert_eq!(
        grid.take(),
        vec![
            GridEvent::CanvasHeight(30_000.0, 33_000.0),
            GridEvent::Refresh
        ]
    );
    assert_eq!(body.current_top_row(), 1085);

    body.adjust_scroll_vertical(None, Some(0.0), false);
    assert_eq!(grid.take(), vec![GridEvent::Refresh]);

    // A repeated position is rejected but still delivers the pending change
    body.append_rows(rows(1100..1110));
    body.adjust_scroll_vertical(None, Some(0.0), false);
    assert_eq!(
        grid.take(),
        vec![GridEvent::CanvasHeight(33_000.0, 33_300.0)]
    );
    assert_eq!(body.current_top_row(), 0);
}
