//! Render container: one per pane (body, pinned left, pinned right).
//!
//! A container holds the ordered rows and columns eligible for its pane,
//! the contiguous window of them currently materialized, the scroll state
//! used for hysteresis, and derived geometry (canvas size, column widths,
//! column layout rules). It reads configuration and calls services only
//! through the [`GridContext`] it was created with.
//!
//! - `scroll` holds the scroll entry points and row/column windowing
//! - `styles` holds width allocation and the per-render style hooks

mod scroll;
mod styles;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::grid::{GridContext, StyleComputation};
use crate::layout::{
    min_columns_to_render, min_rows_to_render, AdjusterRegistry, ViewportAdjuster,
    ViewportAdjustment,
};
use crate::types::{Column, PaneName, Row, RowKey};

/// Style-pipeline priority at which containers publish their column rules.
pub const COLUMN_STYLE_PRIORITY: u32 = 5;

/// Last-applied scroll state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// `None` until the first vertical scroll is applied
    pub prev_scroll_top: Option<f64>,
    pub prev_scroll_top_percentage: f64,
    pub prev_row_scroll_index: usize,
    /// `None` until the first horizontal scroll is applied
    pub prev_scroll_left: Option<f64>,
    pub prev_scroll_left_percentage: f64,
    pub prev_column_scroll_index: usize,
}

/// Windowing and layout state for one pane of the grid.
pub struct RenderContainer {
    name: PaneName,
    grid: Rc<dyn GridContext>,
    /// Replaces the grid header height for this pane when set
    header_height: Option<f64>,

    visible_row_cache: Vec<Row>,
    visible_column_cache: Vec<Column>,
    /// Row key -> index in `visible_row_cache`
    row_index: HashMap<RowKey, usize>,

    rendered_rows: Vec<Row>,
    rendered_columns: Vec<Column>,
    current_top_row: usize,
    current_first_column: usize,
    column_offset: f64,

    scroll: ScrollState,

    canvas_height_should_update: bool,
    canvas_height: f64,
    /// Change detected mid-scroll, emitted once the window is applied
    pending_canvas_change: Option<(f64, f64)>,
    canvas_width: f64,

    column_styles: Rc<RefCell<String>>,
    viewport_adjusters: AdjusterRegistry,
}

impl fmt::Debug for RenderContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContainer")
            .field("name", &self.name)
            .field("grid", &self.grid.id())
            .field("visible_rows", &self.visible_row_cache.len())
            .field("visible_columns", &self.visible_column_cache.len())
            .field("rendered_rows", &self.rendered_rows.len())
            .field("rendered_columns", &self.rendered_columns.len())
            .field("current_top_row", &self.current_top_row)
            .field("current_first_column", &self.current_first_column)
            .field("column_offset", &self.column_offset)
            .field("scroll", &self.scroll)
            .field("canvas_height", &self.canvas_height)
            .field("canvas_width", &self.canvas_width)
            .field("viewport_adjusters", &self.viewport_adjusters)
            .finish_non_exhaustive()
    }
}

impl RenderContainer {
    /// Create the container for a pane and register its column rules with
    /// the grid's style pipeline.
    pub fn new(name: PaneName, grid: Rc<dyn GridContext>) -> Self {
        let column_styles = Rc::new(RefCell::new(String::new()));
        let published = Rc::clone(&column_styles);
        grid.register_style_computation(StyleComputation {
            priority: COLUMN_STYLE_PRIORITY,
            func: Box::new(move || published.borrow().clone()),
        });

        Self {
            name,
            grid,
            header_height: None,
            visible_row_cache: Vec::new(),
            visible_column_cache: Vec::new(),
            row_index: HashMap::new(),
            rendered_rows: Vec::new(),
            rendered_columns: Vec::new(),
            current_top_row: 0,
            current_first_column: 0,
            column_offset: 0.0,
            scroll: ScrollState::default(),
            canvas_height_should_update: true,
            canvas_height: 0.0,
            pending_canvas_change: None,
            canvas_width: 0.0,
            column_styles,
            viewport_adjusters: AdjusterRegistry::new(),
        }
    }

    /// Give this pane its own header height.
    #[must_use]
    pub fn with_header_height(mut self, header_height: f64) -> Self {
        self.header_height = Some(header_height);
        self
    }

    pub fn name(&self) -> PaneName {
        self.name
    }

    pub fn grid(&self) -> &Rc<dyn GridContext> {
        &self.grid
    }

    /// Replace the rows eligible for this pane.
    pub fn set_visible_rows(&mut self, rows: Vec<Row>) {
        self.visible_row_cache = rows;
        self.rebuild_row_index();
        self.canvas_height_should_update = true;
    }

    /// Append rows to the end of the cache, e.g. a page loaded by infinite scroll.
    pub fn append_rows(&mut self, rows: impl IntoIterator<Item = Row>) {
        let start = self.visible_row_cache.len();
        self.visible_row_cache.extend(rows);
        for (offset, row) in self.visible_row_cache.iter().enumerate().skip(start) {
            self.row_index.entry(row.key.clone()).or_insert(offset);
        }
        self.canvas_height_should_update = true;
    }

    /// Replace the columns eligible for this pane.
    ///
    /// Drawn widths are recomputed by the next [`RenderContainer::update_column_widths`].
    pub fn set_visible_columns(&mut self, columns: Vec<Column>) {
        self.visible_column_cache = columns;
    }

    fn rebuild_row_index(&mut self) {
        self.row_index.clear();
        for (index, row) in self.visible_row_cache.iter().enumerate() {
            if self.row_index.contains_key(&row.key) {
                log::debug!("duplicate row key '{}' at index {index}", row.key);
                continue;
            }
            self.row_index.insert(row.key.clone(), index);
        }
    }

    /// Clear caches and the rendered window, keeping registrations and
    /// scroll state. Used when the row/column source set changes.
    pub fn reset(&mut self) {
        self.visible_row_cache.clear();
        self.visible_column_cache.clear();
        self.row_index.clear();
        self.rendered_rows.clear();
        self.rendered_columns.clear();
        self.current_top_row = 0;
        self.current_first_column = 0;
        self.column_offset = 0.0;
        self.canvas_height_should_update = true;
    }

    pub fn visible_row_cache(&self) -> &[Row] {
        &self.visible_row_cache
    }

    pub fn visible_column_cache(&self) -> &[Column] {
        &self.visible_column_cache
    }

    pub fn rendered_rows(&self) -> &[Row] {
        &self.rendered_rows
    }

    pub fn rendered_columns(&self) -> &[Column] {
        &self.rendered_columns
    }

    pub fn current_top_row(&self) -> usize {
        self.current_top_row
    }

    pub fn current_first_column(&self) -> usize {
        self.current_first_column
    }

    /// Width of the unrendered columns left of the window.
    pub fn column_offset(&self) -> f64 {
        self.column_offset
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    /// Current cache index of a row, by key.
    pub fn row_index_of(&self, key: &RowKey) -> Option<usize> {
        self.row_index.get(key).copied()
    }

    pub fn visible_row_count(&self) -> usize {
        self.visible_row_cache.len()
    }

    /// Layout rules from the last width pass.
    pub fn column_styles(&self) -> String {
        self.column_styles.borrow().clone()
    }

    pub fn register_viewport_adjuster(&mut self, adjuster: Rc<dyn ViewportAdjuster>) {
        self.viewport_adjusters.register(adjuster);
    }

    /// Remove the first registration of `adjuster`; `false` if it was not registered.
    pub fn remove_viewport_adjuster(&mut self, adjuster: &Rc<dyn ViewportAdjuster>) -> bool {
        self.viewport_adjusters.remove(adjuster)
    }

    pub fn viewport_adjuster_count(&self) -> usize {
        self.viewport_adjusters.len()
    }

    pub fn viewport_adjustment(&self) -> ViewportAdjustment {
        self.viewport_adjusters.fold()
    }

    /// Grid height minus header and footer, plus adjuster deltas.
    pub fn viewport_height(&self) -> f64 {
        let geometry = self.grid.geometry();
        let header_height = self.header_height.unwrap_or(geometry.header_height);
        geometry.grid_height - header_height - geometry.footer_height
            + self.viewport_adjustment().height
    }

    /// Grid width plus adjuster deltas.
    pub fn viewport_width(&self) -> f64 {
        self.grid.geometry().grid_width + self.viewport_adjustment().width
    }

    pub fn header_viewport_width(&self) -> f64 {
        self.viewport_width()
    }

    /// Rows needed (counted from the end) to fill the viewport.
    pub fn min_rows_to_render(&self) -> usize {
        min_rows_to_render(&self.visible_row_cache, self.viewport_height())
    }

    /// Most consecutive columns visible at once.
    pub fn min_columns_to_render(&self) -> usize {
        min_columns_to_render(&self.visible_column_cache, self.viewport_width())
    }

    /// Force the next canvas-height query to re-sum the row heights.
    pub fn mark_canvas_height_dirty(&mut self) {
        self.canvas_height_should_update = true;
    }

    pub fn canvas_height_should_update(&self) -> bool {
        self.canvas_height_should_update
    }

    /// Total height of the cached rows; recomputed only when dirty, in which
    /// case the grid is notified of the change.
    pub fn canvas_height(&mut self) -> f64 {
        let height = self.refresh_canvas_height();
        self.flush_canvas_height_change();
        height
    }

    fn refresh_canvas_height(&mut self) -> f64 {
        if !self.canvas_height_should_update {
            return self.canvas_height;
        }
        let old_height = self
            .pending_canvas_change
            .map_or(self.canvas_height, |(old, _)| old);
        self.canvas_height = self.visible_row_cache.iter().map(|row| row.height).sum();
        self.canvas_height_should_update = false;
        self.pending_canvas_change = Some((old_height, self.canvas_height));
        self.canvas_height
    }

    fn flush_canvas_height_change(&mut self) {
        if let Some((old_height, new_height)) = self.pending_canvas_change.take() {
            self.grid.canvas_height_changed(old_height, new_height);
        }
    }

    /// Width computed by the last width pass.
    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Canvas height minus viewport height; negative when nothing scrolls.
    pub fn vertical_scroll_length(&mut self) -> f64 {
        let length = self.refresh_vertical_scroll_length();
        self.flush_canvas_height_change();
        length
    }

    fn refresh_vertical_scroll_length(&mut self) -> f64 {
        self.refresh_canvas_height() - self.viewport_height()
    }

    /// Canvas width minus viewport width; negative when nothing scrolls.
    pub fn horizontal_scroll_length(&self) -> f64 {
        self.canvas_width - self.viewport_width()
    }
}
