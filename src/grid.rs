//! The owning grid as seen by a render container.
//!
//! Containers never reach into a global grid. Everything they read or invoke
//! goes through [`GridContext`], handed to them at construction. [`GridHost`]
//! is a ready-made single-threaded implementation used by the JavaScript
//! bindings and by tests.

use std::cell::{Cell, RefCell};
use std::fmt;

use crate::types::{GridGeometry, GridOptions, ScrollDirection};

/// A producer of layout-rule text, run once per style pass.
pub struct StyleComputation {
    /// Lower priorities run first
    pub priority: u32,
    pub func: Box<dyn Fn() -> String>,
}

impl fmt::Debug for StyleComputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleComputation")
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Read-only configuration and services of the grid that owns a container.
///
/// All methods take `&self`; implementations that record service calls use
/// interior mutability.
pub trait GridContext {
    /// Identifier used to scope layout rules to this grid
    fn id(&self) -> &str;

    fn options(&self) -> GridOptions;

    fn geometry(&self) -> GridGeometry;

    fn is_rtl(&self) -> bool {
        self.options().rtl
    }

    /// Whether any visible column is pinned to the left pane
    fn has_left_container_columns(&self) -> bool;

    /// Whether any visible column is pinned to the right pane
    fn has_right_container_columns(&self) -> bool;

    /// Direction of the most recent vertical scroll
    fn scroll_direction(&self) -> ScrollDirection;

    fn register_style_computation(&self, computation: StyleComputation);

    /// Ask for a deferred re-render
    fn queue_refresh(&self);

    /// Notify listeners that a container's canvas height changed
    fn canvas_height_changed(&self, old_height: f64, new_height: f64);
}

/// Minimal owning grid: holds options and geometry, runs the style pipeline
/// and records the notifications containers emit.
#[derive(Debug)]
pub struct GridHost {
    id: String,
    options: Cell<GridOptions>,
    geometry: Cell<GridGeometry>,
    left_columns: Cell<bool>,
    right_columns: Cell<bool>,
    scroll_direction: Cell<ScrollDirection>,
    style_computations: RefCell<Vec<StyleComputation>>,
    refresh_requests: Cell<usize>,
    canvas_height_events: RefCell<Vec<(f64, f64)>>,
}

impl GridHost {
    pub fn new(id: impl Into<String>, options: GridOptions, geometry: GridGeometry) -> Self {
        Self {
            id: id.into(),
            options: Cell::new(options),
            geometry: Cell::new(geometry),
            left_columns: Cell::new(false),
            right_columns: Cell::new(false),
            scroll_direction: Cell::new(ScrollDirection::None),
            style_computations: RefCell::new(Vec::new()),
            refresh_requests: Cell::new(0),
            canvas_height_events: RefCell::new(Vec::new()),
        }
    }

    pub fn set_options(&self, options: GridOptions) {
        self.options.set(options);
    }

    pub fn set_geometry(&self, geometry: GridGeometry) {
        self.geometry.set(geometry);
    }

    /// Record which pinned panes currently hold columns.
    pub fn set_pinned_columns(&self, left: bool, right: bool) {
        self.left_columns.set(left);
        self.right_columns.set(right);
    }

    pub fn set_scroll_direction(&self, direction: ScrollDirection) {
        self.scroll_direction.set(direction);
    }

    /// Run every registered style computation in priority order and
    /// concatenate the results.
    pub fn build_styles(&self) -> String {
        let mut computations = self.style_computations.borrow_mut();
        computations.sort_by_key(|c| c.priority);
        computations.iter().map(|c| (c.func)()).collect()
    }

    pub fn style_computation_count(&self) -> usize {
        self.style_computations.borrow().len()
    }

    /// Number of refreshes requested since creation.
    pub fn refresh_requests(&self) -> usize {
        self.refresh_requests.get()
    }

    /// Drain the `(old, new)` canvas-height notifications received so far.
    pub fn take_canvas_height_events(&self) -> Vec<(f64, f64)> {
        std::mem::take(&mut *self.canvas_height_events.borrow_mut())
    }
}

impl GridContext for GridHost {
    fn id(&self) -> &str {
        &self.id
    }

    fn options(&self) -> GridOptions {
        self.options.get()
    }

    fn geometry(&self) -> GridGeometry {
        self.geometry.get()
    }

    fn has_left_container_columns(&self) -> bool {
        self.left_columns.get()
    }

    fn has_right_container_columns(&self) -> bool {
        self.right_columns.get()
    }

    fn scroll_direction(&self) -> ScrollDirection {
        self.scroll_direction.get()
    }

    fn register_style_computation(&self, computation: StyleComputation) {
        self.style_computations.borrow_mut().push(computation);
    }

    fn queue_refresh(&self) {
        self.refresh_requests.set(self.refresh_requests.get() + 1);
    }

    fn canvas_height_changed(&self, old_height: f64, new_height: f64) {
        log::debug!("grid {}: canvas height {old_height} -> {new_height}", self.id);
        self.canvas_height_events
            .borrow_mut()
            .push((old_height, new_height));
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
    fn test_build_styles_runs_in_priority_order() {
        let host = GridHost::new("1", GridOptions::default(), GridGeometry::default());
        host.register_style_computation(StyleComputation {
            priority: 10,
            func: Box::new(|| "b".to_string()),
        });
        host.register_style_computation(StyleComputation {
            priority: 5,
            func: Box::new(|| "a".to_string()),
        });
        assert_eq!(host.build_styles(), "ab");
        assert_eq!(host.style_computation_count(), 2);
    }

    #[test]
    fn test_records_notifications() {
        let host = GridHost::new("1", GridOptions::default(), GridGeometry::default());
        host.queue_refresh();
        host.queue_refresh();
        host.canvas_height_changed(0.0, 300.0);
        assert_eq!(host.refresh_requests(), 2);
        assert_eq!(host.take_canvas_height_events(), vec![(0.0, 300.0)]);
        assert!(host.take_canvas_height_events().is_empty());
    }

    #[test]
    fn test_rtl_follows_options() {
        let host = GridHost::new("1", GridOptions::default(), GridGeometry::default());
        assert!(!host.is_rtl());
        host.set_options(GridOptions {
            rtl: true,
            ..GridOptions::default()
        });
        assert!(host.is_rtl());
    }
}
