//! virtgrid - viewport virtualization and column layout for data grids
//!
//! Decides which rows and columns of a large grid are materialized for the
//! current scroll position and how wide every column is drawn:
//! - Windowed rows/columns with scroll hysteresis and overscan
//! - Infinite-scroll re-anchoring on a stable row key
//! - Fixed, percentage and star column widths with min/max clamping
//! - Viewport adjusters, per-pane scrollbar ownership, RTL margins
//!
//! # Usage (Rust)
//!
//! ```rust
//! use std::rc::Rc;
//! use virtgrid::{GridContext, GridGeometry, GridHost, GridOptions, PaneName, RenderContainer, Row};
//!
//! let geometry = GridGeometry { grid_height: 300.0, grid_width: 500.0, ..GridGeometry::default() };
//! let host = Rc::new(GridHost::new("1", GridOptions::default(), geometry));
//! let mut body = RenderContainer::new(PaneName::Body, Rc::clone(&host) as Rc<dyn GridContext>);
//! body.set_visible_rows((0..1000_usize).map(|i| Row::new(i, 30.0)).collect());
//! body.adjust_scroll_vertical(Some(0.0), None, true);
//! assert_eq!(body.current_top_row(), 0);
//! ```

pub mod bindings;
pub mod container;
pub mod error;
pub mod grid;
pub mod layout;
pub mod types;

use wasm_bindgen::prelude::*;

pub use bindings::GridPane;
pub use container::{RenderContainer, ScrollState, COLUMN_STYLE_PRIORITY};
pub use error::{GridError, Result};
pub use grid::{GridContext, GridHost, StyleComputation};
pub use layout::{ReserveSpace, ViewportAdjuster, ViewportAdjustment, WidthAllocation};

pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
