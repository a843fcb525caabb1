//! Layout engine for render containers.
//!
//! This module handles:
//! - Folding registered viewport adjusters into the usable viewport size
//! - Choosing which contiguous slice of rows/columns to materialize
//! - Distributing available width across fixed, percent and star columns
//! - Per-pane scrollbar ownership

pub mod adjuster;
pub mod overflow;
pub mod widths;
pub mod windowing;

pub use adjuster::{AdjusterRegistry, ReserveSpace, ViewportAdjuster, ViewportAdjustment};
pub use overflow::viewport_style;
pub use widths::{allocate_column_widths, WidthAllocation};
pub use windowing::{
    min_columns_to_render, min_rows_to_render, target_index, AnchorRequest, Hysteresis,
    WindowDecision, WindowRequest,
};
