//! Data types for the render-container engine.

mod column;
mod geometry;
mod options;
mod row;
mod style;

pub use column::*;
pub use geometry::*;
pub use options::*;
pub use row::*;
pub use style::*;
