//! Coordinate model for axis-aligned rectangles
//!
//! Rectangles live in one of several scale spaces:
//! - authoring space (unscaled, the space unit rectangles are stored in)
//! - display space (authoring × interactive zoom)
//! - extraction space (authoring × high-resolution render scale)
//! - output space (PDF points, bottom-left origin)
//!
//! Moving between the first three is a pure per-component scale.

mod rect;
mod rect_set;
mod zoom;

pub use rect::*;
pub use rect_set::*;
pub use zoom::*;
