pub mod compose;
#[cfg(feature = "serde")]
mod config;
pub mod constants;
pub mod extract;
pub mod geometry;
mod grid;
mod presence;
pub mod source;
mod types;

pub use compose::{
    ComposeOptions, TemplateFormat, TemplateImage, compose, compose_document, save_pdf,
    serialize_pdf,
};
#[cfg(feature = "serde")]
pub use config::*;
pub use extract::{Extraction, ExtractionOptions, ExtractionStats, extract_slips};
pub use geometry::{Rect, Size, UnitRectSet, Zoom};
pub use grid::{GridParams, RowCount, generate_grid, generate_grid_with};
pub use presence::PresenceFilter;
pub use source::{PageSource, RasterDocument};
pub use types::*;
