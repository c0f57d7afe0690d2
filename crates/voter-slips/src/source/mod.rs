//! Page rasterization sources
//!
//! The extractor only needs a page count and a raster of a given page at a
//! given scale. Two implementations are provided:
//! - [`RasterDocument`]: pre-rendered page images (scans), resampled on demand
//! - `PdfiumSource`: PDF pages rendered with pdfium (`pdfium` feature)

#[cfg(feature = "pdfium")]
mod pdfium;
mod raster;

#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumSource, init_pdfium};
pub use raster::{RasterDocument, load_raster_document};

use crate::types::Result;
use image::RgbImage;

/// A page-addressable document that can be rasterized at any scale.
///
/// Page numbers are 1-based. Scale 1.0 means one pixel per base unit
/// (one PDF point).
pub trait PageSource {
    fn page_count(&self) -> usize;

    fn render_page(&self, page_number: usize, scale: f64) -> Result<RgbImage>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn render_page(&self, page_number: usize, scale: f64) -> Result<RgbImage> {
        (**self).render_page(page_number, scale)
    }
}
