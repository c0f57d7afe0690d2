//! Slip extraction from a multi-page source document
//!
//! For every page from the first slip page onward:
//! 1. Render the page at the extraction scale
//! 2. Build candidate rectangles (with the page offset quirk)
//! 3. Skip candidates outside the raster, and empty ones
//! 4. Crop, enhance and JPEG-encode the rest
//!
//! Any load or render failure aborts the run; no partial results escape.

mod crop;
mod encode;
mod offset;

pub use crop::{Enhancement, crop_region};
pub use encode::{decode_data_uri, encode_jpeg_data_uri};
pub use offset::{candidate_rects, needs_offset_correction};

use crate::constants::{EXTRACTION_SCALE, FIRST_SLIP_PAGE, JPEG_QUALITY};
use crate::geometry::UnitRectSet;
use crate::presence::PresenceFilter;
use crate::source::PageSource;
use crate::types::*;
use std::ops::ControlFlow;

/// Extraction tuning
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractionOptions {
    /// Render scale for cropping
    pub scale: f64,
    /// First 1-based page holding slips
    pub first_page: usize,
    pub presence: PresenceFilter,
    pub enhancement: Enhancement,
    pub jpeg_quality: u8,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            scale: EXTRACTION_SCALE,
            first_page: FIRST_SLIP_PAGE,
            presence: PresenceFilter::default(),
            enhancement: Enhancement::default(),
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl ExtractionOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SlipError::Config(format!(
                "Extraction scale must be positive, got {}",
                self.scale
            )));
        }
        if self.first_page == 0 {
            return Err(SlipError::Config("Page numbers start at 1".to_string()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(SlipError::Config(format!(
                "JPEG quality must be within 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        self.presence.validate()
    }
}

/// Counters for one extraction run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractionStats {
    pub pages_processed: usize,
    pub candidates: usize,
    pub out_of_bounds: usize,
    pub empty: usize,
    pub occupied: usize,
}

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Page-then-candidate order
    pub records: Vec<SlipRecord>,
    pub stats: ExtractionStats,
}

/// Extract every occupied slot from `source`.
///
/// `on_progress` is called once before each page is rendered.
pub fn extract_slips<S, F>(
    source: &S,
    unit_rects: &UnitRectSet,
    options: &ExtractionOptions,
    mut on_progress: F,
) -> Result<Extraction>
where
    S: PageSource + ?Sized,
    F: FnMut(Progress) -> ControlFlow<()>,
{
    options.validate()?;
    if unit_rects.is_empty() {
        return Err(SlipError::Config("No unit rectangles defined".to_string()));
    }
    unit_rects.validate()?;

    let total_pages = source.page_count();
    if total_pages < options.first_page {
        return Err(SlipError::TooFewPages {
            found: total_pages,
            required: options.first_page,
        });
    }

    let page_total = total_pages - options.first_page + 1;
    let mut records = Vec::new();
    let mut stats = ExtractionStats::default();

    for (done, page_number) in (options.first_page..=total_pages).enumerate() {
        report(&mut on_progress, Stage::Extract, done, page_total)?;

        // One raster alive at a time; dropped at the end of the iteration
        let raster = source.render_page(page_number, options.scale)?;
        let page_height = f64::from(raster.height());
        let candidates = candidate_rects(unit_rects.as_slice(), options.scale, page_number);
        let found_before = records.len();

        for (index, rect) in candidates.iter().enumerate() {
            stats.candidates += 1;

            if !rect.fits_vertically(page_height) {
                log::warn!(
                    "Page {}: slot {} lies outside the page, skipped",
                    page_number,
                    index
                );
                stats.out_of_bounds += 1;
                continue;
            }

            if !options.presence.is_occupied(&raster, rect, options.scale) {
                log::debug!("Page {}: slot {} is empty", page_number, index);
                stats.empty += 1;
                continue;
            }

            let mut crop = crop_region(&raster, rect);
            options.enhancement.apply(&mut crop);
            let image_data = encode_jpeg_data_uri(&crop, options.jpeg_quality)?;

            records.push(SlipRecord {
                id: format!("v-{}-{}", page_number, index),
                image_data,
                page_number,
            });
            stats.occupied += 1;
        }

        stats.pages_processed += 1;
        log::info!(
            "Page {}/{}: {} slips from {} candidates",
            page_number,
            total_pages,
            records.len() - found_before,
            candidates.len()
        );
    }

    report(&mut on_progress, Stage::Extract, page_total, page_total)?;
    log::info!(
        "Extracted {} slips from {} pages",
        stats.occupied,
        stats.pages_processed
    );

    Ok(Extraction { records, stats })
}

/// Extract slips from a PDF file rendered with pdfium
#[cfg(feature = "pdfium")]
pub async fn extract_from_pdf<F>(
    path: impl AsRef<std::path::Path>,
    unit_rects: UnitRectSet,
    options: ExtractionOptions,
    on_progress: F,
) -> Result<Extraction>
where
    F: FnMut(Progress) -> ControlFlow<()> + Send + 'static,
{
    let bytes = tokio::fs::read(path.as_ref()).await?;
    tokio::task::spawn_blocking(move || {
        let pdfium = crate::source::init_pdfium()?;
        let source = crate::source::PdfiumSource::from_bytes(&pdfium, &bytes)?;
        extract_slips(&source, &unit_rects, &options, on_progress)
    })
    .await?
}
