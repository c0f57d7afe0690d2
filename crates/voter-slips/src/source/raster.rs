use super::PageSource;
use crate::types::{Result, SlipError};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Pages held as images, rendered at `base_scale`
#[derive(Debug, Clone)]
pub struct RasterDocument {
    pages: Vec<RgbImage>,
    base_scale: f64,
}

impl RasterDocument {
    /// `base_scale` is the scale the given images were rendered at
    pub fn new(pages: Vec<RgbImage>, base_scale: f64) -> Result<Self> {
        if !(base_scale.is_finite() && base_scale > 0.0) {
            return Err(SlipError::Config(format!(
                "Raster base scale must be positive, got {}",
                base_scale
            )));
        }
        Ok(Self { pages, base_scale })
    }

    pub fn from_images(images: Vec<DynamicImage>, base_scale: f64) -> Result<Self> {
        Self::new(images.into_iter().map(|i| i.to_rgb8()).collect(), base_scale)
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }
}

impl PageSource for RasterDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn render_page(&self, page_number: usize, scale: f64) -> Result<RgbImage> {
        let page = page_number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .ok_or_else(|| SlipError::PageRender {
                page: page_number,
                message: format!("page out of range (1..={})", self.pages.len()),
            })?;

        let factor = scale / self.base_scale;
        if (factor - 1.0).abs() < f64::EPSILON {
            return Ok(page.clone());
        }

        let width = (page.width() as f64 * factor).round().max(1.0) as u32;
        let height = (page.height() as f64 * factor).round().max(1.0) as u32;
        Ok(imageops::resize(page, width, height, FilterType::Triangle))
    }
}

/// Load page images (one file per page, in order) as a raster document
pub async fn load_raster_document(
    paths: &[impl AsRef<Path>],
    base_scale: f64,
) -> Result<RasterDocument> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let image =
            tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
        images.push(image);
    }
    RasterDocument::from_images(images, base_scale)
}
