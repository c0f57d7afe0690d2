//! Slip composition onto the template
//!
//! This module orchestrates output generation:
//! 1. Embed the template once
//! 2. Plan output pages for the chosen layout
//! 3. Embed each slip and draw template + slip per placement
//! 4. Hand back the finished document for serialization

mod layout;
mod pdf;
mod template;

pub use layout::{Grid4Geometry, PagePlan, PlacedImage, Placement, plan_pages};
pub use pdf::{PdfImage, PdfWriter};
pub use template::{TemplateFormat, TemplateImage};

use crate::constants::*;
use crate::geometry::{Rect, Size};
use crate::types::*;
use lopdf::Document;
use std::ops::ControlFlow;
use std::path::Path;

/// Composition tuning
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    /// Output page size for grid4 (points)
    pub page_size: Size,
    /// Gap around and between grid4 slots (points)
    pub padding: f64,
    pub single_progress_interval: usize,
    pub grid4_progress_interval: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            page_size: Size::new(A4_WIDTH_PT, A4_HEIGHT_PT),
            padding: GRID4_PADDING,
            single_progress_interval: SINGLE_PROGRESS_INTERVAL,
            grid4_progress_interval: GRID4_PROGRESS_INTERVAL,
        }
    }
}

impl ComposeOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.padding >= 0.0) {
            return Err(SlipError::Config(format!(
                "Padding must be non-negative, got {}",
                self.padding
            )));
        }
        if self.page_size.width <= self.padding * 3.0 || self.page_size.height <= self.padding * 3.0
        {
            return Err(SlipError::Config(
                "Page too small for the grid padding".to_string(),
            ));
        }
        if self.single_progress_interval == 0 || self.grid4_progress_interval == 0 {
            return Err(SlipError::Config(
                "Progress interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn progress_interval(&self, layout: LayoutMode) -> usize {
        match layout {
            LayoutMode::Single => self.single_progress_interval,
            LayoutMode::Grid4 => self.grid4_progress_interval,
        }
    }
}

fn validate_mapping(mapping: &Rect) -> Result<()> {
    let finite = [mapping.x, mapping.y, mapping.width, mapping.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite || mapping.width <= 0.0 || mapping.height <= 0.0 {
        return Err(SlipError::Config(format!(
            "Mapping rectangle must have a positive size, got {:?}",
            mapping
        )));
    }
    Ok(())
}

/// Build the output document.
///
/// `on_progress` is called every K slips (K from [`ComposeOptions`]).
pub fn compose_document<F>(
    records: &[SlipRecord],
    template: &TemplateImage,
    mapping: &Rect,
    layout: LayoutMode,
    options: &ComposeOptions,
    mut on_progress: F,
) -> Result<Document>
where
    F: FnMut(Progress) -> ControlFlow<()>,
{
    options.validate()?;
    validate_mapping(mapping)?;
    if records.is_empty() {
        return Err(SlipError::NoRecords);
    }

    let mut writer = PdfWriter::new();
    let template_id = writer.embed(template.to_pdf_image()?);

    let plans = plan_pages(records.len(), template.size(), mapping, layout, options);
    let interval = options.progress_interval(layout);

    for plan in &plans {
        let page = writer.add_page(plan.size);
        for placement in &plan.placements {
            let image_id = match placement.image {
                PlacedImage::Template => template_id,
                PlacedImage::Slip(index) => {
                    if index % interval == 0 {
                        report(&mut on_progress, Stage::Compose, index, records.len())?;
                    }
                    let record = &records[index];
                    let image = PdfImage::from_jpeg(record.jpeg_bytes()?).map_err(|e| {
                        SlipError::InvalidCropData {
                            id: record.id.clone(),
                            message: e.to_string(),
                        }
                    })?;
                    writer.embed(image)
                }
            };
            writer.draw_image(page, image_id, &placement.bounds)?;
        }
    }

    report(&mut on_progress, Stage::Compose, records.len(), records.len())?;
    log::info!(
        "Composed {} slips onto {} pages ({:?} layout)",
        records.len(),
        writer.page_count(),
        layout
    );

    Ok(writer.finish())
}

/// Compose on a blocking thread
pub async fn compose<F>(
    records: Vec<SlipRecord>,
    template: TemplateImage,
    mapping: Rect,
    layout: LayoutMode,
    options: ComposeOptions,
    on_progress: F,
) -> Result<Document>
where
    F: FnMut(Progress) -> ControlFlow<()> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        compose_document(&records, &template, &mapping, layout, &options, on_progress)
    })
    .await?
}

/// Serialize a document to PDF bytes
pub fn serialize_pdf(mut doc: Document) -> Result<Vec<u8>> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

/// Save the composed document
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || serialize_pdf(doc)).await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}
