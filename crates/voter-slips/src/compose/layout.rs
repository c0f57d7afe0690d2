//! Output page placement
//!
//! Pure geometry: decides page sizes and where the template and each slip
//! land, in PDF points with a bottom-left origin. Mapping rectangles come in
//! with a top-left origin in template pixels and are flipped here.

use crate::geometry::{Rect, Size};
use crate::types::LayoutMode;

use super::ComposeOptions;

/// What a placement draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacedImage {
    Template,
    /// Index into the slip record sequence
    Slip(usize),
}

/// One image draw. `bounds.y` is the bottom edge (bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub image: PlacedImage,
    pub bounds: Rect,
}

/// A single output page
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub size: Size,
    pub placements: Vec<Placement>,
}

impl PagePlan {
    pub fn slip_count(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| matches!(p.image, PlacedImage::Slip(_)))
            .count()
    }
}

/// Geometry of the 2×2 grid layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid4Geometry {
    pub page: Size,
    pub padding: f64,
    /// Size of one of the four slots
    pub slot: Size,
    /// Uniform template scale that fits it into a slot
    pub scale: f64,
    /// Template size after scaling
    pub scaled: Size,
}

impl Grid4Geometry {
    pub fn new(page: Size, padding: f64, template: Size) -> Self {
        let slot = Size::new(
            (page.width - padding * 3.0) / 2.0,
            (page.height - padding * 3.0) / 2.0,
        );
        let scale = (slot.width / template.width).min(slot.height / template.height);
        Self {
            page,
            padding,
            slot,
            scale,
            scaled: Size::new(template.width * scale, template.height * scale),
        }
    }

    /// Bottom-left corner of the scaled template in slot `index` (0..4),
    /// centered within the slot
    pub fn template_origin(&self, index: usize) -> (f64, f64) {
        let row = (index / 2) as f64;
        let col = (index % 2) as f64;
        let x = self.padding
            + col * (self.slot.width + self.padding)
            + (self.slot.width - self.scaled.width) / 2.0;
        let y = self.page.height - (self.padding + (row + 1.0) * self.slot.height)
            + (self.slot.height - self.scaled.height) / 2.0;
        (x, y)
    }

    /// Where the mapping rectangle lands in slot `index`
    pub fn slip_bounds(&self, index: usize, mapping: &Rect) -> Rect {
        let (x, y) = self.template_origin(index);
        let m = mapping.scaled(self.scale);
        Rect::new(x + m.x, y + m.flipped_y(self.scaled.height), m.width, m.height)
    }
}

/// Lay out `record_count` slips under `layout`
pub fn plan_pages(
    record_count: usize,
    template: Size,
    mapping: &Rect,
    layout: LayoutMode,
    options: &ComposeOptions,
) -> Vec<PagePlan> {
    match layout {
        LayoutMode::Single => plan_single(record_count, template, mapping),
        LayoutMode::Grid4 => plan_grid4(record_count, template, mapping, options),
    }
}

fn plan_single(record_count: usize, template: Size, mapping: &Rect) -> Vec<PagePlan> {
    let slip_bounds = Rect::new(
        mapping.x,
        mapping.flipped_y(template.height),
        mapping.width,
        mapping.height,
    );

    (0..record_count)
        .map(|index| PagePlan {
            size: template,
            placements: vec![
                Placement {
                    image: PlacedImage::Template,
                    bounds: Rect::new(0.0, 0.0, template.width, template.height),
                },
                Placement {
                    image: PlacedImage::Slip(index),
                    bounds: slip_bounds,
                },
            ],
        })
        .collect()
}

fn plan_grid4(
    record_count: usize,
    template: Size,
    mapping: &Rect,
    options: &ComposeOptions,
) -> Vec<PagePlan> {
    let geometry = Grid4Geometry::new(options.page_size, options.padding, template);
    let per_page = LayoutMode::Grid4.slips_per_page();

    (0..record_count)
        .collect::<Vec<_>>()
        .chunks(per_page)
        .map(|chunk| {
            let mut placements = Vec::with_capacity(chunk.len() * 2);
            for (slot, &record) in chunk.iter().enumerate() {
                let (x, y) = geometry.template_origin(slot);
                placements.push(Placement {
                    image: PlacedImage::Template,
                    bounds: Rect::new(x, y, geometry.scaled.width, geometry.scaled.height),
                });
                placements.push(Placement {
                    image: PlacedImage::Slip(record),
                    bounds: geometry.slip_bounds(slot, mapping),
                });
            }
            PagePlan {
                size: geometry.page,
                placements,
            }
        })
        .collect()
}
