//! Content presence heuristic
//!
//! Decides whether an extraction-space rectangle holds a filled slip by
//! counting ink-dark pixels inside an inset of the rectangle.

use crate::constants::{DARK_LUMINANCE_THRESHOLD, OCCUPIED_DENSITY, PRESENCE_MARGIN};
use crate::geometry::Rect;
use image::RgbImage;

/// Tunable thresholds for the presence heuristic
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresenceFilter {
    /// Pixels whose mean channel value is below this are dark
    pub luminance_threshold: u8,
    /// Required dark fraction of the full rectangle area
    pub density_threshold: f64,
    /// Inset in authoring units on each side, scaled by the render scale
    pub margin: f64,
}

impl Default for PresenceFilter {
    fn default() -> Self {
        Self {
            luminance_threshold: DARK_LUMINANCE_THRESHOLD,
            density_threshold: OCCUPIED_DENSITY,
            margin: PRESENCE_MARGIN,
        }
    }
}

impl PresenceFilter {
    /// Count dark pixels inside `rect` (extraction space) minus the margin.
    ///
    /// Pixels of the inset region that fall outside the raster are ignored.
    pub fn dark_pixel_count(&self, raster: &RgbImage, rect: &Rect, scale: f64) -> u64 {
        let sample = rect.inset(self.margin * scale);
        let x0 = sample.x.floor().max(0.0) as u32;
        let y0 = sample.y.floor().max(0.0) as u32;
        let x1 = ((sample.x.floor() + sample.width.floor()).max(0.0) as u32).min(raster.width());
        let y1 = ((sample.y.floor() + sample.height.floor()).max(0.0) as u32).min(raster.height());

        // Mean of three channels below threshold, without the division
        let limit = u32::from(self.luminance_threshold) * 3;
        let mut dark = 0u64;
        for y in y0..y1 {
            for x in x0..x1 {
                let [r, g, b] = raster.get_pixel(x, y).0;
                if u32::from(r) + u32::from(g) + u32::from(b) < limit {
                    dark += 1;
                }
            }
        }
        dark
    }

    /// Whether enough ink was found for `rect` to count as occupied
    pub fn is_occupied(&self, raster: &RgbImage, rect: &Rect, scale: f64) -> bool {
        let area = rect.area();
        if !(area > 0.0) {
            return false;
        }
        let dark = self.dark_pixel_count(raster, rect, scale);
        dark as f64 > area * self.density_threshold
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(self.density_threshold >= 0.0 && self.density_threshold <= 1.0) {
            return Err(crate::SlipError::Config(format!(
                "Density threshold must be within 0..=1, got {}",
                self.density_threshold
            )));
        }
        if !(self.margin >= 0.0) {
            return Err(crate::SlipError::Config(format!(
                "Presence margin must be non-negative, got {}",
                self.margin
            )));
        }
        Ok(())
    }
}
