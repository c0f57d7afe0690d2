//! Pixel cropping and tone adjustment for extracted slips

use crate::constants::{ENHANCE_BRIGHTNESS, ENHANCE_CONTRAST};
use crate::geometry::Rect;
use image::{Rgb, RgbImage, imageops};

/// Contrast then brightness, matching CSS `contrast()` / `brightness()`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enhancement {
    pub contrast: f32,
    pub brightness: f32,
}

impl Default for Enhancement {
    fn default() -> Self {
        Self {
            contrast: ENHANCE_CONTRAST,
            brightness: ENHANCE_BRIGHTNESS,
        }
    }
}

impl Enhancement {
    pub const NONE: Enhancement = Enhancement {
        contrast: 1.0,
        brightness: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        self.contrast == 1.0 && self.brightness == 1.0
    }

    /// Adjust a single channel value
    pub fn adjust(&self, value: u8) -> u8 {
        let c = f32::from(value) / 255.0;
        let c = ((c - 0.5) * self.contrast + 0.5).clamp(0.0, 1.0);
        let c = (c * self.brightness).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    }

    pub fn apply(&self, image: &mut RgbImage) {
        if self.is_identity() {
            return;
        }
        let lut: Vec<u8> = (0..=255u8).map(|v| self.adjust(v)).collect();
        for pixel in image.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = lut[*channel as usize];
            }
        }
    }
}

/// Copy `rect` (extraction space) out of `raster` onto a white canvas.
///
/// The canvas is `width × height` truncated to whole pixels; any part of
/// the rectangle outside the raster stays white.
pub fn crop_region(raster: &RgbImage, rect: &Rect) -> RgbImage {
    let width = rect.width.max(1.0) as u32;
    let height = rect.height.max(1.0) as u32;
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let src_x = rect.x.round() as i64;
    let src_y = rect.y.round() as i64;

    // Visible window of the source raster
    let x0 = src_x.max(0);
    let y0 = src_y.max(0);
    let x1 = (src_x + i64::from(width)).min(i64::from(raster.width()));
    let y1 = (src_y + i64::from(height)).min(i64::from(raster.height()));
    if x1 <= x0 || y1 <= y0 {
        return canvas;
    }

    let view = imageops::crop_imm(
        raster,
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    );
    imageops::replace(&mut canvas, &view.to_image(), x0 - src_x, y0 - src_y);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_matches_css_filters() {
        let e = Enhancement::default();
        // white saturates, black stays black
        assert_eq!(e.adjust(255), 255);
        assert_eq!(e.adjust(0), 0);
        // mid grey: contrast leaves 0.5, brightness lifts it
        assert_eq!(e.adjust(128), 134);
    }

    #[test]
    fn test_none_is_identity() {
        let mut img = RgbImage::from_fn(4, 4, |x, y| Rgb([(x * 60) as u8, (y * 60) as u8, 7]));
        let before = img.clone();
        Enhancement::NONE.apply(&mut img);
        assert_eq!(img, before);
    }

    #[test]
    fn test_crop_copies_pixels() {
        let raster = RgbImage::from_fn(100, 100, |x, y| Rgb([x as u8, y as u8, 0]));
        let crop = crop_region(&raster, &Rect::new(10.0, 20.0, 30.5, 40.9));
        assert_eq!(crop.dimensions(), (30, 40));
        assert_eq!(crop.get_pixel(0, 0).0, [10, 20, 0]);
        assert_eq!(crop.get_pixel(29, 39).0, [39, 59, 0]);
    }

    #[test]
    fn test_crop_outside_stays_white() {
        let raster = RgbImage::from_pixel(50, 50, Rgb([0, 0, 0]));
        let crop = crop_region(&raster, &Rect::new(40.0, 0.0, 20.0, 10.0));
        assert_eq!(crop.get_pixel(5, 5).0, [0, 0, 0]);
        assert_eq!(crop.get_pixel(15, 5).0, [255, 255, 255]);
    }
}
