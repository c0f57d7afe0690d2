//! Template image loading

use crate::constants::TEMPLATE_PREVIEW_MAX_WIDTH;
use crate::geometry::{Rect, Size};
use crate::types::{Result, SlipError};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

use super::pdf::PdfImage;

/// The two raster encodings accepted for templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Png,
    Jpeg,
}

/// A template raster plus its intrinsic pixel size.
///
/// Only constructible from PNG or JPEG data, so composition never starts
/// with an unusable template.
#[derive(Debug, Clone)]
pub struct TemplateImage {
    format: TemplateFormat,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl TemplateImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = match image::guess_format(&bytes) {
            Ok(ImageFormat::Png) => TemplateFormat::Png,
            Ok(ImageFormat::Jpeg) => TemplateFormat::Jpeg,
            _ => return Err(SlipError::UnsupportedTemplate),
        };
        let image_format = match format {
            TemplateFormat::Png => ImageFormat::Png,
            TemplateFormat::Jpeg => ImageFormat::Jpeg,
        };
        let (width, height) =
            ImageReader::with_format(Cursor::new(&bytes), image_format).into_dimensions()?;

        Ok(Self {
            format,
            width,
            height,
            bytes,
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        tokio::task::spawn_blocking(move || Self::from_bytes(bytes)).await?
    }

    pub fn format(&self) -> TemplateFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Downscale factor used when the template is shown for mapping
    pub fn preview_scale(&self) -> f64 {
        let width = f64::from(self.width);
        if width > TEMPLATE_PREVIEW_MAX_WIDTH {
            TEMPLATE_PREVIEW_MAX_WIDTH / width
        } else {
            1.0
        }
    }

    /// Convert a selection made on the preview into template pixels
    pub fn mapping_from_preview(&self, selection: &Rect) -> Rect {
        selection.rescale(self.preview_scale(), 1.0)
    }

    /// Mapping rectangle shown on the preview
    pub fn mapping_to_preview(&self, mapping: &Rect) -> Rect {
        mapping.rescale(1.0, self.preview_scale())
    }

    pub(crate) fn to_pdf_image(&self) -> Result<PdfImage> {
        match self.format {
            TemplateFormat::Jpeg => PdfImage::from_jpeg(self.bytes.clone()),
            TemplateFormat::Png => PdfImage::from_png(&self.bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([240, 240, 240]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_template() {
        let template = TemplateImage::from_bytes(png_bytes(595, 842)).unwrap();
        assert_eq!(template.format(), TemplateFormat::Png);
        assert_eq!(template.size(), Size::new(595.0, 842.0));
        assert_eq!(template.preview_scale(), 1.0);
    }

    #[test]
    fn test_unsupported_template() {
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec();
        assert!(matches!(
            TemplateImage::from_bytes(gif),
            Err(SlipError::UnsupportedTemplate)
        ));
        assert!(matches!(
            TemplateImage::from_bytes(b"not an image".to_vec()),
            Err(SlipError::UnsupportedTemplate)
        ));
    }

    #[test]
    fn test_preview_mapping_round_trip() {
        let template = TemplateImage::from_bytes(png_bytes(1600, 100)).unwrap();
        assert_eq!(template.preview_scale(), 0.5);

        let selection = Rect::new(7.0, 181.5, 164.0, 75.0);
        let mapping = template.mapping_from_preview(&selection);
        assert!(mapping.approx_eq(&Rect::new(14.0, 363.0, 328.0, 150.0), 1e-9));
        assert!(template.mapping_to_preview(&mapping).approx_eq(&selection, 1e-9));
    }
}
