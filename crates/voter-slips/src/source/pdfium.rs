use super::PageSource;
use crate::types::{Result, SlipError};
use image::{Rgb, RgbImage, RgbaImage};
use pdfium_render::prelude::*;

/// Initialize Pdfium, trying the vendored library first, then falling back to system
pub fn init_pdfium() -> Result<Pdfium> {
    // When running from cargo, the working directory is the workspace root
    let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
        p.push("vendor/pdfium/lib");
        if p.exists() { Some(p) } else { None }
    });

    if let Some(vendor_path) = vendor_path {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| SlipError::SourceLoad(format!("Failed to bind pdfium: {}", e)))
}

/// A PDF document rendered through pdfium
pub struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    pub fn from_bytes(pdfium: &'a Pdfium, bytes: &'a [u8]) -> Result<Self> {
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| SlipError::SourceLoad(e.to_string()))?;
        Ok(Self { document })
    }
}

impl PageSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, page_number: usize, scale: f64) -> Result<RgbImage> {
        let render_error = |e: PdfiumError| SlipError::PageRender {
            page: page_number,
            message: e.to_string(),
        };

        let index = page_number.checked_sub(1).ok_or(SlipError::PageRender {
            page: page_number,
            message: "page numbers start at 1".to_string(),
        })?;
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(render_error)?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale as f32);
        let bitmap = page.render_with_config(&config).map_err(render_error)?;
        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let rgba = bitmap.as_rgba_bytes().to_vec();

        let rgba = RgbaImage::from_raw(width, height, rgba).ok_or(SlipError::PageRender {
            page: page_number,
            message: "bitmap size mismatch".to_string(),
        })?;
        Ok(flatten_on_white(&rgba))
    }
}

/// Composite a possibly transparent raster over white
fn flatten_on_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}
