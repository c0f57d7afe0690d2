//! Minimal multi-page PDF writer for image-only pages
//!
//! Pages are added with a size, images are drawn with a bottom-left origin,
//! and `finish` assembles the page tree. Images are Image XObjects:
//! - JPEG: passed through with DCTDecode, CMYK kept as DeviceCMYK
//! - PNG: decoded, deflated with FlateDecode, alpha split into an SMask

use crate::geometry::{Rect, Size};
use crate::types::{Result, SlipError};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder, ImageFormat};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::{Cursor, Write};
use zune_jpeg::zune_core::colorspace::ColorSpace;
use zune_jpeg::zune_core::options::DecoderOptions;

/// Adobe CMYK JPEGs store inverted ink values
const INVERTED_CMYK_DECODE: [i64; 8] = [1, 0, 1, 0, 1, 0, 1, 0];

// =============================================================================
// Image XObjects
// =============================================================================

/// Image data ready to embed
#[derive(Debug, Clone)]
pub struct PdfImage {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static str,
    /// `DCTDecode` or `FlateDecode`
    pub filter: &'static str,
    pub data: Vec<u8>,
    /// Deflated 8-bit alpha channel
    pub soft_mask: Option<Vec<u8>>,
    /// `/Decode` array overriding the default component mapping
    pub decode: Option<&'static [i64]>,
}

impl PdfImage {
    /// Wrap JPEG bytes without transcoding
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self> {
        let decoder = JpegDecoder::new(Cursor::new(&data))?;
        let (width, height) = decoder.dimensions();

        // `image` reports CMYK sources as RGB, so read the frame header directly
        let (color_space, decode) = match jpeg_input_color_space(&data) {
            Some(ColorSpace::Luma | ColorSpace::LumaA) => ("DeviceGray", None),
            Some(ColorSpace::CMYK | ColorSpace::YCCK) => {
                ("DeviceCMYK", Some(&INVERTED_CMYK_DECODE[..]))
            }
            _ => ("DeviceRGB", None),
        };
        Ok(Self {
            width,
            height,
            color_space,
            filter: "DCTDecode",
            data,
            soft_mask: None,
            decode,
        })
    }

    /// Decode a PNG and deflate its pixels
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(data, ImageFormat::Png)?;
        let (width, height) = (img.width(), img.height());

        let (color_space, pixels, alpha) = match img.color() {
            ColorType::L8 | ColorType::L16 => ("DeviceGray", img.to_luma8().into_raw(), None),
            ColorType::La8 | ColorType::La16 => {
                let la = img.to_luma_alpha8();
                let gray: Vec<u8> = la.pixels().map(|p| p.0[0]).collect();
                let alpha: Vec<u8> = la.pixels().map(|p| p.0[1]).collect();
                ("DeviceGray", gray, Some(alpha))
            }
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => {
                let rgba = img.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                let mut alpha = Vec::with_capacity((width * height) as usize);
                for p in rgba.pixels() {
                    rgb.extend_from_slice(&p.0[..3]);
                    alpha.push(p.0[3]);
                }
                ("DeviceRGB", rgb, Some(alpha))
            }
            _ => ("DeviceRGB", img.to_rgb8().into_raw(), None),
        };

        // Fully opaque masks are dropped
        let alpha = alpha.filter(|a| a.iter().any(|&v| v != 255));

        Ok(Self {
            width,
            height,
            color_space,
            filter: "FlateDecode",
            data: deflate(&pixels)?,
            soft_mask: alpha.map(|a| deflate(&a)).transpose()?,
            decode: None,
        })
    }

    fn xobject_dict(&self, color_space: &str, filter: &str) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", Object::Integer(i64::from(self.width)));
        dict.set("Height", Object::Integer(i64::from(self.height)));
        dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
        dict.set("BitsPerComponent", Object::Integer(8));
        dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
        dict
    }
}

fn jpeg_input_color_space(data: &[u8]) -> Option<ColorSpace> {
    let options = DecoderOptions::default().set_strict_mode(false);
    let mut decoder = zune_jpeg::JpegDecoder::new_with_options(Cursor::new(data), options);
    decoder.decode_headers().ok()?;
    decoder.input_colorspace()
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

// =============================================================================
// Writer
// =============================================================================

struct PendingPage {
    size: Size,
    xobjects: Dictionary,
    content: String,
}

/// Output document sink
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<PendingPage>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
        }
    }

    /// Embed an image once; the returned id may be drawn any number of times
    pub fn embed(&mut self, mut image: PdfImage) -> ObjectId {
        let mut dict = image.xobject_dict(image.color_space, image.filter);
        if let Some(decode) = image.decode {
            dict.set(
                "Decode",
                Object::Array(decode.iter().map(|&v| Object::Integer(v)).collect()),
            );
        }

        if let Some(mask) = image.soft_mask.take() {
            let mask_dict = image.xobject_dict("DeviceGray", "FlateDecode");
            let mask_id = self
                .doc
                .add_object(Stream::new(mask_dict, mask).with_compression(false));
            dict.set("SMask", Object::Reference(mask_id));
        }

        self.doc
            .add_object(Stream::new(dict, image.data).with_compression(false))
    }

    /// Start a new page, returning its index
    pub fn add_page(&mut self, size: Size) -> usize {
        self.pages.push(PendingPage {
            size,
            xobjects: Dictionary::new(),
            content: String::new(),
        });
        self.pages.len() - 1
    }

    /// Draw an embedded image into `bounds` (bottom-left origin, points)
    pub fn draw_image(&mut self, page: usize, image: ObjectId, bounds: &Rect) -> Result<()> {
        let pending = self
            .pages
            .get_mut(page)
            .ok_or_else(|| SlipError::Config(format!("No output page {}", page)))?;

        let name = format!("Im{}", pending.xobjects.len());
        pending
            .xobjects
            .set(name.as_bytes(), Object::Reference(image));
        pending.content.push_str(&format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            bounds.width, bounds.height, bounds.x, bounds.y, name
        ));
        Ok(())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Assemble the page tree and catalog
    pub fn finish(mut self) -> Document {
        let mut kids = Vec::with_capacity(self.pages.len());

        for page in std::mem::take(&mut self.pages) {
            let content_id = self.doc.add_object(Stream::new(
                Dictionary::new(),
                page.content.into_bytes(),
            ));

            let mut resources = Dictionary::new();
            resources.set("XObject", Object::Dictionary(page.xobjects));

            let page_id = self.doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(self.pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(page.size.width as f32),
                        Object::Real(page.size.height as f32),
                    ]),
                ),
                ("Resources", Object::Dictionary(resources)),
                ("Contents", Object::Reference(content_id)),
            ]));
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        self.doc
    }
}
