#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use voter_slips::extract::encode_jpeg_data_uri;
use voter_slips::*;

/// Base page raster size (scale 1.0) that contains the generated grids
pub const PAGE_WIDTH: u32 = 792;
pub const PAGE_HEIGHT: u32 = 1120;

pub fn blank_page() -> RgbImage {
    RgbImage::from_pixel(PAGE_WIDTH, PAGE_HEIGHT, Rgb([255, 255, 255]))
}

/// Paint an ink block over the middle 40% of `rect` (scale 1.0 coordinates)
pub fn ink(page: &mut RgbImage, rect: &Rect) {
    let x0 = (rect.x + rect.width * 0.3) as u32;
    let y0 = (rect.y + rect.height * 0.3) as u32;
    let x1 = (rect.x + rect.width * 0.7) as u32;
    let y1 = (rect.y + rect.height * 0.7) as u32;
    for y in y0..y1.min(page.height()) {
        for x in x0..x1.min(page.width()) {
            page.put_pixel(x, y, Rgb([20, 20, 20]));
        }
    }
}

/// Page with ink in the listed slots of `rects`
pub fn page_with_slots(rects: &UnitRectSet, slots: &[usize]) -> RgbImage {
    let mut page = blank_page();
    for &slot in slots {
        ink(&mut page, rects.get(slot).unwrap());
    }
    page
}

/// Document whose first two pages are blank covers
pub fn roll(pages: Vec<RgbImage>) -> RasterDocument {
    let mut all = vec![blank_page(), blank_page()];
    all.extend(pages);
    RasterDocument::new(all, 1.0).unwrap()
}

pub fn slip_record(page_number: usize, index: usize) -> SlipRecord {
    let img = RgbImage::from_pixel(64, 30, Rgb([30, 30, 30]));
    SlipRecord {
        id: format!("v-{}-{}", page_number, index),
        image_data: encode_jpeg_data_uri(&img, 95).unwrap(),
        page_number,
    }
}

pub fn records(count: usize) -> Vec<SlipRecord> {
    (0..count).map(|i| slip_record(3 + i / 15, i % 15)).collect()
}

pub fn png_template(width: u32, height: u32) -> TemplateImage {
    let img = RgbImage::from_pixel(width, height, Rgb([250, 250, 240]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    TemplateImage::from_bytes(out.into_inner()).unwrap()
}

/// Adobe-style CMYK JPEG, as exported by print design tools
pub fn cmyk_jpeg_template(width: u16, height: u16) -> TemplateImage {
    let pixels = [10u8, 0, 40, 0].repeat(usize::from(width) * usize::from(height));
    let mut out = Vec::new();
    jpeg_encoder::Encoder::new(&mut out, 90)
        .encode(&pixels, width, height, jpeg_encoder::ColorType::Cmyk)
        .unwrap();
    TemplateImage::from_bytes(out).unwrap()
}

pub fn jpeg_template(width: u32, height: u32) -> TemplateImage {
    let img = RgbImage::from_pixel(width, height, Rgb([250, 250, 240]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
    TemplateImage::from_bytes(out.into_inner()).unwrap()
}
