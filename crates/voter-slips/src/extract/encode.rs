//! JPEG data URI encoding for slip images

use crate::types::Result;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Encode an image as `data:image/jpeg;base64,...`
pub fn encode_jpeg_data_uri(image: &RgbImage, quality: u8) -> Result<String> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    image.write_with_encoder(encoder)?;
    Ok(format!("{}{}", JPEG_DATA_URI_PREFIX, BASE64.encode(buffer)))
}

/// Decode the payload of a base64 data URI
pub fn decode_data_uri(uri: &str) -> std::result::Result<Vec<u8>, String> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| "not a data URI".to_string())?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URI has no payload".to_string())?;
    if !header.ends_with(";base64") {
        return Err(format!("unsupported data URI encoding: {}", header));
    }
    BASE64.decode(payload).map_err(|e| e.to_string())
}
