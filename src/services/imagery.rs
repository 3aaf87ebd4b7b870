//! Downloading and decoding raster images for the canvas.

use std::io::Read;
use std::path::Path;

use super::ServiceError;

/// Largest image body we are willing to buffer.
const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Decoded RGBA8 pixels.
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    fn from_dynamic(image: image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        }
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, ServiceError> {
    Ok(RasterImage::from_dynamic(image::load_from_memory(bytes)?))
}

pub fn fetch_image(url: &str) -> Result<RasterImage, ServiceError> {
    let response = ureq::get(url)
        .set("User-Agent", "groundplan")
        .call()?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_IMAGE_BYTES)
        .read_to_end(&mut bytes)?;
    decode_image(&bytes)
}

pub fn load_image_file(path: &Path) -> Result<RasterImage, ServiceError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}
