//! PNG encode/decode helpers shared by the restorer and the binary.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageResult, RgbaImage};

use crate::geometry::ImageBounds;

pub fn bounds_of(image: &RgbaImage) -> ImageBounds {
    ImageBounds::new(image.width(), image.height())
}

pub fn encode_png(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

pub fn decode_png(bytes: &[u8]) -> ImageResult<RgbaImage> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8())
}

pub fn load_rgba(path: &Path) -> ImageResult<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

pub fn save_png(image: &RgbaImage, path: &Path) -> ImageResult<()> {
    image.save_with_format(path, ImageFormat::Png)
}
