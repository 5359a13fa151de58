//! Diagnostic rendering: the input with every detected dot marked.

use crate::error::BrailleError;
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use std::io::Cursor;

use super::blobs::Centroid;

const MARKER_RADIUS: i32 = 5;
const MARKER_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draw a filled marker at each centroid
pub fn mark_dots(image: &DynamicImage, dots: &[Centroid]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for dot in dots {
        let center = (dot.x.round() as i32, dot.y.round() as i32);
        draw_filled_circle_mut(&mut canvas, center, MARKER_RADIUS, MARKER_COLOR);
    }
    canvas
}

/// PNG-encode in memory and wrap as standard base64
pub fn encode_base64_png(image: &RgbImage) -> Result<String, BrailleError> {
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| BrailleError::Internal(format!("Failed to encode diagnostic image: {}", e)))?;
    Ok(general_purpose::STANDARD.encode(png.into_inner()))
}
