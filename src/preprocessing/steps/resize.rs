use crate::error::BrailleError;
use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Downscale so the longer side is at most `max_dimension` pixels.
/// Aspect ratio is preserved; images already within bounds are returned untouched.
pub fn apply(image: DynamicImage, max_dimension: u32) -> Result<DynamicImage, BrailleError> {
    let (width, height) = image.dimensions();

    if width == 0 || height == 0 {
        return Err(BrailleError::UnreadableImage(format!(
            "image has no pixels ({}x{})",
            width, height
        )));
    }

    if max_dimension == 0 || width.max(height) <= max_dimension {
        return Ok(image);
    }

    // `resize` fits the image inside the box while keeping its aspect ratio
    Ok(image.resize(max_dimension, max_dimension, FilterType::Triangle))
}
