use crate::error::BrailleError;
use image::DynamicImage;

/// Convert image to single-channel intensity
pub fn apply(image: DynamicImage) -> Result<DynamicImage, BrailleError> {
    Ok(DynamicImage::ImageLuma8(image.to_luma8()))
}
