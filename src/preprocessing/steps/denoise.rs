use crate::error::BrailleError;
use image::DynamicImage;
use imageproc::filter::gaussian_blur_f32;

/// Apply a Gaussian blur to suppress sensor noise.
/// A sigma of 1.1 matches a 5x5 kernel.
pub fn apply(image: DynamicImage, sigma: f32) -> Result<DynamicImage, BrailleError> {
    let gray = image.to_luma8();
    // gaussian_blur_f32 panics on non-positive sigma
    if sigma.is_nan() || sigma <= 0.0 {
        return Ok(DynamicImage::ImageLuma8(gray));
    }
    Ok(DynamicImage::ImageLuma8(gaussian_blur_f32(&gray, sigma)))
}
