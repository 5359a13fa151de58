use crate::error::BrailleError;
use crate::preprocessing::BinaryMask;
use image::{DynamicImage, GrayImage};

/// Adaptive mean-minus-C binarization.
///
/// A pixel is foreground when it is no brighter than the mean of its
/// `block_size` window minus `offset`. Dark ink therefore becomes foreground,
/// and because the threshold follows the local mean, dots in shadowed parts of
/// a photographed page survive.
pub fn apply(image: DynamicImage, block_size: u32, offset: f32) -> Result<BinaryMask, BrailleError> {
    let gray = image.to_luma8();
    Ok(adaptive_threshold(&gray, block_size.max(3), offset))
}

fn adaptive_threshold(img: &GrayImage, block_size: u32, offset: f32) -> BinaryMask {
    let (width, height) = img.dimensions();
    let half_window = (block_size / 2) as i64;
    let integral = IntegralImage::new(img);

    BinaryMask::from_fn(width, height, |x, y| {
        let x1 = (x as i64 - half_window).max(0) as u32;
        let y1 = (y as i64 - half_window).max(0) as u32;
        let x2 = (x as i64 + half_window).min(width as i64 - 1) as u32;
        let y2 = (y as i64 + half_window).min(height as i64 - 1) as u32;

        let threshold = integral.mean(x1, y1, x2, y2) - offset;
        img.get_pixel(x, y).0[0] as f32 <= threshold
    })
}

/// Summed-area table with a zero row and column in front
struct IntegralImage {
    stride: usize,
    sums: Vec<u64>,
}

impl IntegralImage {
    fn new(img: &GrayImage) -> Self {
        let (width, height) = img.dimensions();
        let stride = width as usize + 1;
        let mut sums = vec![0u64; stride * (height as usize + 1)];

        for y in 0..height as usize {
            let mut row_sum = 0u64;
            for x in 0..width as usize {
                row_sum += img.get_pixel(x as u32, y as u32).0[0] as u64;
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
            }
        }

        Self { stride, sums }
    }

    /// Mean over the inclusive window `[x1, x2] x [y1, y2]`
    fn mean(&self, x1: u32, y1: u32, x2: u32, y2: u32) -> f32 {
        let (x1, y1, x2, y2) = (x1 as usize, y1 as usize, x2 as usize + 1, y2 as usize + 1);
        let at = |x: usize, y: usize| self.sums[y * self.stride + x];
        let sum = at(x2, y2) + at(x1, y1) - at(x1, y2) - at(x2, y1);
        let area = ((x2 - x1) * (y2 - y1)) as f64;
        (sum as f64 / area) as f32
    }
}
