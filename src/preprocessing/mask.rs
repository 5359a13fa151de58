use image::{GrayImage, Luma};

/// Pixel value used for foreground (ink / dot) pixels
pub const FOREGROUND: u8 = 255;

/// Foreground/background mask produced by binarization.
///
/// Backed by a `GrayImage` holding only 0 and 255 so it can be fed straight
/// into `imageproc` contour tracing.
#[derive(Debug, Clone)]
pub struct BinaryMask {
    image: GrayImage,
}

impl BinaryMask {
    pub fn from_fn<F>(width: u32, height: u32, mut is_foreground: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let image = GrayImage::from_fn(width, height, |x, y| {
            if is_foreground(x, y) {
                Luma([FOREGROUND])
            } else {
                Luma([0])
            }
        });
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[cfg(test)]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y).0[0] == FOREGROUND
    }

    pub fn foreground_count(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] == FOREGROUND).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }
}
