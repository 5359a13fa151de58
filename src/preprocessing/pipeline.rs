use crate::config::DetectorConfig;
use crate::error::BrailleError;
use image::DynamicImage;
use serde::Serialize;
use std::time::Instant;

use super::steps;
use super::BinaryMask;

/// Timing information for a single preprocessing step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone)]
pub struct PreprocessingResult {
    /// Input after downscaling, still in colour; used for the diagnostic image
    pub image: DynamicImage,
    /// Foreground (dot) mask, same dimensions as `image`
    pub mask: BinaryMask,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Normalizes a raster into a binary dot mask:
/// resize, grayscale, denoise, adaptive threshold.
pub struct Preprocessor {
    max_dimension: u32,
    blur_sigma: f32,
    block_size: u32,
    threshold_offset: f32,
}

impl Preprocessor {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            max_dimension: config.max_dimension,
            blur_sigma: config.blur_sigma,
            block_size: config.block_size,
            threshold_offset: config.threshold_offset,
        }
    }

    pub fn process(&self, image: DynamicImage) -> Result<PreprocessingResult, BrailleError> {
        let start = Instant::now();
        let mut steps_timing = Vec::new();

        let resized = self.run_step("resize", &mut steps_timing, || {
            steps::resize::apply(image, self.max_dimension)
        })?;

        let gray = self.run_step("grayscale", &mut steps_timing, || {
            steps::grayscale::apply(resized.clone())
        })?;

        let blurred = self.run_step("denoise", &mut steps_timing, || {
            steps::denoise::apply(gray, self.blur_sigma)
        })?;

        let mask = self.run_step("threshold", &mut steps_timing, || {
            steps::threshold::apply(blurred, self.block_size, self.threshold_offset)
        })?;

        tracing::debug!(
            width = mask.width(),
            height = mask.height(),
            foreground = mask.foreground_count(),
            "Preprocessing complete"
        );

        Ok(PreprocessingResult {
            image: resized,
            mask,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: steps_timing,
        })
    }

    fn run_step<T, F>(
        &self,
        name: &str,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<T, BrailleError>
    where
        F: FnOnce() -> Result<T, BrailleError>,
    {
        let step_start = Instant::now();
        let result = step_fn()?;
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        Ok(result)
    }
}
