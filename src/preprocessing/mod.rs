//! Image preprocessing for Braille dot detection
//!
//! Turns an arbitrary raster into a binary mask where raised dots are foreground.

pub mod mask;
pub mod pipeline;
pub mod steps;

pub use mask::BinaryMask;
pub use pipeline::{Preprocessor, StepTiming};
