//! Braille dot detection and decoding
//!
//! Stages run strictly in order, each consuming the previous stage's output:
//! preprocessing, blob detection, spatial clustering, cell decoding and
//! symbol mapping. Any stage failure aborts the whole invocation.

pub mod annotate;
pub mod blobs;
pub mod cell;
pub mod cluster;
pub mod symbols;

use crate::config::DetectorConfig;
use crate::error::BrailleError;
use crate::preprocessing::{Preprocessor, StepTiming};
use image::{DynamicImage, RgbImage};
use std::time::Instant;

pub use blobs::Centroid;
pub use cell::DotPattern;

/// Rows of decoded cells and the spacing they were decoded with
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLayout {
    pub rows: Vec<Vec<DotPattern>>,
    pub spacing: f32,
}

impl DecodedLayout {
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Unicode Braille stream with one separator between rows
    pub fn braille(&self) -> String {
        symbols::render(&self.rows)
    }
}

/// Everything one successful invocation produces
#[derive(Debug, Clone)]
pub struct BrailleDetection {
    pub braille: String,
    pub layout: DecodedLayout,
    pub dots: Vec<Centroid>,
    /// Downscaled input with detected dots marked
    pub diagnostic: RgbImage,
    pub preprocessing: Vec<StepTiming>,
    pub processing_time_ms: u64,
}

/// Stateless detector; one instance can serve concurrent invocations
pub struct BrailleDetector {
    config: DetectorConfig,
    preprocessor: Preprocessor,
}

impl BrailleDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let preprocessor = Preprocessor::new(&config);
        Self {
            config,
            preprocessor,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Decode an encoded image (PNG, JPEG, ...) held in memory
    pub fn detect_bytes(&self, data: &[u8]) -> Result<BrailleDetection, BrailleError> {
        let image = image::load_from_memory(data)
            .map_err(|e| BrailleError::UnreadableImage(e.to_string()))?;
        self.detect(image)
    }

    pub fn detect(&self, image: DynamicImage) -> Result<BrailleDetection, BrailleError> {
        let start = Instant::now();
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Starting Braille detection"
        );

        let preprocessed = self.preprocessor.process(image)?;
        tracing::debug!(
            time_ms = preprocessed.total_time_ms,
            "Preprocessed in {} steps",
            preprocessed.steps.len()
        );
        let dots = blobs::detect(&preprocessed.mask, &(&self.config).into())?;
        let layout = self.decode_centroids(&dots)?;
        let diagnostic = annotate::mark_dots(&preprocessed.image, &dots);

        Ok(BrailleDetection {
            braille: layout.braille(),
            layout,
            dots,
            diagnostic,
            preprocessing: preprocessed.steps,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Cluster centroids into rows and cells and decode every cell
    pub fn decode_centroids(&self, dots: &[Centroid]) -> Result<DecodedLayout, BrailleError> {
        let spacing = cluster::estimate_spacing(dots)?;
        let rows = cluster::group_rows(dots, spacing);

        let mut decoded = Vec::with_capacity(rows.len());
        for row in &rows {
            let cells = cluster::group_cells(row, spacing, self.config.cell_gap_factor)?;
            decoded.push(
                cells
                    .iter()
                    .map(|cell| cell::decode(cell, spacing))
                    .collect::<Vec<_>>(),
            );
        }

        let layout = DecodedLayout {
            rows: decoded,
            spacing,
        };
        tracing::debug!(
            rows = layout.rows.len(),
            cells = layout.cell_count(),
            spacing,
            "Decoded Braille layout"
        );
        Ok(layout)
    }
}
