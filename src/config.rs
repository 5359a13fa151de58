use crate::Args;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub default_language: String,
    pub max_file_size: usize,
    pub timeout_secs: u64,
    pub detector: DetectorConfig,
}

/// Read-only detection constants shared by every pipeline invocation
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Longer image side is capped at this many pixels
    pub max_dimension: u32,
    /// Gaussian sigma for the denoise step
    pub blur_sigma: f32,
    /// Adaptive threshold window size (odd)
    pub block_size: u32,
    /// Constant subtracted from the local mean before comparing
    pub threshold_offset: f32,
    pub min_dot_area: f32,
    pub max_dot_area: f32,
    /// Minimum `4π·area/perimeter²` for a blob to count as a dot
    pub circularity: f32,
    /// Cap on accepted dot candidates, keeps pairwise spacing estimation tractable
    pub max_dots: usize,
    /// A new cell starts when the x-gap exceeds this multiple of the dot spacing
    pub cell_gap_factor: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1200,
            blur_sigma: 1.1,
            block_size: 11,
            threshold_offset: 2.0,
            min_dot_area: 5.0,
            max_dot_area: 500.0,
            circularity: 0.7,
            max_dots: 4000,
            cell_gap_factor: 2.0,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            default_language: args.default_language,
            max_file_size: args.max_file_size,
            timeout_secs: args.timeout_secs,
            detector: DetectorConfig {
                max_dimension: args.max_dimension,
                blur_sigma: args.blur_sigma,
                // adaptive windows must be odd so the pixel sits at the centre
                block_size: args.block_size | 1,
                threshold_offset: args.threshold_offset,
                min_dot_area: args.min_dot_area,
                max_dot_area: args.max_dot_area,
                circularity: args.circularity,
                max_dots: args.max_dots,
                cell_gap_factor: args.cell_gap_factor,
            },
        }
    }
}
