use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod detection;
mod error;
mod preprocessing;
mod server;
mod translator;
mod translators;

#[derive(Parser, Debug)]
#[command(name = "braille-vision-server")]
#[command(about = "Braille dot detection and decoding server")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "BRAILLE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "BRAILLE_PORT", default_value = "9393")]
    pub port: u16,

    /// Default translation language ("english" or "hindi")
    #[arg(long, env = "BRAILLE_DEFAULT_LANGUAGE", default_value = "english")]
    pub default_language: String,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "BRAILLE_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// Longer image side is downscaled to this many pixels
    #[arg(long, env = "BRAILLE_MAX_DIMENSION", default_value = "1200")]
    pub max_dimension: u32,

    /// Gaussian blur sigma used to suppress sensor noise
    #[arg(long, env = "BRAILLE_BLUR_SIGMA", default_value = "1.1")]
    pub blur_sigma: f32,

    /// Adaptive threshold window size in pixels
    #[arg(long, env = "BRAILLE_BLOCK_SIZE", default_value = "11")]
    pub block_size: u32,

    /// Constant subtracted from the local mean when thresholding
    #[arg(long, env = "BRAILLE_THRESHOLD_OFFSET", default_value = "2")]
    pub threshold_offset: f32,

    /// Minimum blob area (pixels) accepted as a dot
    #[arg(long, env = "BRAILLE_MIN_DOT_AREA", default_value = "5")]
    pub min_dot_area: f32,

    /// Maximum blob area (pixels) accepted as a dot
    #[arg(long, env = "BRAILLE_MAX_DOT_AREA", default_value = "500")]
    pub max_dot_area: f32,

    /// Minimum circularity (1.0 is a perfect circle)
    #[arg(long, env = "BRAILLE_CIRCULARITY", default_value = "0.7")]
    pub circularity: f32,

    /// Maximum number of dot candidates kept per image
    #[arg(long, env = "BRAILLE_MAX_DOTS", default_value = "4000")]
    pub max_dots: usize,

    /// Cell boundary gap, as a multiple of the estimated dot spacing
    #[arg(long, env = "BRAILLE_CELL_GAP_FACTOR", default_value = "2.0")]
    pub cell_gap_factor: f32,

    /// Per-image processing timeout in seconds
    #[arg(long, env = "BRAILLE_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!(
        "Starting braille-vision-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
