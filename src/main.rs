use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use spatial_filtering::filters::core::{MAX_MASK_SIZE, MIN_MASK_SIZE};
use spatial_filtering::{
    decode_image, BorderPolicy, Channel, FilterKind, NoiseKind, PipelineConfig, PipelineContext,
};

#[derive(Parser)]
#[command(name = "spatial-filtering")]
#[command(version, about = "Add impulse noise, isolate a channel and denoise an image", long_about = None)]
struct Cli {
    /// Input image (PNG, JPEG or BMP)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for noise-image-01.png, channel-image-01.png, filter-image-01.png
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// JSON pipeline configuration; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Noise kind: "unipolar" or "bipolar"
    #[arg(long, value_name = "KIND")]
    noise: Option<NoiseKind>,

    /// Channel to keep: r, g or b
    #[arg(long, value_name = "CHANNEL")]
    channel: Option<Channel>,

    /// Filter: "median" or "harmonic-mean"
    #[arg(long, value_name = "FILTER")]
    filter: Option<FilterKind>,

    /// Mask size (odd, 3-11)
    #[arg(short, long, value_name = "N", value_parser = parse_mask_size)]
    mask: Option<usize>,

    /// Border policy: "clamp" or "crop"
    #[arg(long, value_name = "POLICY")]
    border: Option<BorderPolicy>,

    /// Seed for reproducible noise
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_mask_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{e}"))?;
    if !(MIN_MASK_SIZE..=MAX_MASK_SIZE).contains(&size) || size % 2 == 0 {
        return Err(format!(
            "mask size must be odd and within {MIN_MASK_SIZE}-{MAX_MASK_SIZE}"
        ));
    }
    Ok(size)
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(noise) = self.noise {
            config.noise = noise;
        }
        if let Some(channel) = self.channel {
            config.channel = channel;
        }
        if let Some(filter) = self.filter {
            config.filter = filter;
        }
        if let Some(mask) = self.mask {
            config.mask_size = mask;
        }
        if let Some(border) = self.border {
            config.border = border;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli.pipeline_config()?;
    tracing::debug!(?config, "pipeline configuration");

    let original = decode_image(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    tracing::info!(
        width = original.width(),
        height = original.height(),
        "loaded {}",
        cli.input.display()
    );

    let mut ctx = PipelineContext::new();
    ctx.load(original);
    ctx.run(&config).context("Pipeline failed")?;

    let written = ctx
        .save_all(&cli.out)
        .with_context(|| format!("Failed to save outputs to {}", cli.out.display()))?;
    for path in written {
        println!("{}", path.display());
    }

    Ok(())
}
