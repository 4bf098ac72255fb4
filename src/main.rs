//! vocoder-data - dataset inspection CLI
//!
//! Loads a TOML dataset description, assembles the dataset, and reports
//! sample counts and weights. Optionally decodes a single example or
//! collates a preview batch to sanity-check a configuration before
//! training.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocoder_data::config::DatasetConfig;
use vocoder_data::VocoderDataset;

/// Command-line arguments for vocoder-data
#[derive(Parser, Debug)]
#[command(name = "vocoder-data")]
#[command(about = "Inspect a vocoder training dataset configuration")]
#[command(version)]
struct Args {
    /// Path to the TOML dataset description
    #[arg(short, long, env = "VOCODER_DATA_CONFIG")]
    config: PathBuf,

    /// Decode and describe the example at this index
    #[arg(long)]
    example: Option<usize>,

    /// Collate the first N examples and report the batch shape
    #[arg(long)]
    batch: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vocoder_data=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = DatasetConfig::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;

    let dataset = VocoderDataset::new(
        &config.collections(),
        &config.dataset_config(),
        Vec::new(),
    )
    .context("Failed to assemble dataset")?;

    info!("Assembled {} samples", dataset.len());
    let total_weight: f64 = dataset.sample_weights().iter().sum();
    info!("Total sample weight: {:.1}", total_weight);

    match dataset.get_sampler(1).context("Failed to build sampler")? {
        Some(sampler) => info!(
            "Weighted sampling enabled: {} draws per epoch at batch size 1",
            sampler.num_samples()
        ),
        None => info!("Weighted sampling disabled"),
    }

    if let Some(index) = args.example {
        let example = dataset
            .get(index)
            .with_context(|| format!("Failed to fetch example {}", index))?;
        info!(
            "Example {}: {} ({} samples, {} features)",
            index,
            example.audio_filepath.display(),
            example.audio_len,
            example.features.len()
        );
    }

    if let Some(batch_size) = args.batch {
        let n = batch_size.min(dataset.len());
        let examples = (0..n)
            .map(|i| dataset.get(i))
            .collect::<vocoder_data::Result<Vec<_>>>()
            .context("Failed to fetch preview batch")?;
        let batch = dataset
            .collate_fn(&examples)
            .context("Failed to collate preview batch")?;
        info!(
            "Collated batch: {} x {} (lengths {:?})",
            batch.batch_size(),
            batch.max_len(),
            batch.audio_lens.to_vec()
        );
    }

    Ok(())
}
