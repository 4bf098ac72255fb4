//! TOML dataset description for the inspection CLI
//!
//! Example:
//!
//! ```toml
//! [dataset]
//! sample_rate = 22050
//! n_segments = 8192
//! min_duration = 0.5
//! max_duration = 20.0
//! weighted_sample_steps = 1000
//!
//! [[collection]]
//! name = "train_clean"
//! manifest = "/data/train_clean/manifest.json"
//! audio_dir = "/data/train_clean/audio"
//! weight = 2.0
//! ```

use crate::dataset::{DatasetMeta, VocoderDatasetConfig};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DatasetConfig {
    pub dataset: DatasetSection,
    #[serde(default)]
    pub collection: Vec<CollectionSection>,
}

#[derive(Debug, Deserialize)]
pub struct DatasetSection {
    pub sample_rate: u32,
    pub n_segments: Option<usize>,
    pub weighted_sample_steps: Option<usize>,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionSection {
    pub name: String,
    pub manifest: PathBuf,
    pub audio_dir: PathBuf,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl DatasetConfig {
    /// Load and parse a TOML dataset description
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config: DatasetConfig = toml::from_str(&text).map_err(|e| {
            Error::Config(format!("cannot parse config {}: {}", path.display(), e))
        })?;
        if config.collection.is_empty() {
            return Err(Error::Config(format!(
                "config {} declares no collections",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Collection descriptors in declaration order
    pub fn collections(&self) -> Vec<DatasetMeta> {
        self.collection
            .iter()
            .map(|c| {
                DatasetMeta::new(&c.name, &c.manifest, &c.audio_dir).with_weight(c.weight)
            })
            .collect()
    }

    /// Scalar dataset configuration
    pub fn dataset_config(&self) -> VocoderDatasetConfig {
        VocoderDatasetConfig {
            sample_rate: self.dataset.sample_rate,
            n_segments: self.dataset.n_segments,
            weighted_sample_steps: self.dataset.weighted_sample_steps,
            min_duration: self.dataset.min_duration,
            max_duration: self.dataset.max_duration,
        }
    }
}
