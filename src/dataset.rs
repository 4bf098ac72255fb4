//! Vocoder training dataset
//!
//! Assembles one flat sample index from any number of named audio
//! collections, then serves per-example waveforms (full files or fixed-length
//! segments) through an ordered feature processor chain. Construction runs
//! the whole manifest/filter pass up front; after that the dataset is
//! read-only and safe to share across loader workers.

use crate::audio::{decode_file, read_with_retry, segment_from_file, MAX_AUDIO_READ_ATTEMPTS};
use crate::collate::{collate_batch, Batch};
use crate::manifest::{abs_rel_paths, filter_by_duration, read_manifest, ManifestEntry};
use crate::processor::{Example, FeatureProcessor};
use crate::sampler::WeightedSampler;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// One named audio collection: a manifest, the audio root its paths are
/// relative to, and a sampling weight used only when weighted sampling is
/// enabled.
#[derive(Debug, Clone)]
pub struct DatasetMeta {
    pub name: String,
    pub manifest_path: PathBuf,
    pub audio_dir: PathBuf,
    pub sample_weight: f64,
}

impl DatasetMeta {
    pub fn new(
        name: impl Into<String>,
        manifest_path: impl Into<PathBuf>,
        audio_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            manifest_path: manifest_path.into(),
            audio_dir: audio_dir.into(),
            sample_weight: 1.0,
        }
    }

    pub fn with_weight(mut self, sample_weight: f64) -> Self {
        self.sample_weight = sample_weight;
        self
    }
}

/// One indexable sample: a filtered manifest entry plus its audio root
#[derive(Debug, Clone)]
struct DatasetSample {
    entry: ManifestEntry,
    audio_dir: PathBuf,
}

/// Scalar dataset configuration
#[derive(Debug, Clone)]
pub struct VocoderDatasetConfig {
    /// Sample rate every waveform is resampled to
    pub sample_rate: u32,
    /// Fixed segment length in samples; None decodes whole files
    pub n_segments: Option<usize>,
    /// Number of weighted-sampling steps; None disables weighted sampling
    pub weighted_sample_steps: Option<usize>,
    /// Inclusive duration bounds in seconds; None is unbounded
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
}

impl VocoderDatasetConfig {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            n_segments: None,
            weighted_sample_steps: None,
            min_duration: None,
            max_duration: None,
        }
    }
}

/// Dataset over raw audio for vocoder training.
///
/// Indexed access decodes audio and runs the feature processor chain on a
/// fresh example every call; nothing is cached. All mutable work happens in
/// [`VocoderDataset::new`], so `&self` methods are safe for concurrent use
/// by a multi-worker loader.
pub struct VocoderDataset {
    sample_rate: u32,
    n_segments: Option<usize>,
    weighted_sample_steps: Option<usize>,
    feature_processors: Vec<Box<dyn FeatureProcessor>>,
    samples: Vec<DatasetSample>,
    sample_weights: Vec<f64>,
}

impl VocoderDataset {
    /// Assemble the dataset from named collections, in configuration order.
    ///
    /// Fails fatally on an unreadable manifest or an entry without a usable
    /// duration. Within a collection, samples keep filtered manifest order.
    pub fn new(
        collections: &[DatasetMeta],
        config: &VocoderDatasetConfig,
        feature_processors: Vec<Box<dyn FeatureProcessor>>,
    ) -> Result<Self> {
        if !feature_processors.is_empty() {
            info!("Using {} feature processors", feature_processors.len());
        }

        let mut samples = Vec::new();
        let mut sample_weights = Vec::new();
        for meta in collections {
            let (collection_samples, weights) =
                Self::process_collection(meta, config.min_duration, config.max_duration)?;
            samples.extend(collection_samples);
            sample_weights.extend(weights);
        }

        Ok(Self {
            sample_rate: config.sample_rate,
            n_segments: config.n_segments,
            weighted_sample_steps: config.weighted_sample_steps,
            feature_processors,
            samples,
            sample_weights,
        })
    }

    /// Load, filter, and weight one collection
    fn process_collection(
        meta: &DatasetMeta,
        min_duration: Option<f64>,
        max_duration: Option<f64>,
    ) -> Result<(Vec<DatasetSample>, Vec<f64>)> {
        let entries = read_manifest(&meta.manifest_path)?;
        let original_count = entries.len();

        let (filtered, total_hours, filtered_hours) =
            filter_by_duration(entries, min_duration, max_duration)?;

        info!("{}", meta.name);
        info!("Original # of files: {}", original_count);
        info!("Filtered # of files: {}", filtered.len());
        info!("Original duration: {:.2} hours", total_hours);
        info!("Filtered duration: {:.2} hours", filtered_hours);

        let weights = vec![meta.sample_weight; filtered.len()];
        let samples = filtered
            .into_iter()
            .map(|entry| DatasetSample {
                entry,
                audio_dir: meta.audio_dir.clone(),
            })
            .collect();

        Ok((samples, weights))
    }

    /// Number of samples across all collections
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Per-sample weights, index-aligned with the dataset
    pub fn sample_weights(&self) -> &[f64] {
        &self.sample_weights
    }

    /// Build the weighted sampler, or None when weighted sampling is not
    /// configured (the training loop then uses its default iteration).
    pub fn get_sampler(&self, batch_size: usize) -> Result<Option<WeightedSampler>> {
        match self.weighted_sample_steps {
            None => Ok(None),
            Some(num_steps) => {
                WeightedSampler::new(&self.sample_weights, batch_size, num_steps).map(Some)
            }
        }
    }

    /// Fetch one example: decode audio, then run the processor chain.
    pub fn get(&self, index: usize) -> Result<Example> {
        let data = self
            .samples
            .get(index)
            .ok_or_else(|| Error::NotFound(format!("sample index {}", index)))?;

        let audio_filepath = data.entry.audio_filepath()?;
        let (audio_filepath_abs, audio_filepath_rel) =
            abs_rel_paths(&audio_filepath, &data.audio_dir)?;

        let audio = self.sample_audio(&audio_filepath_abs)?;
        let mut example = Example::new(audio_filepath_rel, audio);

        for processor in &self.feature_processors {
            processor.process(&mut example)?;
        }

        Ok(example)
    }

    /// Merge examples into a padded batch
    pub fn collate_fn(&self, batch: &[Example]) -> Result<Batch> {
        collate_batch(batch)
    }

    /// Full decode when no segment length is configured; otherwise a
    /// fixed-length segment read under the bounded retry loop.
    fn sample_audio(&self, audio_filepath: &Path) -> Result<Vec<f32>> {
        match self.n_segments {
            None => decode_file(audio_filepath, self.sample_rate),
            Some(n_segments) => read_with_retry(audio_filepath, MAX_AUDIO_READ_ATTEMPTS, || {
                segment_from_file(audio_filepath, self.sample_rate, n_segments)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_manifest(dir: &Path, name: &str, durations: &[f64]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for (i, d) in durations.iter().enumerate() {
            writeln!(
                file,
                r#"{{"audio_filepath": "utt_{}.wav", "duration": {}}}"#,
                i, d
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn test_assembly_counts_and_weights() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_a = write_manifest(dir.path(), "a.json", &[1.0, 2.0, 3.0]);
        let manifest_b = write_manifest(dir.path(), "b.json", &[1.0, 1.5, 2.0, 2.5, 3.0]);

        let collections = vec![
            DatasetMeta::new("collection_a", &manifest_a, dir.path()).with_weight(2.0),
            DatasetMeta::new("collection_b", &manifest_b, dir.path()),
        ];
        let config = VocoderDatasetConfig::new(22050);
        let dataset = VocoderDataset::new(&collections, &config, Vec::new()).unwrap();

        assert_eq!(dataset.len(), 8);
        assert_eq!(
            dataset.sample_weights(),
            &[2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_assembly_applies_duration_filter() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path(), "a.json", &[0.2, 1.0, 5.0, 50.0]);

        let collections = vec![DatasetMeta::new("a", &manifest, dir.path())];
        let mut config = VocoderDatasetConfig::new(22050);
        config.min_duration = Some(0.5);
        config.max_duration = Some(10.0);

        let dataset = VocoderDataset::new(&collections, &config, Vec::new()).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let collections = vec![DatasetMeta::new(
            "broken",
            "/nonexistent/manifest.json",
            "/nonexistent",
        )];
        let config = VocoderDatasetConfig::new(22050);

        let result = VocoderDataset::new(&collections, &config, Vec::new());
        assert!(matches!(result, Err(Error::Manifest { .. })));
    }

    #[test]
    fn test_get_sampler_optionality() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path(), "a.json", &[1.0, 2.0]);
        let collections = vec![DatasetMeta::new("a", &manifest, dir.path())];

        let config = VocoderDatasetConfig::new(22050);
        let dataset = VocoderDataset::new(&collections, &config, Vec::new()).unwrap();
        assert!(dataset.get_sampler(16).unwrap().is_none());

        let mut config = VocoderDatasetConfig::new(22050);
        config.weighted_sample_steps = Some(100);
        let dataset = VocoderDataset::new(&collections, &config, Vec::new()).unwrap();
        let sampler = dataset.get_sampler(16).unwrap().unwrap();
        assert_eq!(sampler.num_samples(), 1600);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_manifest(dir.path(), "a.json", &[1.0]);
        let collections = vec![DatasetMeta::new("a", &manifest, dir.path())];
        let config = VocoderDatasetConfig::new(22050);
        let dataset = VocoderDataset::new(&collections, &config, Vec::new()).unwrap();

        assert!(matches!(dataset.get(5), Err(Error::NotFound(_))));
    }
}
