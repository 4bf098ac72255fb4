//! # Vocoder Dataset Pipeline (vocoder-data)
//!
//! Prepares raw audio recordings for waveform-generation (vocoder) model
//! training. Named collections of recordings are described by JSON-lines
//! manifests; the pipeline filters them by duration, extracts full or
//! fixed-length waveform segments with bounded I/O retry, runs a pluggable
//! feature processor chain per example, and collates variable-length
//! examples into zero-padded rectangular batches.
//!
//! **Architecture:** symphonia decode -> rubato resample -> processor chain,
//! with an optional weight-proportional index sampler for multi-collection
//! training.

pub mod audio;
pub mod collate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod manifest;
pub mod processor;
pub mod sampler;

pub use collate::{collate_batch, stack_tensors, Batch};
pub use dataset::{DatasetMeta, VocoderDataset, VocoderDatasetConfig};
pub use error::{Error, Result};
pub use processor::{Example, Feature, FeatureProcessor};
pub use sampler::WeightedSampler;
