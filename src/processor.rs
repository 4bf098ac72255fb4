//! Training examples and the pluggable feature processor chain

use crate::Result;
use std::collections::HashMap;
use std::path::PathBuf;

/// A feature value attached to an example by a processor
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Scalar(f32),
    Vector(Vec<f32>),
    Text(String),
}

/// One training example, produced fresh on every indexed access.
///
/// `audio_filepath` is relative to the collection's audio root. `audio` holds
/// mono samples at the pipeline rate and `audio_len` its sample count at
/// creation time. Feature processors may mutate any of these and attach
/// additional named features.
#[derive(Debug, Clone)]
pub struct Example {
    pub audio_filepath: PathBuf,
    pub audio: Vec<f32>,
    pub audio_len: usize,
    pub features: HashMap<String, Feature>,
}

impl Example {
    pub fn new(audio_filepath: PathBuf, audio: Vec<f32>) -> Self {
        let audio_len = audio.len();
        Self {
            audio_filepath,
            audio,
            audio_len,
            features: HashMap::new(),
        }
    }

    /// Attach or overwrite a named feature
    pub fn set_feature(&mut self, name: impl Into<String>, value: Feature) {
        self.features.insert(name.into(), value);
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.get(name)
    }
}

/// A transform applied to each example after audio loading.
///
/// Processors run synchronously in configured order. Each is free to add,
/// overwrite, or remove fields; a failure aborts the whole item fetch with
/// no rollback of earlier processors' effects. Processors must not assume
/// fields beyond the audio trio unless an earlier processor in the chain
/// documents them.
pub trait FeatureProcessor: Send + Sync {
    fn process(&self, example: &mut Example) -> Result<()>;
}
