//! Weighted index sampling for multi-collection training
//!
//! Draws dataset indices with replacement, probability proportional to each
//! sample's collection weight. Built only when weighted sampling is
//! configured; otherwise the training loop falls back to its default
//! (typically uniform shuffled) iteration.

use crate::{Error, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Weighted with-replacement index sampler.
///
/// Produces `batch_size * num_steps` indices per epoch, batch-size at a time
/// from the training loop's point of view.
pub struct WeightedSampler {
    dist: WeightedIndex<f64>,
    num_samples: usize,
}

impl WeightedSampler {
    /// Build a sampler over `sample_weights`, index-aligned with the dataset.
    pub fn new(sample_weights: &[f64], batch_size: usize, num_steps: usize) -> Result<Self> {
        let dist = WeightedIndex::new(sample_weights.iter().copied())
            .map_err(|e| Error::Config(format!("invalid sample weights: {}", e)))?;
        Ok(Self {
            dist,
            num_samples: batch_size * num_steps,
        })
    }

    /// Total number of indices one pass produces
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Draw a full pass of indices using the thread-local RNG
    pub fn indices(&self) -> Vec<usize> {
        self.indices_with_rng(&mut rand::thread_rng())
    }

    /// Draw a full pass of indices from a caller-supplied RNG
    pub fn indices_with_rng<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        (0..self.num_samples).map(|_| self.dist.sample(rng)).collect()
    }
}
