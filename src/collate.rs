//! Batch collation: variable-length examples into padded rectangular tensors

use crate::processor::Example;
use crate::{Error, Result};
use ndarray::{s, Array1, Array2, ArrayView1};
use std::path::PathBuf;

/// One collated mini-batch.
///
/// `audio` is batch-size x max-length, zero-padded on the right;
/// `audio_lens[i]` is example `i`'s true pre-padding sample count, so
/// `audio_lens[i] <= audio.ncols()` always holds and the max length equals
/// `audio.ncols()`.
#[derive(Debug)]
pub struct Batch {
    pub audio_filepaths: Vec<PathBuf>,
    pub audio: Array2<f32>,
    pub audio_lens: Array1<i64>,
}

impl Batch {
    pub fn batch_size(&self) -> usize {
        self.audio.nrows()
    }

    pub fn max_len(&self) -> usize {
        self.audio.ncols()
    }
}

/// Right-pad each waveform with zeros to `max_len` and stack into rows.
///
/// Waveforms longer than `max_len` are truncated.
pub fn stack_tensors(tensors: &[&[f32]], max_len: usize) -> Array2<f32> {
    let mut stacked = Array2::zeros((tensors.len(), max_len));
    for (row, tensor) in tensors.iter().enumerate() {
        let len = tensor.len().min(max_len);
        stacked
            .slice_mut(s![row, ..len])
            .assign(&ArrayView1::from(&tensor[..len]));
    }
    stacked
}

/// Merge a list of examples into one padded batch.
///
/// Lengths are recomputed from each example's audio buffer rather than taken
/// from its stored `audio_len`, so processors that resize audio without
/// updating the length field cannot corrupt the batch shape.
pub fn collate_batch(batch: &[Example]) -> Result<Batch> {
    if batch.is_empty() {
        return Err(Error::Collation("cannot collate an empty batch".to_string()));
    }

    let mut audio_filepaths = Vec::with_capacity(batch.len());
    let mut audio_list: Vec<&[f32]> = Vec::with_capacity(batch.len());
    let mut audio_lens = Vec::with_capacity(batch.len());

    for example in batch {
        audio_filepaths.push(example.audio_filepath.clone());
        audio_list.push(example.audio.as_slice());
        audio_lens.push(example.audio.len() as i64);
    }

    let max_len = audio_lens.iter().copied().max().unwrap_or(0) as usize;
    let audio = stack_tensors(&audio_list, max_len);

    Ok(Batch {
        audio_filepaths,
        audio,
        audio_lens: Array1::from(audio_lens),
    })
}
