//! Fixed-length segment extraction with bounded I/O retry
//!
//! Seeking into large compressed files occasionally produces spurious I/O
//! errors, so segment reads are wrapped in a bounded retry loop. Whole-file
//! decodes (see [`crate::audio::decode::decode_file`]) are not retried.

use crate::audio::decode::AudioReader;
use crate::audio::resampler::resample_mono;
use crate::{Error, Result};
use rand::Rng;
use std::path::Path;
use tracing::warn;

/// Maximum attempts for one segment read before giving up
pub const MAX_AUDIO_READ_ATTEMPTS: usize = 3;

/// Extract exactly `n_segments` samples at `sample_rate` from an audio file.
///
/// The segment start is chosen uniformly at random over the valid offsets.
/// Files shorter than the requested segment are decoded in full and
/// zero-padded on the right to the requested length.
pub fn segment_from_file(path: &Path, sample_rate: u32, n_segments: usize) -> Result<Vec<f32>> {
    let mut reader = AudioReader::open(path)?;
    let native_rate = reader.native_rate();

    // Segment length in native frames, before resampling to the target rate.
    let needed = if native_rate == sample_rate {
        n_segments as u64
    } else {
        (n_segments as f64 * native_rate as f64 / sample_rate as f64).ceil() as u64
    };

    if let Some(total) = reader.n_frames() {
        if total > needed {
            let start = rand::thread_rng().gen_range(0..=(total - needed));
            if start > 0 {
                reader.seek_to_frame(start)?;
            }
        }
    }

    let audio = reader.decode_mono(Some(needed))?;
    let audio = resample_mono(&audio, native_rate, sample_rate)?;
    Ok(fit_length(audio, n_segments))
}

/// Trim or zero-pad a waveform to an exact sample count
fn fit_length(mut audio: Vec<f32>, len: usize) -> Vec<f32> {
    audio.resize(len, 0.0);
    audio
}

/// Run a fallible audio read up to `max_attempts` times.
///
/// Each failed attempt is logged and the next proceeds with the same
/// arguments. Exhausting all attempts yields [`Error::AudioRead`] carrying
/// the file path.
pub fn read_with_retry<T, F>(path: &Path, max_attempts: usize, mut read: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    for attempt in 1..=max_attempts {
        match read() {
            Ok(value) => return Ok(value),
            Err(e) => warn!(
                "Audio read attempt {}/{} failed for {}: {}",
                attempt,
                max_attempts,
                path.display(),
                e
            ),
        }
    }

    Err(Error::AudioRead {
        path: path.to_path_buf(),
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_fit_length_pads_with_zeros() {
        let audio = fit_length(vec![1.0, 2.0], 5);
        assert_eq!(audio, vec![1.0, 2.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fit_length_truncates() {
        let audio = fit_length(vec![1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(audio, vec![1.0, 2.0]);
    }

    #[test]
    fn test_retry_succeeds_after_two_failures() {
        let mut calls = 0;
        let result = read_with_retry(Path::new("x.wav"), MAX_AUDIO_READ_ATTEMPTS, || {
            calls += 1;
            if calls <= 2 {
                Err(Error::Decode("transient seek failure".to_string()))
            } else {
                Ok(vec![0.5f32])
            }
        });

        assert_eq!(result.unwrap(), vec![0.5]);
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_retry_exhausted() {
        let mut calls = 0;
        let result: Result<Vec<f32>> =
            read_with_retry(Path::new("x.wav"), MAX_AUDIO_READ_ATTEMPTS, || {
                calls += 1;
                Err(Error::Decode("persistent failure".to_string()))
            });

        assert_eq!(calls, MAX_AUDIO_READ_ATTEMPTS);
        match result {
            Err(Error::AudioRead { path, attempts }) => {
                assert_eq!(path, PathBuf::from("x.wav"));
                assert_eq!(attempts, MAX_AUDIO_READ_ATTEMPTS);
            }
            other => panic!("expected AudioRead error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_retry_first_attempt_success() {
        let mut calls = 0;
        let result = read_with_retry(Path::new("x.wav"), MAX_AUDIO_READ_ATTEMPTS, || {
            calls += 1;
            Ok(42u32)
        });

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }
}
