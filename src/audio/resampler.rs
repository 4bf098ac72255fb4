//! Mono resampling using rubato
//!
//! Converts decoded audio from its native sample rate to the pipeline's
//! configured rate. All audio in this crate is mono by the time it reaches
//! the resampler, so the planar/interleaved dance reduces to one channel.

use crate::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

/// Resample a mono waveform from `input_rate` to `output_rate`.
///
/// If the rates already match, returns a copy without resampling. The whole
/// input is processed as a single chunk, so output length is approximately
/// `input.len() * output_rate / input_rate` (exact length depends on the
/// resampler internals; callers needing an exact sample count must trim or
/// pad afterwards).
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        debug!("Sample rate already at {}Hz, skipping resample", output_rate);
        return Ok(input.to_vec());
    }

    if input.is_empty() {
        return Ok(Vec::new());
    }

    debug!("Resampling from {}Hz to {}Hz", input_rate, output_rate);

    let mut resampler = FastFixedIn::<f32>::new(
        output_rate as f64 / input_rate as f64,
        1.0, // fixed ratio, no runtime changes
        PolynomialDegree::Septic,
        input.len(),
        1,
    )
    .map_err(|e| Error::Decode(format!("Failed to create resampler: {}", e)))?;

    let mut output = resampler
        .process(&[input], None)
        .map_err(|e| Error::Decode(format!("Resampling failed: {}", e)))?;

    debug!(
        "Resampled {} input frames to {} output frames",
        input.len(),
        output[0].len()
    );

    Ok(output.remove(0))
}
