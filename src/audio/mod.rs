//! Audio subsystem: decoding, resampling, and segment extraction

pub mod decode;
pub mod resampler;
pub mod segment;

pub use decode::{decode_file, AudioReader};
pub use segment::{read_with_retry, segment_from_file, MAX_AUDIO_READ_ATTEMPTS};
