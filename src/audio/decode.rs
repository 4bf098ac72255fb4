//! Audio decoding using symphonia
//!
//! Decodes audio files (WAV, FLAC, MP3, Vorbis per Cargo.toml symphonia
//! features) to mono f32 samples at a caller-specified sample rate.
//! Multi-channel files are downmixed by averaging channels per frame.

use crate::audio::resampler::resample_mono;
use crate::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::Time;

/// Streaming audio reader over one file
///
/// Wraps a symphonia format reader and decoder for the file's default audio
/// track. Samples come out mono at the file's native rate; resampling to the
/// pipeline rate happens afterwards.
pub struct AudioReader {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    native_rate: u32,
    n_frames: Option<u64>,
    sample_buf: Option<SampleBuffer<f32>>,
}

impl AudioReader {
    /// Open a file and prepare its default audio track for decoding
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::Decode(format!("cannot open {}: {}", path.display(), e)))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| {
                Error::Decode(format!("unsupported format {}: {}", path.display(), e))
            })?;

        let format = probed.format;

        let track = format.default_track().ok_or_else(|| {
            Error::Decode(format!("no audio track in {}", path.display()))
        })?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let native_rate = codec_params.sample_rate.unwrap_or(44100);
        let n_frames = codec_params.n_frames;

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| {
                Error::Decode(format!("unsupported codec {}: {}", path.display(), e))
            })?;

        Ok(Self {
            format,
            decoder,
            track_id,
            native_rate,
            n_frames,
            sample_buf: None,
        })
    }

    /// Native sample rate of the audio track
    pub fn native_rate(&self) -> u32 {
        self.native_rate
    }

    /// Total frame count of the track, if the container reports one
    pub fn n_frames(&self) -> Option<u64> {
        self.n_frames
    }

    /// Seek to an absolute frame position in the track.
    ///
    /// Uses accurate seek mode; the decoder is reset afterwards so decoding
    /// resumes cleanly from the new position.
    pub fn seek_to_frame(&mut self, frame: u64) -> Result<()> {
        let time = Time::from(frame as f64 / self.native_rate as f64);
        self.format
            .seek(
                SeekMode::Accurate,
                SeekTo::Time {
                    time,
                    track_id: Some(self.track_id),
                },
            )
            .map_err(|e| Error::Decode(format!("seek failed: {}", e)))?;
        self.decoder.reset();
        Ok(())
    }

    /// Decode mono samples from the current position.
    ///
    /// Reads until end of stream, or until `max_frames` samples have been
    /// collected when a limit is given. Channels are averaged per frame.
    pub fn decode_mono(&mut self, max_frames: Option<u64>) -> Result<Vec<f32>> {
        let mut out: Vec<f32> = Vec::new();

        loop {
            if let Some(limit) = max_frames {
                if out.len() as u64 >= limit {
                    out.truncate(limit as usize);
                    break;
                }
            }

            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break; // EOF
                }
                Err(e) => return Err(Error::Decode(format!("packet read failed: {}", e))),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = self
                .decoder
                .decode(&packet)
                .map_err(|e| Error::Decode(format!("decode failed: {}", e)))?;

            let spec = *decoded.spec();
            let channels = spec.channels.count();
            if channels == 0 {
                return Err(Error::Decode("decoded packet has no channels".to_string()));
            }

            // (Re)allocate the interleaved copy buffer when the packet needs
            // more room than the current one provides.
            let needed = decoded.capacity() * channels;
            if self.sample_buf.as_ref().map_or(true, |b| b.capacity() < needed) {
                self.sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
            }

            if let Some(buf) = self.sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                for frame in buf.samples().chunks_exact(channels) {
                    out.push(frame.iter().copied().sum::<f32>() / channels as f32);
                }
            }
        }

        Ok(out)
    }
}

/// Decode an entire file to mono samples at `sample_rate`.
///
/// No retry on this path: whole-file reads are assumed reliable, so any
/// failure propagates immediately as a decode error.
pub fn decode_file(path: &Path, sample_rate: u32) -> Result<Vec<f32>> {
    let mut reader = AudioReader::open(path)?;
    let native_rate = reader.native_rate();
    let audio = reader.decode_mono(None)?;
    resample_mono(&audio, native_rate, sample_rate)
}
