//! Manifest loading, duration filtering, and path resolution
//!
//! A manifest is a JSON-lines file with one object per recording. Entries are
//! open-ended mappings; the pipeline only interprets `audio_filepath` and
//! `duration`, everything else is carried through untouched.

use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One manifest record: a string-keyed JSON mapping.
///
/// Required fields are `audio_filepath` (path relative to the collection's
/// audio root, or absolute) and `duration` (seconds). All other fields are
/// opaque metadata.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    fields: Map<String, Value>,
}

impl ManifestEntry {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up an arbitrary metadata field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The recording's audio file path as written in the manifest
    pub fn audio_filepath(&self) -> Result<PathBuf> {
        self.fields
            .get("audio_filepath")
            .and_then(|v| v.as_str())
            .map(PathBuf::from)
            .ok_or_else(|| Error::Config("manifest entry missing audio_filepath".to_string()))
    }

    /// The recording's duration in seconds
    pub fn duration(&self) -> Result<f64> {
        self.fields
            .get("duration")
            .and_then(|v| v.as_f64())
            .ok_or_else(|| Error::Config("manifest entry missing duration".to_string()))
    }
}

/// Read all entries from a JSON-lines manifest file.
///
/// Blank lines are skipped. An unreadable file or an unparseable line is a
/// fatal configuration error.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let file = File::open(path).map_err(|e| Error::Manifest {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut entries = Vec::new();
    for (line_idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: format!("line {}: {}", line_idx + 1, e),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Map<String, Value> =
            serde_json::from_str(&line).map_err(|e| Error::Manifest {
                path: path.to_path_buf(),
                message: format!("line {}: {}", line_idx + 1, e),
            })?;
        entries.push(ManifestEntry::new(fields));
    }

    Ok(entries)
}

/// Drop entries whose duration falls outside the inclusive `[min, max]` range.
///
/// An absent bound is unbounded. Returns the retained entries in original
/// order, plus the total duration in hours of the input and of the retained
/// subset. An entry without a usable duration is a configuration error.
pub fn filter_by_duration(
    entries: Vec<ManifestEntry>,
    min_duration: Option<f64>,
    max_duration: Option<f64>,
) -> Result<(Vec<ManifestEntry>, f64, f64)> {
    let mut total_secs = 0.0;
    let mut filtered_secs = 0.0;
    let mut filtered = Vec::with_capacity(entries.len());

    for entry in entries {
        let duration = entry.duration()?;
        total_secs += duration;

        if min_duration.is_some_and(|min| duration < min) {
            continue;
        }
        if max_duration.is_some_and(|max| duration > max) {
            continue;
        }

        filtered_secs += duration;
        filtered.push(entry);
    }

    Ok((filtered, total_secs / 3600.0, filtered_secs / 3600.0))
}

/// Resolve a manifest path against an audio root directory.
///
/// A relative input resolves to `base/input`; an absolute input must lie
/// under `base` and is split back into its relative form. Returns
/// `(absolute, relative)`.
pub fn abs_rel_paths(input: &Path, base: &Path) -> Result<(PathBuf, PathBuf)> {
    if input.is_absolute() {
        let rel = input.strip_prefix(base).map_err(|_| {
            Error::Config(format!(
                "audio path {} is not under audio root {}",
                input.display(),
                base.display()
            ))
        })?;
        Ok((input.to_path_buf(), rel.to_path_buf()))
    } else {
        Ok((base.join(input), input.to_path_buf()))
    }
}
