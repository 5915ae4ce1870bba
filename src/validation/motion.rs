//! Recorded motion streams.
//!
//! Streams are JSON arrays of records written by the host's motion recorder.
//! Only `timestamp` is required; the remaining fields are kept when present.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A single motion sensor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionRecord {
    /// Seconds since the recorder started
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl MotionRecord {
    /// A record carrying only a timestamp.
    pub fn at(timestamp: f64) -> Self {
        Self {
            timestamp,
            uptime: None,
            step_path: None,
            sensor_type: None,
            x: None,
            y: None,
            z: None,
        }
    }
}

/// Errors from loading a motion stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The stream could not be read
    Io(String),
    /// The stream was read but is not a valid record sequence
    Decode(String),
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::Io(e) => write!(f, "IO error: {e}"),
            StreamError::Decode(e) => write!(f, "Decode error: {e}"),
        }
    }
}

impl std::error::Error for StreamError {}

/// Decode a motion stream from raw bytes.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<MotionRecord>, StreamError> {
    serde_json::from_slice(bytes).map_err(|e| StreamError::Decode(e.to_string()))
}

/// Source of raw bytes for file-backed results.
pub trait StreamSource: Send + Sync {
    fn read(&self, url: &Path) -> Result<Vec<u8>, StreamError>;
}

/// Reads streams from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStreamSource;

impl StreamSource for FsStreamSource {
    fn read(&self, url: &Path) -> Result<Vec<u8>, StreamError> {
        std::fs::read(url).map_err(|e| StreamError::Io(e.to_string()))
    }
}

/// Streams held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStreamSource {
    streams: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryStreamSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes under `url`.
    pub fn insert_bytes(&mut self, url: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.streams.insert(url.into(), bytes);
    }

    /// Store `records` encoded as JSON under `url`.
    pub fn insert(&mut self, url: impl Into<PathBuf>, records: &[MotionRecord]) {
        let bytes = serde_json::to_vec(records).unwrap_or_default();
        self.insert_bytes(url, bytes);
    }
}

impl StreamSource for MemoryStreamSource {
    fn read(&self, url: &Path) -> Result<Vec<u8>, StreamError> {
        self.streams
            .get(url)
            .cloned()
            .ok_or_else(|| StreamError::Io(format!("no stream at {}", url.display())))
    }
}
