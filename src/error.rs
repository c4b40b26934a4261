//! Error types for thoughtspace.
//!
//! Only the edges of the sandbox can fail: the snapshot store, image
//! export, the config file and the sound sink. Nothing in the simulation itself returns an
//! error; missing references are pruned and degenerate geometry resolves to
//! zero.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing a persisted snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be read or written.
    #[error("failed to access snapshot store: {0}")]
    Io(#[from] std::io::Error),
    /// The stored snapshot is not valid JSON for the snapshot schema.
    #[error("failed to (de)serialize snapshot: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors from encoding or writing an exported canvas image.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The captured frame has zero width or height, or a short pixel buffer.
    #[error("captured frame is empty or malformed ({width}x{height}, {len} bytes)")]
    EmptyFrame { width: u32, height: u32, len: usize },
    /// PNG encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    /// Writing the file failed.
    #[error("failed to write export to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from loading or saving the application config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors reported by a sound sink.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No audio device, or playback is blocked.
    #[error("audio unavailable: {0}")]
    Unavailable(String),
}
