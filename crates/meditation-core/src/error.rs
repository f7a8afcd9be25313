//! Core error types for meditation-core.
//!
//! Nothing in a running session is fatal: audio errors are caught by the
//! audio director and logged. The hierarchy exists so that the loaders,
//! configuration and script validation can report precisely what failed.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::TrackKey;

/// Core error type for meditation-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Audio-related errors
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Timeline script errors
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The player task is gone
    #[error("Player has shut down")]
    PlayerClosed,
}

/// Narration playback errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The platform refused to start playback (e.g. no prior user gesture).
    #[error("Playback of '{key}' was denied by the platform")]
    PlaybackDenied { key: TrackKey },

    /// No asset exists for the key.
    #[error("No audio asset for '{key}' at {}", path.display())]
    AssetMissing { key: TrackKey, path: PathBuf },

    /// The asset exists but could not be loaded.
    #[error("Failed to load '{key}': {message}")]
    LoadFailed { key: TrackKey, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Config directory could not be determined or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Timeline script validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Entries must be sorted by offset.
    #[error("Entry {index} at {offset}s precedes the previous entry at {previous}s")]
    OutOfOrder { index: usize, offset: u32, previous: u32 },

    /// A line effect names a line with no narration text.
    #[error("Entry {index} lights unknown line '{line}'")]
    UnknownLine { index: usize, line: String },

    /// The script never reaches the closing scene.
    #[error("Timeline has no closing entry")]
    MissingClose,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
