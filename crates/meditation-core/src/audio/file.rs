use std::path::PathBuf;

use tracing::debug;

use super::memory::{MemoryTrack, PlaybackGate};
use super::track::{Track, TrackLoader};
use crate::error::AudioError;
use crate::session::TrackKey;

/// Loads `<asset_dir>/<key>.<extension>` into memory.
#[derive(Debug, Clone)]
pub struct FileLoader {
    asset_dir: PathBuf,
    extension: String,
    gate: PlaybackGate,
}

impl FileLoader {
    pub fn new(asset_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            extension: extension.into(),
            gate: PlaybackGate::open(),
        }
    }

    pub fn with_gate(mut self, gate: PlaybackGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn path_for(&self, key: TrackKey) -> PathBuf {
        self.asset_dir
            .join(format!("{}.{}", key.as_str(), self.extension.trim_start_matches('.')))
    }
}

impl TrackLoader for FileLoader {
    fn load(&mut self, key: TrackKey) -> Result<Box<dyn Track>, AudioError> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Err(AudioError::AssetMissing { key, path });
        }
        let bytes = std::fs::read(&path).map_err(|e| AudioError::LoadFailed {
            key,
            message: e.to_string(),
        })?;
        debug!(%key, path = %path.display(), bytes = bytes.len(), "loaded narration track");
        Ok(Box::new(MemoryTrack::new(key, bytes, self.gate.clone())))
    }
}
