//! In-memory tracks.
//!
//! Tracks hold their encoded bytes resident and model the playback state a
//! media element would expose (position reset, muted flag, playing flag).
//! Nothing is decoded or sent to an output device.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::track::{Track, TrackLoader};
use crate::error::AudioError;
use crate::session::TrackKey;

/// Shared switch standing in for the platform's autoplay policy.
///
/// While closed, every `play()` fails with [`AudioError::PlaybackDenied`].
#[derive(Debug, Clone)]
pub struct PlaybackGate {
    open: Arc<AtomicBool>,
}

impl PlaybackGate {
    pub fn open() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn closed() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl Default for PlaybackGate {
    fn default() -> Self {
        Self::open()
    }
}

#[derive(Debug)]
pub struct MemoryTrack {
    key: TrackKey,
    bytes: Vec<u8>,
    gate: PlaybackGate,
    playing: bool,
    muted: bool,
    /// Number of times the position was reset to zero.
    rewinds: u32,
}

impl MemoryTrack {
    pub fn new(key: TrackKey, bytes: Vec<u8>, gate: PlaybackGate) -> Self {
        Self {
            key,
            bytes,
            gate,
            playing: false,
            muted: false,
            rewinds: 0,
        }
    }

    pub fn rewinds(&self) -> u32 {
        self.rewinds
    }
}

impl Track for MemoryTrack {
    fn key(&self) -> TrackKey {
        self.key
    }

    fn len_bytes(&self) -> usize {
        self.bytes.len()
    }

    fn rewind(&mut self) {
        self.rewinds += 1;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn play(&mut self) -> Result<(), AudioError> {
        if !self.gate.is_open() {
            return Err(AudioError::PlaybackDenied { key: self.key });
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Loader serving tracks from memory.
///
/// Keys without registered bytes load as silent, empty tracks unless the
/// loader was built with [`MemoryLoader::strict`].
#[derive(Debug, Default)]
pub struct MemoryLoader {
    clips: HashMap<TrackKey, Vec<u8>>,
    gate: PlaybackGate,
    strict: bool,
    loads: HashMap<TrackKey, u32>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keys registered with [`MemoryLoader::with_clip`] load.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_clip(mut self, key: TrackKey, bytes: Vec<u8>) -> Self {
        self.clips.insert(key, bytes);
        self
    }

    pub fn with_gate(mut self, gate: PlaybackGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn load_count(&self, key: TrackKey) -> u32 {
        self.loads.get(&key).copied().unwrap_or(0)
    }
}

impl TrackLoader for MemoryLoader {
    fn load(&mut self, key: TrackKey) -> Result<Box<dyn Track>, AudioError> {
        *self.loads.entry(key).or_default() += 1;
        let bytes = match self.clips.get(&key) {
            Some(bytes) => bytes.clone(),
            None if self.strict => {
                return Err(AudioError::LoadFailed {
                    key,
                    message: "no clip registered".into(),
                })
            }
            None => Vec::new(),
        };
        Ok(Box::new(MemoryTrack::new(key, bytes, self.gate.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_gate_denies_playback() {
        let gate = PlaybackGate::closed();
        let mut track = MemoryTrack::new(TrackKey::Phase1, Vec::new(), gate.clone());
        assert_eq!(
            track.play(),
            Err(AudioError::PlaybackDenied {
                key: TrackKey::Phase1
            })
        );
        assert!(!track.is_playing());

        gate.set_open(true);
        assert!(track.play().is_ok());
        assert!(track.is_playing());
    }

    #[test]
    fn rewind_is_counted() {
        let mut track = MemoryTrack::new(TrackKey::Phase2, vec![0; 8], PlaybackGate::open());
        assert_eq!(track.rewinds(), 0);
        track.rewind();
        track.rewind();
        assert_eq!(track.rewinds(), 2);
        assert_eq!(track.len_bytes(), 8);
    }

    #[test]
    fn strict_loader_rejects_unknown_keys() {
        let mut loader = MemoryLoader::strict().with_clip(TrackKey::Phase1, vec![1, 2, 3]);
        assert!(loader.load(TrackKey::Phase1).is_ok());
        assert!(matches!(
            loader.load(TrackKey::Phase2),
            Err(AudioError::LoadFailed { .. })
        ));
        assert_eq!(loader.load_count(TrackKey::Phase2), 1);
    }
}
