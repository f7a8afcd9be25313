//! Narration playback.
//!
//! The director owns every loaded track and the single "current" handle.
//! Audio is best effort: a failed load or a denied `play()` is logged and
//! recorded, never propagated to the session.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::track::{Track, TrackLoader};
use crate::error::AudioError;
use crate::session::TrackKey;

/// Oldest playback records are dropped past this many.
const LOG_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackOutcome {
    Played,
    Denied,
    /// No track is cached for the key.
    Missing,
    /// Audio is switched off in configuration.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    pub key: TrackKey,
    pub outcome: PlaybackOutcome,
    pub muted: bool,
    pub at: DateTime<Utc>,
}

pub struct AudioDirector {
    loader: Option<Box<dyn TrackLoader>>,
    cache: HashMap<TrackKey, Box<dyn Track>>,
    /// Keys whose load failed; not retried until teardown.
    failed: HashSet<TrackKey>,
    current: Option<TrackKey>,
    muted: bool,
    suspended: bool,
    log: Vec<PlaybackRecord>,
}

impl AudioDirector {
    pub fn new(loader: Box<dyn TrackLoader>) -> Self {
        Self {
            loader: Some(loader),
            cache: HashMap::new(),
            failed: HashSet::new(),
            current: None,
            muted: false,
            suspended: false,
            log: Vec::new(),
        }
    }

    /// A director that never loads or plays anything.
    pub fn disabled() -> Self {
        Self {
            loader: None,
            cache: HashMap::new(),
            failed: HashSet::new(),
            current: None,
            muted: false,
            suspended: false,
            log: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_enabled(&self) -> bool {
        self.loader.is_some()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Key of the track currently attached, playing or not.
    pub fn current(&self) -> Option<TrackKey> {
        self.current
    }

    /// Key of the track actually producing sound (ignoring mute).
    pub fn playing(&self) -> Option<TrackKey> {
        self.cache
            .values()
            .find(|track| track.is_playing())
            .map(|track| track.key())
    }

    pub fn playing_count(&self) -> usize {
        self.cache.values().filter(|t| t.is_playing()).count()
    }

    pub fn is_loaded(&self, key: TrackKey) -> bool {
        self.cache.contains_key(&key)
    }

    pub fn track(&self, key: TrackKey) -> Option<&dyn Track> {
        self.cache.get(&key).map(|t| &**t)
    }

    pub fn logs(&self) -> &[PlaybackRecord] {
        &self.log
    }

    pub fn take_logs(&mut self) -> Vec<PlaybackRecord> {
        std::mem::take(&mut self.log)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load each key once. Failures leave the key absent and are not
    /// attempted again until [`AudioDirector::teardown`].
    pub fn preload(&mut self, keys: &[TrackKey]) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        for &key in keys {
            if self.cache.contains_key(&key) || self.failed.contains(&key) {
                continue;
            }
            match loader.load(key) {
                Ok(mut track) => {
                    debug!(%key, bytes = track.len_bytes(), "narration track cached");
                    track.set_muted(self.muted);
                    self.cache.insert(key, track);
                }
                Err(err) => {
                    warn!(%key, error = %err, "narration track unavailable");
                    self.failed.insert(key);
                }
            }
        }
    }

    /// Switch narration to `key`, restarting it from the top.
    pub fn play(&mut self, key: TrackKey) -> PlaybackOutcome {
        self.stop();
        if !self.is_enabled() {
            return self.record(key, PlaybackOutcome::Disabled);
        }

        let muted = self.muted;
        let Some(track) = self.cache.get_mut(&key) else {
            warn!(%key, "play requested for a track that is not loaded");
            return self.record(key, PlaybackOutcome::Missing);
        };
        track.rewind();
        track.set_muted(muted);
        self.current = Some(key);

        let outcome = match track.play() {
            Ok(()) => PlaybackOutcome::Played,
            Err(err) => Self::swallow(err),
        };
        debug!(%key, ?outcome, muted, "narration switched");
        self.record(key, outcome)
    }

    /// Applies to the current track and every cached one.
    ///
    /// A current track whose playback was denied is retried, since toggling
    /// mute counts as a user gesture.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        for track in self.cache.values_mut() {
            track.set_muted(muted);
        }
        self.retry_current();
    }

    pub fn pause(&mut self) {
        self.suspended = true;
        if let Some(track) = self.current_track_mut() {
            track.pause();
        }
    }

    pub fn resume(&mut self) {
        self.suspended = false;
        if let Some(track) = self.current_track_mut() {
            if let Err(err) = track.play() {
                Self::swallow(err);
            }
        }
    }

    /// Halt and detach the current track. The cache is kept.
    pub fn stop(&mut self) {
        self.suspended = false;
        if let Some(track) = self.current_track_mut() {
            track.pause();
            track.rewind();
        }
        self.current = None;
    }

    /// Stop and drop every cached track, failed load and log record.
    pub fn teardown(&mut self) {
        self.stop();
        self.cache.clear();
        self.failed.clear();
        self.log.clear();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn current_track_mut(&mut self) -> Option<&mut Box<dyn Track>> {
        let key = self.current?;
        self.cache.get_mut(&key)
    }

    fn retry_current(&mut self) {
        if self.suspended {
            return;
        }
        let Some(key) = self.current else {
            return;
        };
        let needs_retry = self.cache.get(&key).is_some_and(|t| !t.is_playing());
        if needs_retry {
            let muted = self.muted;
            if let Some(track) = self.cache.get_mut(&key) {
                let outcome = match track.play() {
                    Ok(()) => PlaybackOutcome::Played,
                    Err(err) => Self::swallow(err),
                };
                self.push_record(key, outcome, muted);
            }
        }
    }

    fn swallow(err: AudioError) -> PlaybackOutcome {
        warn!(error = %err, "narration playback failed; continuing without audio");
        PlaybackOutcome::Denied
    }

    fn record(&mut self, key: TrackKey, outcome: PlaybackOutcome) -> PlaybackOutcome {
        let muted = self.muted;
        self.push_record(key, outcome, muted);
        outcome
    }

    fn push_record(&mut self, key: TrackKey, outcome: PlaybackOutcome, muted: bool) {
        if self.log.len() >= LOG_CAPACITY {
            self.log.remove(0);
        }
        self.log.push(PlaybackRecord {
            key,
            outcome,
            muted,
            at: Utc::now(),
        });
    }
}
