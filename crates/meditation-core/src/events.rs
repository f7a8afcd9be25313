use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::PlaybackOutcome;
use crate::session::{Effect, PhaseDot, SessionState, SessionStatus, TrackKey};

/// Every state change in a session produces an Event.
/// The presentation layer re-renders from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        at: DateTime<Utc>,
    },
    /// A start arrived while a run was live; the old run was discarded.
    SessionReset {
        discarded_elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    SessionResumed {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    SessionRestarted {
        at: DateTime<Utc>,
    },
    /// The session clock advanced by one second.
    Ticked {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    EffectApplied {
        index: usize,
        offset_secs: u32,
        elapsed_secs: u32,
        effect: Effect,
        at: DateTime<Utc>,
    },
    TrackSwitched {
        key: TrackKey,
        outcome: PlaybackOutcome,
        at: DateTime<Utc>,
    },
    MuteChanged {
        muted: bool,
        at: DateTime<Utc>,
    },
    /// The closing scene was reached; no further ticks apply.
    SessionClosed {
        elapsed_secs: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: SessionStatus,
        state: SessionState,
        active_text: Option<String>,
        phase_title: String,
        /// RGB accent of the current scene.
        accent: [u8; 3],
        phase_dots: Vec<PhaseDot>,
        progress_pct: f64,
        clock: String,
        playing: Option<TrackKey>,
        at: DateTime<Utc>,
    },
}

