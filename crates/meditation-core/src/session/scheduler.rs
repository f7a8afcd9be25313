//! Timeline scheduler.
//!
//! The scheduler is a tick-driven state machine. It does not own a timer;
//! the caller (usually [`crate::player::Player`]) calls `tick()` once per
//! clock tick.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Closing -> Idle (restart)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = Scheduler::new(AudioDirector::disabled());
//! scheduler.start();
//! // Once per second:
//! for event in scheduler.tick() { render(&event); }
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::phase::{Phase, TrackKey};
use super::script;
use super::state::{SessionState, SessionStatus};
use super::timeline::{Effect, Timeline};
use crate::audio::AudioDirector;
use crate::events::Event;

type ScriptFn = Arc<dyn Fn() -> Timeline + Send + Sync>;

/// Applies due timeline effects to the session state.
pub struct Scheduler {
    state: SessionState,
    timeline: Timeline,
    audio: AudioDirector,
    script: ScriptFn,
    /// Value `muted` returns to on restart.
    initial_muted: bool,
}

impl Scheduler {
    pub fn new(audio: AudioDirector) -> Self {
        Self {
            state: SessionState::default(),
            timeline: Timeline::default(),
            audio,
            script: Arc::new(Timeline::build),
            initial_muted: false,
        }
    }

    /// Replace the session script. Takes effect on the next start.
    pub fn with_script(mut self, script: impl Fn() -> Timeline + Send + Sync + 'static) -> Self {
        self.script = Arc::new(script);
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.initial_muted = muted;
        self.state.muted = muted;
        self.audio.set_muted(muted);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn audio(&self) -> &AudioDirector {
        &self.audio
    }

    pub fn is_closed(&self) -> bool {
        self.state.phase == Phase::Closing
    }

    /// Text of the highlighted narration line.
    pub fn active_text(&self) -> Option<&'static str> {
        self.state.active_line.as_deref().and_then(script::line_text)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status(),
            state: self.state.clone(),
            active_text: self.active_text().map(str::to_string),
            phase_title: self.state.phase.title().to_string(),
            accent: self.state.phase.accent_rgb(),
            phase_dots: self.state.phase_dots(),
            progress_pct: self.state.progress_pct(),
            clock: self.state.clock_label(),
            playing: self.audio.playing(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run. Offset-0 entries fire before this returns.
    ///
    /// Starting a live run discards it first, so there is never more than
    /// one run in flight.
    pub fn start(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.state.started {
            info!(
                elapsed_secs = self.state.elapsed_secs,
                "start requested on a live session; resetting"
            );
            events.push(Event::SessionReset {
                discarded_elapsed_secs: self.state.elapsed_secs,
                at: Utc::now(),
            });
            self.reset_run();
        }

        self.timeline = (self.script)();
        self.audio.preload(&TrackKey::ALL);
        self.state.started = true;
        info!(entries = self.timeline.len(), "session started");
        events.push(Event::SessionStarted { at: Utc::now() });
        events.extend(self.apply_due());
        events
    }

    /// Advance the session clock by one second and fire due entries.
    ///
    /// Ticks are ignored while idle, paused or closed.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.state.started || self.state.paused || self.is_closed() {
            return Vec::new();
        }
        self.state.elapsed_secs += 1;
        let mut events = vec![Event::Ticked {
            elapsed_secs: self.state.elapsed_secs,
            at: Utc::now(),
        }];
        events.extend(self.apply_due());
        events
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.status() != SessionStatus::Running {
            return None;
        }
        self.state.paused = true;
        self.audio.pause();
        debug!(elapsed_secs = self.state.elapsed_secs, "session paused");
        Some(Event::SessionPaused {
            elapsed_secs: self.state.elapsed_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.status() != SessionStatus::Paused {
            return None;
        }
        self.state.paused = false;
        self.audio.resume();
        debug!(elapsed_secs = self.state.elapsed_secs, "session resumed");
        Some(Event::SessionResumed {
            elapsed_secs: self.state.elapsed_secs,
            at: Utc::now(),
        })
    }

    pub fn toggle_pause(&mut self) -> Option<Event> {
        match self.status() {
            SessionStatus::Running => self.pause(),
            SessionStatus::Paused => self.resume(),
            SessionStatus::Idle | SessionStatus::Closing => None,
        }
    }

    /// Return to the idle state, discarding the timeline.
    pub fn restart(&mut self) -> Option<Event> {
        self.reset_run();
        self.state.muted = self.initial_muted;
        self.audio.set_muted(self.initial_muted);
        info!("session restarted");
        Some(Event::SessionRestarted { at: Utc::now() })
    }

    /// Only touches `muted` and the audio director.
    pub fn toggle_mute(&mut self) -> Option<Event> {
        self.set_muted(!self.state.muted)
    }

    pub fn set_muted(&mut self, muted: bool) -> Option<Event> {
        self.state.muted = muted;
        self.audio.set_muted(muted);
        Some(Event::MuteChanged {
            muted,
            at: Utc::now(),
        })
    }

    /// Stop audio and release every cached track.
    pub fn teardown(&mut self) {
        self.reset_run();
        self.audio.teardown();
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Reset everything except the mute preference.
    fn reset_run(&mut self) {
        self.audio.stop();
        let records = self.audio.take_logs();
        if !records.is_empty() {
            debug!(records = records.len(), "playback log of previous run discarded");
        }
        self.timeline = Timeline::default();
        self.state = SessionState {
            muted: self.state.muted,
            ..SessionState::default()
        };
    }

    fn apply_due(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        let elapsed = self.state.elapsed_secs;
        while let Some(entry) = self.timeline.get(self.state.cursor) {
            if entry.offset_secs > elapsed {
                break;
            }
            let index = self.state.cursor;
            let offset_secs = entry.offset_secs;
            let effect = entry.effect.clone();
            self.state.cursor += 1;

            let applied = self.apply(&effect);
            events.push(Event::EffectApplied {
                index,
                offset_secs,
                elapsed_secs: elapsed,
                effect,
                at: Utc::now(),
            });
            events.extend(applied);
        }
        events
    }

    fn apply(&mut self, effect: &Effect) -> Option<Event> {
        debug!(?effect, elapsed_secs = self.state.elapsed_secs, "applying effect");
        match effect {
            Effect::EnterPhase(phase) => {
                // Phases never move backwards within a run.
                if *phase < self.state.phase {
                    return None;
                }
                self.state.phase = *phase;
                if *phase == Phase::Closing {
                    info!(elapsed_secs = self.state.elapsed_secs, "session closed");
                    return Some(Event::SessionClosed {
                        elapsed_secs: self.state.elapsed_secs,
                        at: Utc::now(),
                    });
                }
            }
            Effect::LightLine(id) => self.state.active_line = Some(id.clone()),
            Effect::ClearLine => self.state.active_line = None,
            Effect::SetBreathGuide(visible) => self.state.breath_guide_visible = *visible,
            Effect::BeginCooling => self.state.cooling = true,
            Effect::ShowAffirmation => self.state.affirmation_visible = true,
            Effect::PlayTrack(key) => {
                let outcome = self.audio.play(*key);
                return Some(Event::TrackSwitched {
                    key: *key,
                    outcome,
                    at: Utc::now(),
                });
            }
            Effect::StopAudio => self.audio.stop(),
        }
        None
    }
}
