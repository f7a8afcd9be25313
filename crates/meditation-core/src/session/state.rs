use serde::{Deserialize, Serialize};

use super::phase::{format_clock, Phase, SESSION_DURATION_SECS};

/// Lifecycle of one run.
///
/// ```text
/// Idle -> Running <-> Paused -> Closing -> Idle (restart)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Closing,
}

/// Progress marker for one of the four narrated phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseDot {
    Done,
    Current,
    Upcoming,
}

/// Everything the presentation layer renders.
///
/// Owned and mutated only by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub elapsed_secs: u32,
    pub paused: bool,
    pub started: bool,
    /// Id of the highlighted narration line.
    pub active_line: Option<String>,
    pub cooling: bool,
    pub affirmation_visible: bool,
    pub breath_guide_visible: bool,
    pub muted: bool,
    /// Index of the next timeline entry not yet applied.
    pub cursor: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Intro,
            elapsed_secs: 0,
            paused: false,
            started: false,
            active_line: None,
            cooling: false,
            affirmation_visible: false,
            breath_guide_visible: false,
            muted: false,
            cursor: 0,
        }
    }
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        if !self.started {
            SessionStatus::Idle
        } else if self.phase == Phase::Closing {
            SessionStatus::Closing
        } else if self.paused {
            SessionStatus::Paused
        } else {
            SessionStatus::Running
        }
    }

    /// 0.0 .. 100.0 progress across the session.
    pub fn progress_pct(&self) -> f64 {
        (self.elapsed_secs as f64 / SESSION_DURATION_SECS as f64 * 100.0).min(100.0)
    }

    pub fn clock_label(&self) -> String {
        format_clock(self.elapsed_secs)
    }

    /// Pause/restart controls, clock and progress bar are shown mid-run only.
    pub fn controls_visible(&self) -> bool {
        self.started && self.phase != Phase::Closing
    }

    /// The breath guide only renders over the first scene.
    pub fn breath_guide_shown(&self) -> bool {
        self.breath_guide_visible && self.phase == Phase::Phase1
    }

    /// Dots for phases 1-4, empty outside the narrated part of the run.
    pub fn phase_dots(&self) -> Vec<PhaseDot> {
        if !self.started || self.phase.number().is_none() {
            return Vec::new();
        }
        Phase::NARRATED
            .iter()
            .map(|&p| match p.cmp(&self.phase) {
                std::cmp::Ordering::Less => PhaseDot::Done,
                std::cmp::Ordering::Equal => PhaseDot::Current,
                std::cmp::Ordering::Greater => PhaseDot::Upcoming,
            })
            .collect()
    }
}
