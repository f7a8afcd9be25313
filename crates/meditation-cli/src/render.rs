//! Terminal rendering of session events.

use meditation_core::audio::PlaybackOutcome;
use meditation_core::session::{script, Effect, Phase, SESSION_DURATION_SECS};
use meditation_core::storage::DisplayConfig;
use meditation_core::Event;

const BAR_WIDTH: usize = 30;

/// Turns events into printable lines.
///
/// Keeps just enough state (current phase, clock) to decide what a line
/// should look like.
pub struct Presenter {
    display: DisplayConfig,
    phase: Phase,
    elapsed_secs: u32,
}

impl Presenter {
    pub fn new(display: DisplayConfig) -> Self {
        Self {
            display,
            phase: Phase::Intro,
            elapsed_secs: 0,
        }
    }

    pub fn intro() -> Vec<String> {
        let mut out = vec![
            Phase::Intro.title().to_string(),
            "A Guided Meditation for Deanne".to_string(),
            String::new(),
        ];
        out.extend(script::INTRO_LINES.iter().map(|l| l.to_string()));
        out.push(String::new());
        out.push("[s] begin  [p] pause/resume  [m] mute  [r] restart  [q] quit".to_string());
        out
    }

    pub fn render(&mut self, event: &Event) -> Vec<String> {
        match event {
            Event::SessionStarted { .. } => vec!["Beginning...".to_string()],
            Event::SessionReset { .. } => vec!["(session reset)".to_string()],
            Event::SessionPaused { .. } => vec!["── Paused ── [p] to resume".to_string()],
            Event::SessionResumed { .. } => vec!["── Resumed ──".to_string()],
            Event::SessionRestarted { .. } => {
                self.phase = Phase::Intro;
                self.elapsed_secs = 0;
                let mut out = vec![String::new()];
                out.extend(Self::intro());
                out
            }
            Event::MuteChanged { muted, .. } => {
                vec![if *muted { "(narration muted)" } else { "(narration on)" }.to_string()]
            }
            Event::Ticked { elapsed_secs, .. } => {
                self.elapsed_secs = *elapsed_secs;
                if self.display.show_progress && elapsed_secs % 30 == 0 {
                    vec![self.progress_bar()]
                } else {
                    Vec::new()
                }
            }
            Event::TrackSwitched {
                key,
                outcome: PlaybackOutcome::Denied | PlaybackOutcome::Missing,
                ..
            } => vec![format!("(narration {key} unavailable, continuing in silence)")],
            Event::TrackSwitched { .. } => Vec::new(),
            Event::EffectApplied { effect, .. } => self.render_effect(effect),
            Event::SessionClosed { .. } => Vec::new(),
            Event::StateSnapshot {
                phase_title,
                clock,
                progress_pct,
                active_text,
                ..
            } => {
                let mut out = vec![format!("{phase_title} · {clock} · {progress_pct:.0}%")];
                if let Some(text) = active_text {
                    out.push(format!("  {text}"));
                }
                out
            }
        }
    }

    fn render_effect(&mut self, effect: &Effect) -> Vec<String> {
        match effect {
            Effect::EnterPhase(Phase::Closing) => {
                self.phase = Phase::Closing;
                vec![
                    String::new(),
                    Phase::Closing.title().to_string(),
                    String::new(),
                    script::CLOSING_REFLECTION.to_string(),
                    String::new(),
                    script::CLOSING_REMINDER.to_string(),
                ]
            }
            Effect::EnterPhase(phase) => {
                self.phase = *phase;
                let mut out = vec![String::new()];
                if let Some(label) = phase.range_label() {
                    out.push(label);
                }
                out.push(phase.title().to_uppercase());
                out
            }
            Effect::LightLine(id) => {
                let Some(text) = script::line_text(id) else {
                    return Vec::new();
                };
                let mut out = vec![self.stamp(text)];
                let closes_scene = script::scene(self.phase)
                    .filter(|scene| scene.lines.last().is_some_and(|l| l.id == id.as_str()))
                    .and_then(|scene| scene.coda);
                if let Some(coda) = closes_scene {
                    out.push(String::new());
                    out.push(coda.to_string());
                }
                out
            }
            Effect::SetBreathGuide(true) if self.phase == Phase::Phase1 => {
                vec![format!("    ~ {} ~", script::BREATH_GUIDE)]
            }
            Effect::BeginCooling => vec!["    (the fire cools to a steady gold)".to_string()],
            Effect::ShowAffirmation => vec![String::new(), script::AFFIRMATION.to_string()],
            Effect::SetBreathGuide(_)
            | Effect::ClearLine
            | Effect::PlayTrack(_)
            | Effect::StopAudio => Vec::new(),
        }
    }

    fn stamp(&self, text: &str) -> String {
        if self.display.show_clock {
            format!(
                "[{}] {text}",
                meditation_core::session::format_clock(self.elapsed_secs)
            )
        } else {
            format!("  {text}")
        }
    }

    fn progress_bar(&self) -> String {
        let pct = (self.elapsed_secs as f64 / SESSION_DURATION_SECS as f64).min(1.0);
        let filled = (pct * BAR_WIDTH as f64).round() as usize;
        format!(
            "[{}{}] {:>3.0}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            pct * 100.0
        )
    }
}
