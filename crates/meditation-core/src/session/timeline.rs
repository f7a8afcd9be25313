//! The session script as an ordered list of timed effects.
//!
//! Every run instantiates a fresh [`Timeline`] from the static script, so a
//! restarted session replays exactly what the first one did. Effects are
//! plain data; the scheduler interprets them.

use serde::{Deserialize, Serialize};

use super::phase::{Phase, TrackKey, SESSION_DURATION_SECS};
use super::script;
use crate::error::ScriptError;

/// What a timeline entry does when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Effect {
    EnterPhase(Phase),
    LightLine(String),
    ClearLine,
    SetBreathGuide(bool),
    BeginCooling,
    ShowAffirmation,
    PlayTrack(TrackKey),
    StopAudio,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub offset_secs: u32,
    pub effect: Effect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    /// Instantiate the guided session script.
    pub fn build() -> Self {
        let mut tl = TimelineBuilder::default();

        // Phase 1
        tl.enter(0, Phase::Phase1)
            .at(0, Effect::SetBreathGuide(true))
            .line(3, "p1-l1")
            .line(6, "p1-l2")
            .line(12, "p1-l3")
            .line(17, "p1-l4")
            .line(22, "p1-l5")
            .line(27, "p1-l6")
            .at(27, Effect::SetBreathGuide(true))
            .line(39, "p1-l7")
            .at(39, Effect::BeginCooling)
            .line(44, "p1-l8")
            .at(50, Effect::ShowAffirmation);

        // Phase 2
        tl.enter(60, Phase::Phase2)
            .at(60, Effect::SetBreathGuide(false))
            .at(60, Effect::ClearLine)
            .line(63, "p2-l1")
            .line(68, "p2-l2")
            .line(73, "p2-l3")
            .line(78, "p2-l4")
            .line(82, "p2-l5")
            .line(86, "p2-l6")
            .line(90, "p2-l7")
            .line(95, "p2-l8");

        // Phase 3
        tl.enter(150, Phase::Phase3)
            .at(150, Effect::ClearLine)
            .line(155, "p3-l1")
            .line(160, "p3-l2")
            .line(165, "p3-l3")
            .line(170, "p3-l4")
            .line(175, "p3-l5")
            .line(180, "p3-l6");

        // Phase 4
        tl.enter(240, Phase::Phase4)
            .at(240, Effect::ClearLine)
            .line(244, "p4-l1")
            .line(249, "p4-l2")
            .line(259, "p4-l3")
            .line(269, "p4-l4")
            .line(274, "p4-l5")
            .line(279, "p4-l6");

        // Close
        tl.at(SESSION_DURATION_SECS, Effect::EnterPhase(Phase::Closing))
            .at(SESSION_DURATION_SECS, Effect::ClearLine)
            .at(SESSION_DURATION_SECS, Effect::StopAudio);

        tl.finish()
    }

    pub fn from_entries(entries: Vec<TimelineEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries due at or before `elapsed_secs`.
    pub fn due_count(&self, elapsed_secs: u32) -> usize {
        self.entries
            .partition_point(|entry| entry.offset_secs <= elapsed_secs)
    }

    /// Offset of the last entry, i.e. when the script is exhausted.
    pub fn last_offset(&self) -> u32 {
        self.entries.last().map(|e| e.offset_secs).unwrap_or(0)
    }

    /// Check ordering, line references and that the script closes.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let mut previous = 0;
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.offset_secs < previous {
                return Err(ScriptError::OutOfOrder {
                    index,
                    offset: entry.offset_secs,
                    previous,
                });
            }
            previous = entry.offset_secs;

            if let Effect::LightLine(ref id) = entry.effect {
                if script::line_text(id).is_none() {
                    return Err(ScriptError::UnknownLine {
                        index,
                        line: id.clone(),
                    });
                }
            }
        }

        let closes = self
            .entries
            .iter()
            .any(|e| e.effect == Effect::EnterPhase(Phase::Closing));
        if !closes {
            return Err(ScriptError::MissingClose);
        }
        Ok(())
    }
}

#[derive(Default)]
struct TimelineBuilder {
    entries: Vec<TimelineEntry>,
}

impl TimelineBuilder {
    fn at(&mut self, offset_secs: u32, effect: Effect) -> &mut Self {
        self.entries.push(TimelineEntry {
            offset_secs,
            effect,
        });
        self
    }

    fn line(&mut self, offset_secs: u32, id: &str) -> &mut Self {
        self.at(offset_secs, Effect::LightLine(id.to_string()))
    }

    /// Phase change plus its narration track.
    fn enter(&mut self, offset_secs: u32, phase: Phase) -> &mut Self {
        self.at(offset_secs, Effect::EnterPhase(phase));
        if let Some(track) = phase.track() {
            self.at(offset_secs, Effect::PlayTrack(track));
        }
        self
    }

    fn finish(self) -> Timeline {
        Timeline {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_offsets(tl: &Timeline, prefix: &str) -> Vec<u32> {
        tl.entries()
            .iter()
            .filter_map(|e| match &e.effect {
                Effect::LightLine(id) if id.starts_with(prefix) => Some(e.offset_secs),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn built_script_is_valid() {
        assert_eq!(Timeline::build().validate(), Ok(()));
    }

    #[test]
    fn builds_are_identical_and_independent() {
        let a = Timeline::build();
        let mut b = Timeline::build();
        assert_eq!(a, b);
        b.entries.clear();
        assert!(!a.is_empty());
    }

    #[test]
    fn line_offsets_match_narration_timing() {
        let tl = Timeline::build();
        assert_eq!(line_offsets(&tl, "p1-"), vec![3, 6, 12, 17, 22, 27, 39, 44]);
        assert_eq!(line_offsets(&tl, "p2-"), vec![63, 68, 73, 78, 82, 86, 90, 95]);
        assert_eq!(line_offsets(&tl, "p3-"), vec![155, 160, 165, 170, 175, 180]);
        assert_eq!(line_offsets(&tl, "p4-"), vec![244, 249, 259, 269, 274, 279]);
    }

    #[test]
    fn phase_entries_sit_on_phase_boundaries() {
        let tl = Timeline::build();
        for entry in tl.entries() {
            if let Effect::EnterPhase(phase) = entry.effect {
                assert_eq!(entry.offset_secs, phase.start_offset(), "{phase:?}");
            }
        }
        assert_eq!(tl.last_offset(), 330);
    }

    #[test]
    fn affirmation_fires_at_fifty() {
        let tl = Timeline::build();
        let entry = tl
            .entries()
            .iter()
            .find(|e| e.effect == Effect::ShowAffirmation)
            .unwrap();
        assert_eq!(entry.offset_secs, 50);
    }

    #[test]
    fn due_count_includes_ties() {
        let tl = Timeline::build();
        // Phase 1 entry, its track and the breath guide all sit at 0.
        assert_eq!(tl.due_count(0), 3);
        assert_eq!(tl.due_count(2), 3);
        assert_eq!(tl.due_count(3), 4);
        assert_eq!(tl.due_count(10_000), tl.len());
    }

    #[test]
    fn validate_rejects_unsorted_entries() {
        let tl = Timeline::from_entries(vec![
            TimelineEntry {
                offset_secs: 5,
                effect: Effect::ClearLine,
            },
            TimelineEntry {
                offset_secs: 4,
                effect: Effect::ClearLine,
            },
        ]);
        assert_eq!(
            tl.validate(),
            Err(ScriptError::OutOfOrder {
                index: 1,
                offset: 4,
                previous: 5
            })
        );
    }

    #[test]
    fn validate_rejects_unknown_lines_and_missing_close() {
        let unknown = Timeline::from_entries(vec![TimelineEntry {
            offset_secs: 1,
            effect: Effect::LightLine("p7-l1".into()),
        }]);
        assert!(matches!(
            unknown.validate(),
            Err(ScriptError::UnknownLine { index: 0, .. })
        ));

        let open = Timeline::from_entries(vec![TimelineEntry {
            offset_secs: 1,
            effect: Effect::ClearLine,
        }]);
        assert_eq!(open.validate(), Err(ScriptError::MissingClose));
    }

    #[test]
    fn effects_serialize_as_tagged_variants() {
        let json = serde_json::to_string(&Effect::PlayTrack(TrackKey::Phase2)).unwrap();
        assert_eq!(json, r#"{"kind":"play_track","value":"phase2"}"#);
        let json = serde_json::to_string(&Effect::ClearLine).unwrap();
        assert_eq!(json, r#"{"kind":"clear_line"}"#);
    }
}
