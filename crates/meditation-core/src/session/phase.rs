use serde::{Deserialize, Serialize};

/// Nominal session length in seconds; the closing scene starts here.
pub const SESSION_DURATION_SECS: u32 = 330;

/// Stage of the guided session.
///
/// Variants are declared in session order so the derived `Ord` matches the
/// order in which a run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Phase1,
    Phase2,
    Phase3,
    Phase4,
    Closing,
}

/// Key of a pre-rendered narration track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKey {
    #[serde(rename = "phase1")]
    Phase1,
    #[serde(rename = "phase2")]
    Phase2,
    #[serde(rename = "phase3")]
    Phase3,
    #[serde(rename = "phase4")]
    Phase4,
}

impl TrackKey {
    pub const ALL: [TrackKey; 4] = [
        TrackKey::Phase1,
        TrackKey::Phase2,
        TrackKey::Phase3,
        TrackKey::Phase4,
    ];

    /// Stable asset name, e.g. `phase2`.
    pub fn as_str(self) -> &'static str {
        match self {
            TrackKey::Phase1 => "phase1",
            TrackKey::Phase2 => "phase2",
            TrackKey::Phase3 => "phase3",
            TrackKey::Phase4 => "phase4",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }
}

impl std::fmt::Display for TrackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Intro,
        Phase::Phase1,
        Phase::Phase2,
        Phase::Phase3,
        Phase::Phase4,
        Phase::Closing,
    ];

    /// The four narrated phases, in order.
    pub const NARRATED: [Phase; 4] = [Phase::Phase1, Phase::Phase2, Phase::Phase3, Phase::Phase4];

    /// Seconds from session start at which this phase begins.
    pub fn start_offset(self) -> u32 {
        match self {
            Phase::Intro | Phase::Phase1 => 0,
            Phase::Phase2 => 60,
            Phase::Phase3 => 150,
            Phase::Phase4 => 240,
            Phase::Closing => SESSION_DURATION_SECS,
        }
    }

    /// Offset at which the following phase begins, if any.
    pub fn end_offset(self) -> Option<u32> {
        match self {
            Phase::Intro => None,
            Phase::Closing => None,
            other => other.next().map(Phase::start_offset),
        }
    }

    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Intro => Some(Phase::Phase1),
            Phase::Phase1 => Some(Phase::Phase2),
            Phase::Phase2 => Some(Phase::Phase3),
            Phase::Phase3 => Some(Phase::Phase4),
            Phase::Phase4 => Some(Phase::Closing),
            Phase::Closing => None,
        }
    }

    /// 1-based number of a narrated phase.
    pub fn number(self) -> Option<u8> {
        match self {
            Phase::Phase1 => Some(1),
            Phase::Phase2 => Some(2),
            Phase::Phase3 => Some(3),
            Phase::Phase4 => Some(4),
            Phase::Intro | Phase::Closing => None,
        }
    }

    pub fn track(self) -> Option<TrackKey> {
        match self {
            Phase::Phase1 => Some(TrackKey::Phase1),
            Phase::Phase2 => Some(TrackKey::Phase2),
            Phase::Phase3 => Some(TrackKey::Phase3),
            Phase::Phase4 => Some(TrackKey::Phase4),
            Phase::Intro | Phase::Closing => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::Intro => "The New File Sync",
            Phase::Phase1 => "The Cooling of the Lioness",
            Phase::Phase2 => "The Lavender Shield",
            Phase::Phase3 => "The Royal Purple Bridge",
            Phase::Phase4 => "The Ancestral Anchor",
            Phase::Closing => "The New File is Uploaded.",
        }
    }

    /// Heading shown above a narrated scene, e.g. `Phase 2 · 1:00 – 2:30`.
    pub fn range_label(self) -> Option<String> {
        let number = self.number()?;
        let end = self.end_offset()?;
        Some(format!(
            "Phase {number} · {} – {}",
            format_clock(self.start_offset()),
            format_clock(end)
        ))
    }

    /// Particle colour for the scene. Intro and Closing use the warm default.
    pub fn accent_rgb(self) -> [u8; 3] {
        match self {
            Phase::Phase1 => [245, 180, 50],
            Phase::Phase2 => [201, 160, 220],
            Phase::Phase3 => [155, 89, 182],
            Phase::Phase4 => [64, 192, 96],
            Phase::Intro | Phase::Closing => [245, 200, 66],
        }
    }
}

/// Formats seconds as `m:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered_by_session_position() {
        let mut sorted = Phase::ALL;
        sorted.sort();
        assert_eq!(sorted, Phase::ALL);
        assert!(Phase::Intro < Phase::Phase1);
        assert!(Phase::Phase4 < Phase::Closing);
    }

    #[test]
    fn start_offsets_match_scene_boundaries() {
        let offsets: Vec<u32> = Phase::ALL.iter().map(|p| p.start_offset()).collect();
        assert_eq!(offsets, vec![0, 0, 60, 150, 240, 330]);
    }

    #[test]
    fn only_narrated_phases_have_tracks() {
        assert_eq!(Phase::Intro.track(), None);
        assert_eq!(Phase::Closing.track(), None);
        assert_eq!(Phase::Phase3.track(), Some(TrackKey::Phase3));
        assert_eq!(TrackKey::Phase3.as_str(), "phase3");
        assert_eq!(TrackKey::parse("phase4"), Some(TrackKey::Phase4));
        assert_eq!(TrackKey::parse("phase5"), None);
    }

    #[test]
    fn range_labels() {
        assert_eq!(Phase::Phase1.range_label().as_deref(), Some("Phase 1 · 0:00 – 1:00"));
        assert_eq!(Phase::Phase2.range_label().as_deref(), Some("Phase 2 · 1:00 – 2:30"));
        assert_eq!(Phase::Phase4.range_label().as_deref(), Some("Phase 4 · 4:00 – 5:30"));
        assert_eq!(Phase::Closing.range_label(), None);
    }

    #[test]
    fn clock_format_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(44), "0:44");
        assert_eq!(format_clock(330), "5:30");
    }
}
