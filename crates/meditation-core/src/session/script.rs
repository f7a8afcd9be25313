//! Narration text for every scene.
//!
//! The timeline only carries line ids; renderers look the text up here.

use super::phase::Phase;

/// One narration line of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationLine {
    pub id: &'static str,
    pub text: &'static str,
}

/// Static content of one scene.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub phase: Phase,
    pub lines: &'static [NarrationLine],
    /// Text shown beneath the narration after its last line.
    /// The phase 1 affirmation is timed separately.
    pub coda: Option<&'static str>,
}

const fn line(id: &'static str, text: &'static str) -> NarrationLine {
    NarrationLine { id, text }
}

pub const INTRO_LINES: &[&str] = &[
    "Find a quiet space. Sit tall, facing West.",
    "Let the light of the setting sun touch your skin.",
    "When you are ready, begin.",
];

pub const AFFIRMATION: &str = "\"I am not a predator searching for my cub.\n\
I am the Sun that provides the warmth she needs to grow.\"";

pub const BREATH_GUIDE: &str = "Inhale 4 · Exhale 8";

const PHASE1_LINES: &[NarrationLine] = &[
    line("p1-l1", "Deanne... find your center."),
    line("p1-l2", "Sit tall, facing West, and let the light of the setting sun touch your skin."),
    line("p1-l3", "Close your eyes. For a moment, feel the heat."),
    line("p1-l4", "Feel the frustration of the block... the \"why\" that keeps you pacing..."),
    line("p1-l5", "the protective fire you feel for your grandson."),
    line("p1-l6", "Now, we shift. Inhale for four... and exhale for eight."),
    line("p1-l7", "As you breathe out, see your bright orange fire cooling."),
    line("p1-l8", "Watch it settle into a Soft, Steady Gold."),
];

const PHASE2_LINES: &[NarrationLine] = &[
    line("p2-l1", "Open your eyes. See the Lavender Glow around Jaden and the baby."),
    line("p2-l2", "This is her shield. It is her motherhood. It is beautiful, and it is her right."),
    line("p2-l3", "Respecting this shield is the only key to the door."),
    line("p2-l4", "Visualize your Golden Light reaching out like a soft, silken ribbon."),
    line("p2-l5", "It does not poke. It does not prod."),
    line("p2-l6", "It simply wraps around her lavender world..."),
    line("p2-l7", "like a warm atmosphere surrounding a planet."),
    line("p2-l8", "You are the air she breathes, keeping her safe,\nwithout ever touching the glass."),
];

const PHASE3_LINES: &[NarrationLine] = &[
    line("p3-l1", "Focus on the Royal Purple. The place where your gold meets her lavender."),
    line("p3-l2", "This is the Neutral Zone."),
    line("p3-l3", "In this space, you are not \"Mother\" and \"Daughter.\""),
    line("p3-l4", "You are Two Matriarchs of the same bloodline."),
    line("p3-l5", "Pulse your light into that bridge. Send the frequency of Safety."),
    line("p3-l6", "No demands. No questions."),
];

const PHASE4_LINES: &[NarrationLine] = &[
    line("p4-l1", "Look at the Grandmother in the background. Feel her strength behind your back."),
    line("p4-l2", "You are the Stem. She is the Root. Together, you are a mountain."),
    line("p4-l3", "A mountain does not chase the clouds. It waits for the rain."),
    line("p4-l4", "Take one deep, final breath."),
    line("p4-l5", "As you exhale, let the image go."),
    line("p4-l6", "Trust that the \"New File\" has been uploaded. The frequency is sent."),
];

const WHISPER: &str = "(Whisper)\n\"Jaden... I am the ground you stand on.\n\
I am the history that holds you.\n\
You are safe to come home when the tide turns.\"";

pub const CLOSING_REFLECTION: &str = "The frequency has been sent.\n\
You are not a predator, you are the Sun.\n\
You are not a mountain chasing clouds, you are the mountain that waits for rain.";

pub const CLOSING_REMINDER: &str = "A gentle reminder, Deanne:\n\
The New File only works if the Old File stops running.\n\
Every time you peek, you're Old File Deanne.\n\
When you meditate, this is New File Deanne.";

pub static SCENES: [Scene; 4] = [
    Scene {
        phase: Phase::Phase1,
        lines: PHASE1_LINES,
        coda: None,
    },
    Scene {
        phase: Phase::Phase2,
        lines: PHASE2_LINES,
        coda: None,
    },
    Scene {
        phase: Phase::Phase3,
        lines: PHASE3_LINES,
        coda: Some(WHISPER),
    },
    Scene {
        phase: Phase::Phase4,
        lines: PHASE4_LINES,
        coda: Some("It is done."),
    },
];

pub fn scene(phase: Phase) -> Option<&'static Scene> {
    SCENES.iter().find(|scene| scene.phase == phase)
}

/// Looks up a narration line by id across all scenes.
pub fn line_text(id: &str) -> Option<&'static str> {
    SCENES
        .iter()
        .flat_map(|scene| scene.lines.iter())
        .find(|line| line.id == id)
        .map(|line| line.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_narrated_phase_has_a_scene() {
        for phase in Phase::NARRATED {
            assert!(scene(phase).is_some(), "missing scene for {phase:?}");
        }
        assert!(scene(Phase::Intro).is_none());
        assert!(scene(Phase::Closing).is_none());
    }

    #[test]
    fn line_ids_are_unique_and_prefixed_by_phase() {
        let mut seen = std::collections::HashSet::new();
        for scene in SCENES {
            let prefix = format!("p{}-", scene.phase.number().unwrap());
            for line in scene.lines {
                assert!(line.id.starts_with(&prefix), "{} outside {prefix}", line.id);
                assert!(seen.insert(line.id), "duplicate line {}", line.id);
            }
        }
        assert_eq!(seen.len(), 28);
    }

    #[test]
    fn line_lookup() {
        assert_eq!(line_text("p1-l8"), Some("Watch it settle into a Soft, Steady Gold."));
        assert_eq!(line_text("p9-l1"), None);
    }
}
