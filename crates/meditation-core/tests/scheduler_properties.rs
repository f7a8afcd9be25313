//! Property tests for the scheduler's ordering guarantees.

use meditation_core::audio::{AudioDirector, MemoryLoader};
use meditation_core::session::{
    Effect, Phase, Scheduler, SessionState, Timeline, TimelineEntry, TrackKey,
};
use meditation_core::Event;
use proptest::prelude::*;

fn arb_effect() -> impl Strategy<Value = Effect> {
    prop_oneof![
        (1usize..=8).prop_map(|n| Effect::LightLine(format!("p1-l{n}"))),
        Just(Effect::ClearLine),
        any::<bool>().prop_map(Effect::SetBreathGuide),
        Just(Effect::BeginCooling),
        Just(Effect::ShowAffirmation),
        prop::sample::select(TrackKey::ALL.to_vec()).prop_map(Effect::PlayTrack),
        Just(Effect::StopAudio),
        prop::sample::select(vec![Phase::Phase1, Phase::Phase2, Phase::Phase3, Phase::Phase4])
            .prop_map(Effect::EnterPhase),
    ]
}

/// Sorted entries, ties allowed, never containing the closing phase.
fn arb_timeline() -> impl Strategy<Value = Timeline> {
    prop::collection::vec((0u32..120, arb_effect()), 0..40).prop_map(|mut raw| {
        raw.sort_by_key(|(offset, _)| *offset);
        Timeline::from_entries(
            raw.into_iter()
                .map(|(offset_secs, effect)| TimelineEntry {
                    offset_secs,
                    effect,
                })
                .collect(),
        )
    })
}

fn scheduler_for(timeline: &Timeline) -> Scheduler {
    let template = timeline.clone();
    Scheduler::new(AudioDirector::new(Box::new(MemoryLoader::new())))
        .with_script(move || template.clone())
}

fn applied_indices(events: &[Event]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::EffectApplied { index, .. } => Some(*index),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn cursor_tracks_applied_prefix(timeline in arb_timeline(), n in 0u32..150) {
        let mut s = scheduler_for(&timeline);
        let mut events = s.start();
        for _ in 0..n {
            events.extend(s.tick());
        }

        let due = timeline.due_count(n);
        prop_assert_eq!(s.state().elapsed_secs, n);
        prop_assert_eq!(s.state().cursor, due);
        // Every due entry fired exactly once, in declaration order.
        prop_assert_eq!(applied_indices(&events), (0..due).collect::<Vec<_>>());
    }

    #[test]
    fn pausing_only_shifts_time(
        timeline in arb_timeline(),
        pause_at in 0u32..100,
        pause_for in 0u32..200,
        total in 0u32..150,
    ) {
        let mut plain = scheduler_for(&timeline);
        let mut plain_events = plain.start();
        for _ in 0..total {
            plain_events.extend(plain.tick());
        }

        let mut paused = scheduler_for(&timeline);
        let mut paused_events = paused.start();
        let mut ticks = 0;
        while ticks < total {
            if ticks == pause_at {
                paused.toggle_pause();
                for _ in 0..pause_for {
                    prop_assert!(paused.tick().is_empty());
                }
                paused.toggle_pause();
            }
            paused_events.extend(paused.tick());
            ticks += 1;
        }

        prop_assert_eq!(plain.state(), paused.state());
        prop_assert_eq!(applied_indices(&plain_events), applied_indices(&paused_events));
    }

    #[test]
    fn at_most_one_track_playing(timeline in arb_timeline(), n in 0u32..150) {
        let mut s = scheduler_for(&timeline);
        s.start();
        prop_assert!(s.audio().playing_count() <= 1);
        for _ in 0..n {
            s.tick();
            prop_assert!(s.audio().playing_count() <= 1);
        }
    }

    #[test]
    fn phase_never_moves_backwards(timeline in arb_timeline()) {
        let mut s = scheduler_for(&timeline);
        s.start();
        let mut last = s.state().phase;
        for _ in 0..130 {
            s.tick();
            prop_assert!(s.state().phase >= last);
            last = s.state().phase;
        }
    }

    #[test]
    fn restart_is_total(timeline in arb_timeline(), n in 0u32..150, mute in any::<bool>()) {
        let mut s = scheduler_for(&timeline);
        s.start();
        for _ in 0..n {
            s.tick();
        }
        if mute {
            s.toggle_mute();
        }
        s.restart();
        prop_assert_eq!(s.state(), &SessionState::default());
        prop_assert_eq!(s.audio().playing_count(), 0);
    }
}
