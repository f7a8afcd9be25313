use clap::Args;
use meditation_core::{Config, Event, Scheduler};

use crate::render::Presenter;

#[derive(Args)]
pub struct SimulateArgs {
    /// Stop once the session clock reaches this many seconds
    #[arg(long, default_value = "330")]
    until: u32,
    /// Pause when the clock reads this many seconds
    #[arg(long)]
    pause_at: Option<u32>,
    /// Number of ticks to spend paused
    #[arg(long, default_value = "0", requires = "pause_at")]
    pause_for: u32,
    /// Toggle mute when the clock reads this many seconds
    #[arg(long)]
    mute_at: Option<u32>,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Runs the scheduler to `until` without waiting on a clock.
fn simulate(scheduler: &mut Scheduler, args: &SimulateArgs) -> Vec<Event> {
    let mut events = scheduler.start();
    let mut paused_once = false;
    let mut muted_once = false;

    while scheduler.state().elapsed_secs < args.until && !scheduler.is_closed() {
        let now = scheduler.state().elapsed_secs;
        if !muted_once && args.mute_at == Some(now) {
            muted_once = true;
            events.extend(scheduler.toggle_mute());
        }
        if !paused_once && args.pause_at == Some(now) {
            paused_once = true;
            events.extend(scheduler.pause());
            for _ in 0..args.pause_for {
                events.extend(scheduler.tick());
            }
            events.extend(scheduler.resume());
        }
        events.extend(scheduler.tick());
    }
    events
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut scheduler =
        Scheduler::new(config.audio.director()).with_muted(config.audio.start_muted);

    let events = simulate(&mut scheduler, &args);
    let snapshot = scheduler.snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        let mut presenter = Presenter::new(config.display);
        for event in events.iter().chain(std::iter::once(&snapshot)) {
            for line in presenter.render(event) {
                println!("{line}");
            }
        }
    }

    tracing::debug!(elapsed = scheduler.state().elapsed_secs, "simulation finished");
    scheduler.teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meditation_core::audio::{AudioDirector, MemoryLoader};
    use meditation_core::Phase;

    fn args(until: u32) -> SimulateArgs {
        SimulateArgs {
            until,
            pause_at: None,
            pause_for: 0,
            mute_at: None,
            json: true,
        }
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(AudioDirector::new(Box::new(MemoryLoader::new())))
    }

    #[test]
    fn stops_at_until() {
        let mut s = scheduler();
        simulate(&mut s, &args(75));
        assert_eq!(s.state().elapsed_secs, 75);
        assert_eq!(s.state().phase, Phase::Phase2);
    }

    #[test]
    fn pause_does_not_advance_the_clock() {
        let mut s = scheduler();
        let events = simulate(
            &mut s,
            &SimulateArgs {
                pause_at: Some(44),
                pause_for: 100,
                ..args(50)
            },
        );
        assert_eq!(s.state().elapsed_secs, 50);
        assert!(s.state().affirmation_visible);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::SessionPaused { elapsed_secs: 44, .. })));
    }

    #[test]
    fn mute_at_mutes_once() {
        let mut s = scheduler();
        simulate(
            &mut s,
            &SimulateArgs {
                mute_at: Some(10),
                ..args(90)
            },
        );
        assert!(s.state().muted);
        assert!(s.audio().is_muted());
    }

    #[test]
    fn runs_to_closing_by_default() {
        let mut s = scheduler();
        simulate(&mut s, &args(330));
        assert!(s.is_closed());
    }
}
