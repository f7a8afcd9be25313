//! Async driver connecting the session clock to the scheduler.
//!
//! The player is the single writer of session state: commands from the
//! presentation layer and clock ticks are handled one at a time on one
//! task, and every resulting [`Event`] is forwarded to the subscriber.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::clock::{Clock, Tick};
use crate::error::CoreError;
use crate::events::Event;
use crate::session::Scheduler;

/// Controls available to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    TogglePause,
    Restart,
    ToggleMute,
    /// Emit a `StateSnapshot` event.
    Snapshot,
    Shutdown,
}

/// Cloneable sender side of a running player.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<Command>,
}

impl PlayerHandle {
    pub async fn send(&self, command: Command) -> Result<(), CoreError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CoreError::PlayerClosed)
    }

    pub async fn start(&self) -> Result<(), CoreError> {
        self.send(Command::Start).await
    }

    pub async fn toggle_pause(&self) -> Result<(), CoreError> {
        self.send(Command::TogglePause).await
    }

    pub async fn restart(&self) -> Result<(), CoreError> {
        self.send(Command::Restart).await
    }

    pub async fn toggle_mute(&self) -> Result<(), CoreError> {
        self.send(Command::ToggleMute).await
    }

    pub async fn shutdown(&self) -> Result<(), CoreError> {
        self.send(Command::Shutdown).await
    }
}

enum Step {
    Command(Option<Command>),
    Tick(Option<Tick>),
}

pub struct Player {
    scheduler: Scheduler,
    period: Duration,
    clock: Option<Clock>,
}

impl Player {
    pub fn new(scheduler: Scheduler, period: Duration) -> Self {
        Self {
            scheduler,
            period,
            clock: None,
        }
    }

    /// Run on a new task. The join handle yields the scheduler after shutdown.
    pub fn spawn(self) -> (PlayerHandle, mpsc::UnboundedReceiver<Event>, JoinHandle<Scheduler>) {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(command_rx, event_tx));
        (
            PlayerHandle {
                commands: command_tx,
            },
            event_rx,
            task,
        )
    }

    /// Process commands and ticks until `Shutdown` or every handle is dropped.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Scheduler {
        loop {
            let step = tokio::select! {
                biased;
                command = commands.recv() => Step::Command(command),
                tick = next_tick(&mut self.clock) => Step::Tick(tick),
            };

            match step {
                Step::Command(None) | Step::Command(Some(Command::Shutdown)) => break,
                Step::Command(Some(command)) => self.handle(command, &events),
                Step::Tick(Some(_)) => {
                    emit(&events, self.scheduler.tick());
                    if self.scheduler.is_closed() {
                        self.stop_clock();
                    }
                }
                Step::Tick(None) => self.clock = None,
            }
        }

        info!("player shutting down");
        self.stop_clock();
        self.scheduler.teardown();
        self.scheduler
    }

    fn handle(&mut self, command: Command, events: &mpsc::UnboundedSender<Event>) {
        debug!(?command, "player command");
        match command {
            Command::Start => {
                // Never leave a second clock running.
                self.stop_clock();
                emit(events, self.scheduler.start());
                if !self.scheduler.is_closed() {
                    self.clock = Some(Clock::start(self.period));
                }
            }
            Command::TogglePause => emit(events, self.scheduler.toggle_pause()),
            Command::Restart => {
                self.stop_clock();
                emit(events, self.scheduler.restart());
            }
            Command::ToggleMute => emit(events, self.scheduler.toggle_mute()),
            Command::Snapshot => emit(events, Some(self.scheduler.snapshot())),
            Command::Shutdown => {}
        }
    }

    fn stop_clock(&mut self) {
        if let Some(mut clock) = self.clock.take() {
            clock.stop();
        }
    }
}

async fn next_tick(clock: &mut Option<Clock>) -> Option<Tick> {
    match clock {
        Some(clock) => clock.tick().await,
        None => std::future::pending().await,
    }
}

fn emit(events: &mpsc::UnboundedSender<Event>, batch: impl IntoIterator<Item = Event>) {
    for event in batch {
        // A gone subscriber is not an error; the session keeps running.
        let _ = events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioDirector, MemoryLoader};
    use crate::clock::TICK_PERIOD;
    use crate::session::{Phase, SessionStatus};

    fn player() -> Player {
        let audio = AudioDirector::new(Box::new(MemoryLoader::new()));
        Player::new(Scheduler::new(audio), TICK_PERIOD)
    }

    async fn wait_for(
        events: &mut mpsc::UnboundedReceiver<Event>,
        pred: impl Fn(&Event) -> bool,
    ) -> Event {
        loop {
            let event = events.recv().await.expect("player stopped");
            if pred(&event) {
                return event;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_a_full_session_to_closing() {
        let (handle, mut events, task) = player().spawn();
        handle.start().await.unwrap();

        let closed = wait_for(&mut events, |e| matches!(e, Event::SessionClosed { .. })).await;
        assert!(matches!(closed, Event::SessionClosed { elapsed_secs: 330, .. }));

        // Further wall-clock time changes nothing.
        tokio::time::sleep(Duration::from_secs(30)).await;
        handle.send(Command::Snapshot).await.unwrap();
        let snapshot = wait_for(&mut events, |e| matches!(e, Event::StateSnapshot { .. })).await;
        match snapshot {
            Event::StateSnapshot { state, status, .. } => {
                assert_eq!(status, SessionStatus::Closing);
                assert_eq!(state.elapsed_secs, 330);
            }
            _ => unreachable!(),
        }

        handle.shutdown().await.unwrap();
        let scheduler = task.await.unwrap();
        assert_eq!(scheduler.audio().playing_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_ticks_are_suppressed() {
        let (handle, mut events, task) = player().spawn();
        handle.start().await.unwrap();
        wait_for(&mut events, |e| matches!(e, Event::Ticked { elapsed_secs: 44, .. })).await;

        handle.toggle_pause().await.unwrap();
        tokio::time::sleep(Duration::from_secs(100)).await;
        handle.send(Command::Snapshot).await.unwrap();
        let snapshot = wait_for(&mut events, |e| matches!(e, Event::StateSnapshot { .. })).await;
        match snapshot {
            Event::StateSnapshot { state, .. } => {
                assert!(state.paused);
                assert_eq!(state.elapsed_secs, 44);
                assert_eq!(state.active_line.as_deref(), Some("p1-l8"));
            }
            _ => unreachable!(),
        }

        handle.toggle_pause().await.unwrap();
        wait_for(&mut events, |e| matches!(e, Event::Ticked { elapsed_secs: 50, .. })).await;
        handle.shutdown().await.unwrap();
        let scheduler = task.await.unwrap();
        // Teardown resets the run.
        assert_eq!(scheduler.state().phase, Phase::Intro);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_replaces_the_clock() {
        let (handle, mut events, task) = player().spawn();
        handle.start().await.unwrap();
        wait_for(&mut events, |e| matches!(e, Event::Ticked { elapsed_secs: 10, .. })).await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        handle.start().await.unwrap();
        let reset = wait_for(&mut events, |e| matches!(e, Event::SessionReset { .. })).await;
        assert!(matches!(
            reset,
            Event::SessionReset {
                discarded_elapsed_secs: 10,
                ..
            }
        ));
        let restarted_at = tokio::time::Instant::now();

        for expected in 1..=10u32 {
            let tick = wait_for(&mut events, |e| matches!(e, Event::Ticked { .. })).await;
            assert!(
                matches!(tick, Event::Ticked { elapsed_secs, .. } if elapsed_secs == expected),
                "unexpected {tick:?}"
            );
            let since = restarted_at.elapsed();
            assert!(
                since >= Duration::from_secs(expected.into())
                    && since < Duration::from_secs(expected.into()) + Duration::from_millis(100),
                "tick {expected} arrived after {since:?}"
            );
        }

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn restart_stops_the_clock() {
        let (handle, mut events, task) = player().spawn();
        handle.start().await.unwrap();
        wait_for(&mut events, |e| matches!(e, Event::Ticked { elapsed_secs: 5, .. })).await;
        handle.restart().await.unwrap();
        wait_for(&mut events, |e| matches!(e, Event::SessionRestarted { .. })).await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        handle.send(Command::Snapshot).await.unwrap();
        let snapshot = wait_for(&mut events, |e| matches!(e, Event::StateSnapshot { .. })).await;
        match snapshot {
            Event::StateSnapshot { status, state, .. } => {
                assert_eq!(status, SessionStatus::Idle);
                assert_eq!(state.elapsed_secs, 0);
            }
            _ => unreachable!(),
        }
        drop(handle);
        task.await.unwrap();
    }
}
