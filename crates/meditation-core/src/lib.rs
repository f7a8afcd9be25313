//! # Meditation Core Library
//!
//! This library provides the engine behind the guided meditation player.
//! Rendering lives elsewhere: a presentation layer (the bundled CLI, or any
//! GUI) issues the four user commands and re-renders from the events and
//! state this crate produces.
//!
//! ## Architecture
//!
//! - **Timeline**: The session script as plain data, rebuilt on every start
//! - **Scheduler**: A tick-driven state machine that applies due timeline
//!   effects exactly once, in order
//! - **Clock**: A tokio interval task producing one tick per second
//! - **Audio Director**: Narration track cache enforcing one playing track
//! - **Player**: Async driver wiring the clock, scheduler and subscribers
//!
//! ## Key Components
//!
//! - [`Scheduler`]: Core session state machine
//! - [`Player`]: Single-writer async runtime for a session
//! - [`AudioDirector`]: Narration playback
//! - [`Config`]: Player configuration management

pub mod audio;
pub mod clock;
pub mod error;
pub mod events;
pub mod player;
pub mod session;
pub mod storage;

pub use audio::{AudioDirector, FileLoader, MemoryLoader, PlaybackGate, PlaybackOutcome};
pub use clock::{Clock, Tick, TICK_PERIOD};
pub use error::{AudioError, ConfigError, CoreError, ScriptError};
pub use events::Event;
pub use player::{Command, Player, PlayerHandle};
pub use session::{
    Effect, Phase, Scheduler, SessionState, SessionStatus, Timeline, TimelineEntry, TrackKey,
};
pub use storage::Config;
