//! Narration audio: track handles, loaders and the director that enforces
//! the one-track-at-a-time rule.

mod director;
mod file;
mod memory;
mod track;

pub use director::{AudioDirector, PlaybackOutcome, PlaybackRecord};
pub use file::FileLoader;
pub use memory::{MemoryLoader, MemoryTrack, PlaybackGate};
pub use track::{Track, TrackLoader};
