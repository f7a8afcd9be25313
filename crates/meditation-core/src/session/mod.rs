mod phase;
mod scheduler;
pub mod script;
mod state;
mod timeline;

pub use phase::{format_clock, Phase, TrackKey, SESSION_DURATION_SECS};
pub use scheduler::Scheduler;
pub use state::{PhaseDot, SessionState, SessionStatus};
pub use timeline::{Effect, Timeline, TimelineEntry};
