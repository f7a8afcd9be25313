use crate::error::AudioError;
use crate::session::TrackKey;

/// A loaded narration track.
///
/// Handles are opaque to the rest of the crate: only the audio director
/// holds them, and it drives them through this interface.
pub trait Track: Send {
    fn key(&self) -> TrackKey;

    /// Size of the resident encoded asset.
    fn len_bytes(&self) -> usize;

    /// Seek back to the start.
    fn rewind(&mut self);

    fn set_muted(&mut self, muted: bool);

    fn is_muted(&self) -> bool;

    /// Begin or continue playback from the current position.
    fn play(&mut self) -> Result<(), AudioError>;

    /// Halt playback, keeping the position.
    fn pause(&mut self);

    fn is_playing(&self) -> bool;
}

/// Source of narration tracks. Called at most once per key per session.
pub trait TrackLoader: Send {
    fn load(&mut self, key: TrackKey) -> Result<Box<dyn Track>, AudioError>;
}
