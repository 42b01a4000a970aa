//! Seams between the controller and whatever actually plays audio.
//!
//! The rodio implementation lives in `rodio_backend`; tests plug in a
//! counting fake.

use std::time::Duration;

use crate::catalog::Track;
use crate::error::PlayerError;

/// Notifications a media handle reports while it plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Playback position moved.
    TimeUpdate(Duration),
    /// Total length became known. Reported at most once.
    MetadataLoaded(Duration),
    /// Playback reached the end of the payload.
    Ended,
}

/// A playable media element bound to one track.
pub trait MediaHandle {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, to: Duration) -> Result<(), PlayerError>;
    fn current_time(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn set_volume(&mut self, volume: f32);
    /// Append pending notifications to `out`.
    fn poll_events(&mut self, out: &mut Vec<MediaEvent>);
    /// Drop pending notifications and stop producing new ones.
    fn detach(&mut self);
}

/// Frequency-domain view of the audio flowing through a media handle.
pub trait FrequencyAnalyzer {
    /// Number of bins written by `byte_frequency_data` (FFT size / 2).
    fn frequency_bin_count(&self) -> usize;
    /// Fill `out` with the current magnitude snapshot, `0..=255` per bin.
    fn byte_frequency_data(&mut self, out: &mut [u8]);
    /// Detach from the source. Later reads yield silence.
    fn disconnect(&mut self);
}

/// Factory for media handles and analyzers.
///
/// The backend owns the process-wide audio context shared by every track. It
/// is created lazily by the first `open` and disposed by `shutdown`.
pub trait AudioBackend {
    type Media: MediaHandle;
    type Analyzer: FrequencyAnalyzer;

    fn open(&mut self, track: &Track) -> Result<Self::Media, PlayerError>;
    fn attach_analyzer(
        &mut self,
        media: &mut Self::Media,
        fft_size: usize,
    ) -> Result<Self::Analyzer, PlayerError>;
    fn shutdown(&mut self);
}
