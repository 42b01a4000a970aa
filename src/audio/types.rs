//! Audio-related small types and handles.
//!
//! This module defines the commands accepted by the audio thread and the
//! read-only playback snapshot it publishes for the UI.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::TrackId;

use super::analyzer::FrequencyFrame;

#[derive(Debug)]
pub enum AudioCmd {
    /// Play/pause the given track, switching to it if another one is active.
    TogglePlay(TrackId),
    /// Seek the active track to an absolute position.
    Seek(Duration),
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    /// Whether the player section is currently on screen.
    SetVisible(bool),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Track bound to the player, if any.
    pub active: Option<TrackId>,
    /// Whether playback is currently running.
    pub playing: bool,
    /// Whether the active track still holds a media handle. False after the
    /// track ends, until it is played again; seeks are ignored meanwhile.
    pub has_media: bool,
    /// Playback position, within `[0, duration]` once `duration` is known.
    pub elapsed: Duration,
    /// Total length of the active track; zero until metadata loads.
    pub duration: Duration,
    /// Latest spectrum frame; all-zero when paused or hidden.
    pub frame: FrequencyFrame,
}

impl PlaybackInfo {
    /// Fraction of the track played, in `[0, 1]`. Zero while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_active(&self, id: TrackId) -> bool {
        self.active == Some(id)
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
