//! Track progress strip: bar heights, the played boundary, time labels and
//! pointer-to-time mapping.

use std::time::Duration;

use ratatui::layout::Rect;

use crate::audio::PlaybackInfo;
use crate::catalog::{BAR_COUNT, Track, TrackId, format_clock};

/// Minimum bar height while a track is playing, so silence never flatlines.
pub const PLAYING_FLOOR: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Height in `[0, 1]`.
    pub height: f32,
    pub played: bool,
}

/// Compute the bars of `track` from the latest playback snapshot.
///
/// Bar `i` is played when `i / BAR_COUNT` does not exceed the played
/// fraction, so the first bar lights as soon as the track is active.
pub fn bars(track: &Track, info: &PlaybackInfo) -> [Bar; BAR_COUNT] {
    let active = info.is_active(track.id);
    // Nothing counts as played until the duration is known.
    let timed = active && !info.duration.is_zero();
    let fraction = info.progress();
    let live = active && info.playing;

    std::array::from_fn(|i| {
        let played = timed && i as f64 / BAR_COUNT as f64 <= fraction;
        let height = if live {
            info.frame.get(i).max(PLAYING_FLOOR)
        } else {
            track.waveform.get(i)
        };
        Bar { height, played }
    })
}

/// Map a horizontal offset inside a strip of `width` columns to a track time.
/// Offsets outside the strip are clamped to its edges.
pub fn seek_time(offset: i32, width: u16, duration: Duration) -> Duration {
    if width == 0 {
        return Duration::ZERO;
    }
    let clamped = offset.clamp(0, i32::from(width));
    duration.mul_f64(f64::from(clamped) / f64::from(width))
}

pub fn elapsed_label(track: &Track, info: &PlaybackInfo) -> String {
    if info.is_active(track.id) {
        format_clock(info.elapsed)
    } else {
        format_clock(Duration::ZERO)
    }
}

/// Loaded duration of the active track, else the catalog label.
pub fn total_label(track: &Track, info: &PlaybackInfo) -> String {
    if info.is_active(track.id) && !info.duration.is_zero() {
        format_clock(info.duration)
    } else {
        track.duration_label.clone()
    }
}

/// Screen area of one track's bar strip, as last rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrubHit {
    pub track: TrackId,
    pub area: Rect,
}

impl ScrubHit {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.contains((column, row).into())
    }

    fn seek_for(&self, column: u16, duration: Duration) -> Duration {
        let offset = i32::from(column) - i32::from(self.area.x);
        seek_time(offset, self.area.width, duration)
    }
}

/// Where things landed on the last frame.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub scrubbers: Vec<ScrubHit>,
    pub cards: Vec<(TrackId, Rect)>,
}

impl HitMap {
    pub fn scrubber_at(&self, column: u16, row: u16) -> Option<ScrubHit> {
        self.scrubbers
            .iter()
            .copied()
            .find(|h| h.contains(column, row))
    }

    pub fn card_at(&self, column: u16, row: u16) -> Option<(TrackId, Rect)> {
        self.cards
            .iter()
            .copied()
            .find(|(_, area)| area.contains((column, row).into()))
    }

    /// Whether the card of `id` was on screen.
    pub fn shows(&self, id: TrackId) -> bool {
        self.cards.iter().any(|(card, _)| *card == id)
    }
}

/// Pointer drag on a scrubber.
///
/// Only the active track's strip can be grabbed, and only while it holds
/// media: an ended track has nothing to seek until it is played again. While grabbed, every pointer
/// move maps to a seek, even outside the strip; any button release ends it.
#[derive(Debug, Clone, Default)]
pub struct ScrubState {
    grabbed: Option<ScrubHit>,
}

impl ScrubState {
    pub fn is_scrubbing(&self) -> bool {
        self.grabbed.is_some()
    }

    /// Pointer down inside `hit`. Returns the seek to issue, if any.
    pub fn begin(&mut self, hit: ScrubHit, column: u16, info: &PlaybackInfo) -> Option<Duration> {
        if !info.is_active(hit.track) || !info.has_media {
            return None;
        }
        self.grabbed = Some(hit);
        Self::target(hit, column, info)
    }

    pub fn drag(&mut self, column: u16, info: &PlaybackInfo) -> Option<Duration> {
        let hit = self.grabbed?;
        if !info.is_active(hit.track) || !info.has_media {
            self.grabbed = None;
            return None;
        }
        Self::target(hit, column, info)
    }

    pub fn end(&mut self) {
        self.grabbed = None;
    }

    // Nothing to map onto until the duration is known.
    fn target(hit: ScrubHit, column: u16, info: &PlaybackInfo) -> Option<Duration> {
        if info.duration.is_zero() {
            return None;
        }
        Some(hit.seek_for(column, info.duration))
    }
}
