//! Application model types: `App` and `PlaybackState`.
//!
//! The `App` struct holds the catalog, the selected card, the last playback
//! snapshot and the pointer state used by the UI and runtime.

use std::time::Duration;

use crate::audio::{PlaybackHandle, PlaybackInfo};
use crate::catalog::{Catalog, Track, TrackId};

use super::scrubber::{HitMap, ScrubState};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn from_info(info: &PlaybackInfo) -> Self {
        match (info.active, info.playing) {
            (None, _) => Self::Stopped,
            (Some(_), true) => Self::Playing,
            (Some(_), false) => Self::Paused,
        }
    }
}

/// What a left click asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    None,
    Toggle(TrackId),
    Seek(Duration),
}

/// The main application model.
pub struct App {
    pub catalog: Catalog,
    pub selected: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,
    pub scrub: ScrubState,
    /// Terminal focus, from crossterm focus events.
    pub focused: bool,
    pub metadata_window: bool,
    pub hits: HitMap,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selected: 0,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            scrub: ScrubState::default(),
            focused: true,
            metadata_window: false,
            hits: HitMap::default(),
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Latest published playback snapshot; idle when no handle is attached.
    pub fn snapshot(&self) -> PlaybackInfo {
        self.playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|info| info.clone()))
            .unwrap_or_default()
    }

    /// Refresh `playback` from `info`.
    pub fn sync_playback(&mut self, info: &PlaybackInfo) {
        self.playback = PlaybackState::from_info(info);
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.catalog.at(self.selected)
    }

    pub fn selected_id(&self) -> Option<TrackId> {
        self.selected_track().map(|t| t.id)
    }

    /// Move the cursor to the track with `id`. Unknown ids leave it alone.
    pub fn select_id(&mut self, id: TrackId) {
        if let Some(pos) = self.catalog.position(id) {
            self.selected = pos;
        }
    }

    /// Move selection to the next track, wrapping around.
    pub fn next(&mut self) {
        let len = self.catalog.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous track, wrapping around.
    pub fn prev(&mut self) {
        let len = self.catalog.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.catalog.len().saturating_sub(1);
    }

    /// Track the desktop Next/Previous buttons should start: relative to the
    /// active track, or to the cursor when nothing is active.
    pub fn adjacent_id(&self, info: &PlaybackInfo, forward: bool) -> Option<TrackId> {
        let len = self.catalog.len();
        if len == 0 {
            return None;
        }
        let from = info
            .active
            .and_then(|id| self.catalog.position(id))
            .unwrap_or(self.selected);
        let to = if forward {
            (from + 1) % len
        } else {
            (from + len - 1) % len
        };
        self.catalog.at(to).map(|t| t.id)
    }

    /// Whether the player is on screen: the terminal has focus and the active
    /// card, if any, was drawn on the last frame.
    pub fn viewport_visible(&self, info: &PlaybackInfo) -> bool {
        self.focused && info.active.is_none_or(|id| self.hits.shows(id))
    }

    /// Left button pressed. Selects the card under the pointer; the title row
    /// toggles playback and the active track's strip starts a scrub.
    pub fn pointer_down(&mut self, column: u16, row: u16, info: &PlaybackInfo) -> PointerAction {
        let Some((id, area)) = self.hits.card_at(column, row) else {
            return PointerAction::None;
        };
        self.select_id(id);

        if let Some(hit) = self.hits.scrubber_at(column, row) {
            return match self.scrub.begin(hit, column, info) {
                Some(to) => PointerAction::Seek(to),
                None => PointerAction::None,
            };
        }
        if row == area.y {
            return PointerAction::Toggle(id);
        }
        PointerAction::None
    }

    pub fn pointer_drag(&mut self, column: u16, info: &PlaybackInfo) -> Option<Duration> {
        self.scrub.drag(column, info)
    }

    pub fn pointer_up(&mut self) {
        self.scrub.end();
    }
}
