use super::*;
use crate::audio::{FrequencyFrame, PlaybackInfo};
use crate::catalog::{AudioSource, BAR_COUNT, Catalog, Track, TrackId, Waveform};
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn t(id: TrackId, title: &str) -> Track {
    Track {
        id,
        title: title.into(),
        bpm_label: "98 BPM".into(),
        duration_label: "3:20".into(),
        cover: None,
        source: AudioSource::File(PathBuf::from(format!("/music/{id}.flac"))),
        waveform: Waveform::from_values(&[0.5]),
    }
}

fn app() -> App {
    App::new(Catalog::new(vec![t(10, "Alpha"), t(20, "Beta"), t(30, "Gamma")]))
}

fn playing(id: TrackId, elapsed: u64, duration: u64) -> PlaybackInfo {
    PlaybackInfo {
        active: Some(id),
        playing: true,
        has_media: true,
        elapsed: Duration::from_secs(elapsed),
        duration: Duration::from_secs(duration),
        frame: FrequencyFrame::ZERO,
    }
}

fn strip(track: TrackId) -> ScrubHit {
    ScrubHit {
        track,
        area: Rect::new(10, 5, 32, 2),
    }
}

#[test]
fn played_boundary_includes_the_bar_at_the_playhead() {
    let track = t(10, "Alpha");
    let info = playing(10, 60, 120);
    let played = bars(&track, &info).iter().filter(|b| b.played).count();
    assert_eq!(played, BAR_COUNT / 2 + 1);

    let b = bars(&track, &info);
    assert!(b[16].played);
    assert!(!b[17].played);

    // At 0:00 only the first bar is lit.
    let start = bars(&track, &playing(10, 0, 120));
    assert!(start[0].played);
    assert_eq!(start.iter().filter(|b| b.played).count(), 1);

    // At the end every bar is lit.
    assert!(bars(&track, &playing(10, 120, 120)).iter().all(|b| b.played));
}

#[test]
fn inactive_track_has_no_played_bars_and_shows_waveform() {
    let track = t(20, "Beta");
    let info = playing(10, 60, 120);
    for bar in bars(&track, &info) {
        assert!(!bar.played);
        assert_eq!(bar.height, 0.5);
    }
}

#[test]
fn playing_bars_never_drop_below_floor() {
    let track = t(10, "Alpha");
    let mut values = [0.0; BAR_COUNT];
    values[3] = 0.9;
    let info = PlaybackInfo {
        frame: bucket(&values),
        ..playing(10, 0, 120)
    };
    let b = bars(&track, &info);
    assert_eq!(b[0].height, PLAYING_FLOOR);
    assert!((b[3].height - 0.9).abs() < 0.01);

    // Paused: back to the static waveform.
    let paused = PlaybackInfo {
        playing: false,
        ..info
    };
    assert_eq!(bars(&track, &paused)[3].height, 0.5);
}

fn bucket(values: &[f32; BAR_COUNT]) -> FrequencyFrame {
    let raw: Vec<u8> = values.iter().map(|v| (v * 255.0).round() as u8).collect();
    crate::audio::bucket_average(&raw)
}

#[test]
fn unknown_duration_plays_nothing() {
    let track = t(10, "Alpha");
    let info = playing(10, 5, 0);
    assert!(bars(&track, &info).iter().all(|b| !b.played));
}

#[test]
fn seek_time_clamps_to_track_bounds() {
    let d = Duration::from_secs(200);
    assert_eq!(seek_time(16, 32, d), Duration::from_secs(100));
    assert_eq!(seek_time(500, 32, d), d);
    assert_eq!(seek_time(-7, 32, d), Duration::ZERO);
    assert_eq!(seek_time(4, 0, d), Duration::ZERO);
}

#[test]
fn time_labels_follow_activity() {
    let track = t(10, "Alpha");
    let other = t(20, "Beta");
    let info = playing(10, 75, 245);

    assert_eq!(elapsed_label(&track, &info), "1:15");
    assert_eq!(total_label(&track, &info), "4:05");
    assert_eq!(elapsed_label(&other, &info), "0:00");
    assert_eq!(total_label(&other, &info), "3:20");

    // Before metadata loads, the catalog label stands in.
    let loading = playing(10, 0, 0);
    assert_eq!(total_label(&track, &loading), "3:20");
}

#[test]
fn scrubbing_only_grabs_the_active_track() {
    let mut scrub = ScrubState::default();
    let info = playing(10, 0, 64);

    assert_eq!(scrub.begin(strip(20), 20, &info), None);
    assert!(!scrub.is_scrubbing());

    assert_eq!(
        scrub.begin(strip(10), 26, &info),
        Some(Duration::from_secs(32))
    );
    assert!(scrub.is_scrubbing());
}

#[test]
fn dragging_past_the_edges_clamps() {
    let mut scrub = ScrubState::default();
    let info = playing(10, 0, 64);
    scrub.begin(strip(10), 10, &info);

    assert_eq!(scrub.drag(200, &info), Some(Duration::from_secs(64)));
    assert_eq!(scrub.drag(0, &info), Some(Duration::ZERO));
    assert_eq!(scrub.drag(18, &info), Some(Duration::from_secs(16)));

    scrub.end();
    assert_eq!(scrub.drag(18, &info), None);
}

#[test]
fn ended_track_cannot_be_grabbed() {
    let mut scrub = ScrubState::default();
    let ended = PlaybackInfo {
        playing: false,
        has_media: false,
        ..playing(10, 0, 64)
    };
    assert_eq!(scrub.begin(strip(10), 26, &ended), None);
    assert!(!scrub.is_scrubbing());

    // A grab in progress lets go once the track ends.
    scrub.begin(strip(10), 26, &playing(10, 0, 64));
    assert_eq!(scrub.drag(20, &ended), None);
    assert!(!scrub.is_scrubbing());
}

#[test]
fn drag_stops_when_track_changes() {
    let mut scrub = ScrubState::default();
    scrub.begin(strip(10), 12, &playing(10, 0, 64));
    assert_eq!(scrub.drag(20, &playing(20, 0, 64)), None);
    assert!(!scrub.is_scrubbing());
}

#[test]
fn pointer_down_selects_card_and_seeks() {
    let mut app = app();
    app.hits = HitMap {
        scrubbers: vec![strip(20)],
        cards: vec![(20, Rect::new(8, 4, 40, 5))],
    };

    let info = playing(20, 0, 100);
    let action = app.pointer_down(26, 6, &info);
    assert_eq!(app.selected_id(), Some(20));
    assert_eq!(action, PointerAction::Seek(Duration::from_secs(50)));

    app.pointer_up();
    assert!(!app.scrub.is_scrubbing());

    // Same spot, but another track is active: select only.
    app.selected = 0;
    assert_eq!(
        app.pointer_down(26, 6, &playing(30, 0, 100)),
        PointerAction::None
    );
    assert_eq!(app.selected_id(), Some(20));
}

#[test]
fn clicking_card_title_toggles() {
    let mut app = app();
    app.hits = HitMap {
        scrubbers: vec![strip(30)],
        cards: vec![(30, Rect::new(8, 4, 40, 5))],
    };
    let idle = PlaybackInfo::default();

    assert_eq!(app.pointer_down(20, 4, &idle), PointerAction::Toggle(30));
    assert_eq!(app.selected_id(), Some(30));

    // Outside every card.
    assert_eq!(app.pointer_down(2, 1, &idle), PointerAction::None);
}

#[test]
fn selection_wraps() {
    let mut app = app();
    app.prev();
    assert_eq!(app.selected_id(), Some(30));
    app.next();
    assert_eq!(app.selected_id(), Some(10));
    app.last();
    assert_eq!(app.selected, 2);
    app.first();
    assert_eq!(app.selected, 0);
}

#[test]
fn adjacent_track_is_relative_to_active() {
    let mut app = app();
    let idle = PlaybackInfo::default();
    assert_eq!(app.adjacent_id(&idle, true), Some(20));
    assert_eq!(app.adjacent_id(&idle, false), Some(30));

    app.select_id(10);
    let info = playing(30, 0, 10);
    assert_eq!(app.adjacent_id(&info, true), Some(10));
    assert_eq!(app.adjacent_id(&info, false), Some(20));

    let empty = App::new(Catalog::default());
    assert_eq!(empty.adjacent_id(&idle, true), None);
}

#[test]
fn viewport_visibility_needs_focus_and_active_card() {
    let mut app = app();
    let info = playing(20, 0, 10);
    assert!(!app.viewport_visible(&info));

    app.hits.cards.push((20, Rect::new(0, 0, 10, 5)));
    assert!(app.viewport_visible(&info));

    app.focused = false;
    assert!(!app.viewport_visible(&info));

    app.focused = true;
    assert!(app.viewport_visible(&PlaybackInfo::default()));
}

#[test]
fn snapshot_reads_shared_handle() {
    let mut app = app();
    assert_eq!(app.snapshot().active, None);

    let handle = Arc::new(Mutex::new(playing(30, 1, 2)));
    app.set_playback_handle(handle.clone());
    let info = app.snapshot();
    assert_eq!(info.active, Some(30));

    app.sync_playback(&info);
    assert_eq!(app.playback, PlaybackState::Playing);

    handle.lock().unwrap().playing = false;
    app.sync_playback(&app.snapshot());
    assert_eq!(app.playback, PlaybackState::Paused);

    app.sync_playback(&PlaybackInfo::default());
    assert_eq!(app.playback, PlaybackState::Stopped);
}
