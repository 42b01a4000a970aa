use std::path::PathBuf;
use std::time::Duration;

use super::waveform::from_peaks;
use super::*;

fn entry(id: TrackId, title: &str) -> TrackEntry {
    TrackEntry {
        id,
        title: title.into(),
        source: "https://cdn.example.com/a.mp3".into(),
        bpm_label: Some("120 BPM".into()),
        duration_label: Some("3:00".into()),
        cover: None,
        waveform: Vec::new(),
    }
}

#[test]
fn format_clock_pads_seconds_only() {
    assert_eq!(format_clock(Duration::ZERO), "0:00");
    assert_eq!(format_clock(Duration::from_secs(7)), "0:07");
    assert_eq!(format_clock(Duration::from_millis(65_900)), "1:05");
    assert_eq!(format_clock(Duration::from_secs(754)), "12:34");
}

#[test]
fn audio_source_parses_uris_and_paths() {
    assert_eq!(
        AudioSource::parse("file:///tmp/a.mp3"),
        AudioSource::File(PathBuf::from("/tmp/a.mp3"))
    );
    assert_eq!(
        AudioSource::parse("music/a.ogg"),
        AudioSource::File(PathBuf::from("music/a.ogg"))
    );
    assert_eq!(
        AudioSource::parse("https://x/a.mp3"),
        AudioSource::Remote("https://x/a.mp3".into())
    );
    assert_eq!(AudioSource::parse("/tmp/a.mp3").uri(), "file:///tmp/a.mp3");
}

#[test]
fn waveform_resamples_to_bar_count_and_clamps() {
    let w = Waveform::from_values(&[0.5, 2.0]);
    assert_eq!(w.values().len(), BAR_COUNT);
    assert_eq!(w.get(0), 0.5);
    assert_eq!(w.get(BAR_COUNT / 2), 1.0);
    assert_eq!(w.get(BAR_COUNT - 1), 1.0);

    let long: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
    let w = Waveform::from_values(&long);
    assert_eq!(w.get(1), long[2]);

    assert_eq!(Waveform::from_values(&[]), Waveform::flat());
    assert_eq!(Waveform::from_values(&[f32::NAN]).get(3), 0.0);
}

#[test]
fn peaks_are_normalised_to_loudest_slice() {
    let mut peaks = vec![0.25f32; 64];
    peaks[10] = 0.5;
    let w = from_peaks(&peaks);
    assert_eq!(w.get(5), 1.0);
    assert_eq!(w.get(0), 0.5);
    assert!(w.values().iter().all(|v| (0.0..=1.0).contains(v)));

    assert_eq!(from_peaks(&[0.0; 8]), Waveform::flat());
    // Fewer peaks than bars still fills every bar.
    assert_eq!(from_peaks(&[0.2, 0.4]).get(BAR_COUNT - 1), 1.0);
}

#[test]
fn from_settings_keeps_order_and_drops_duplicate_ids() {
    let settings = CatalogSettings {
        tracks: vec![entry(3, "C"), entry(1, "A"), entry(3, "dup")],
        ..CatalogSettings::default()
    };
    let catalog = Catalog::from_settings(&settings);

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.at(0).unwrap().id, 3);
    assert_eq!(catalog.at(1).unwrap().title, "A");
    assert_eq!(catalog.position(1), Some(1));
    assert!(catalog.get(3).is_some());
    assert!(catalog.get(42).is_none());
}

#[test]
fn configured_waveform_and_labels_win() {
    let mut e = entry(1, "A");
    e.waveform = vec![0.9; 32];
    let catalog = Catalog::from_settings(&CatalogSettings {
        tracks: vec![e],
        ..CatalogSettings::default()
    });
    let track = catalog.get(1).unwrap();
    assert_eq!(track.waveform.get(7), 0.9);
    assert_eq!(track.bpm_label, "120 BPM");
    assert_eq!(track.duration_label, "3:00");
}

#[test]
fn missing_local_file_falls_back_to_defaults() {
    let mut e = entry(1, "A");
    e.source = "/definitely/not/here.mp3".into();
    e.duration_label = None;
    e.bpm_label = None;
    let catalog = Catalog::from_settings(&CatalogSettings {
        tracks: vec![e],
        ..CatalogSettings::default()
    });
    let track = catalog.get(1).unwrap();
    assert_eq!(track.duration_label, UNKNOWN_DURATION);
    assert_eq!(track.bpm_label, "");
    assert_eq!(track.waveform, Waveform::flat());
}

#[test]
fn scanned_tracks_follow_configured_ids() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("x.mp3"), b"not real").unwrap();

    let catalog = Catalog::from_settings(&CatalogSettings {
        tracks: vec![entry(7, "A")],
        scan_dir: Some(dir.path().to_path_buf()),
        ..CatalogSettings::default()
    });
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.at(1).unwrap().id, 8);
}
