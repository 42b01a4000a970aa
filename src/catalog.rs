//! The static track catalog.
//!
//! Tracks come from `[[catalog.tracks]]` config entries, optionally followed
//! by files discovered under `catalog.scan_dir`. The catalog never changes
//! after startup.

mod display;
mod model;
mod scan;
mod waveform;

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::config::{CatalogSettings, TrackEntry};

pub use display::{UNKNOWN_DURATION, format_clock};
pub use model::*;
pub use scan::scan;

impl Catalog {
    /// Build the catalog from configuration, then append scanned tracks.
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let mut tracks: Vec<Track> = Vec::new();
        let mut seen: HashSet<TrackId> = HashSet::new();

        for entry in &settings.tracks {
            if !seen.insert(entry.id) {
                log::warn!("catalog: dropping duplicate track id {}", entry.id);
                continue;
            }
            tracks.push(track_from_entry(entry, settings.extract_waveforms));
        }

        if let Some(dir) = &settings.scan_dir {
            let first_id = seen.iter().max().map_or(1, |max| max + 1);
            tracks.extend(scan(dir, settings, first_id));
        }

        Self::new(tracks)
    }
}

/// Length of an audio file according to its container metadata.
pub fn probe_duration(path: &Path) -> Option<Duration> {
    scan::read_tags(path).duration
}

fn track_from_entry(entry: &TrackEntry, extract_waveforms: bool) -> Track {
    let source = AudioSource::parse(&entry.source);
    let local = source.local_path();

    let tags = match (local, &entry.duration_label, &entry.bpm_label) {
        (Some(path), None, _) | (Some(path), _, None) => scan::read_tags(path),
        _ => scan::FileTags::default(),
    };

    let waveform = if !entry.waveform.is_empty() {
        Waveform::from_values(&entry.waveform)
    } else if let (true, Some(path)) = (extract_waveforms, local) {
        waveform::extract(path).unwrap_or_else(|e| {
            log::debug!("catalog: no waveform for track {}: {e}", entry.id);
            Waveform::flat()
        })
    } else {
        Waveform::flat()
    };

    Track {
        id: entry.id,
        title: entry.title.clone(),
        bpm_label: entry
            .bpm_label
            .clone()
            .or(tags.bpm_label)
            .unwrap_or_default(),
        duration_label: entry
            .duration_label
            .clone()
            .or_else(|| tags.duration.map(format_clock))
            .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
        cover: entry.cover.clone(),
        source,
        waveform,
    }
}

#[cfg(test)]
mod tests;
