use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, ItemKey, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::CatalogSettings;
use crate::error::PlayerError;

use super::display::{UNKNOWN_DURATION, bpm_label_from_tag, format_clock};
use super::model::{AudioSource, Track, TrackId, Waveform};
use super::waveform;

fn is_audio_file(path: &Path, settings: &CatalogSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Tag-derived facts about a file; every field is optional.
#[derive(Debug, Default)]
pub(crate) struct FileTags {
    pub title: Option<String>,
    pub bpm_label: Option<String>,
    pub duration: Option<Duration>,
}

pub(crate) fn read_tags(path: &Path) -> FileTags {
    let mut tags = FileTags::default();

    let Ok(tagged) = lofty::read_from_path(path) else {
        return tags;
    };
    let duration = tagged.properties().duration();
    if !duration.is_zero() {
        tags.duration = Some(duration);
    }

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        tags.title = tag
            .title()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        tags.bpm_label = tag
            .items()
            .filter(|item| matches!(item.key(), ItemKey::Bpm | ItemKey::IntegerBpm))
            .find_map(|item| item.value().text().and_then(bpm_label_from_tag));
    }

    tags
}

/// Scan `dir` for audio files, assigning ids from `first_id` upwards.
///
/// Tracks are sorted by title, case-insensitively, before ids are assigned.
/// Files are only decoded for a waveform when `scan_waveforms` is set.
pub fn scan(dir: &Path, settings: &CatalogSettings, first_id: TrackId) -> Vec<Track> {
    scan_with(dir, settings, first_id, waveform::extract)
}

fn scan_with<F>(dir: &Path, settings: &CatalogSettings, first_id: TrackId, mut extract: F) -> Vec<Track>
where
    F: FnMut(&Path) -> Result<Waveform, PlayerError>,
{
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let tags = read_tags(path);
        let title = tags.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string()
        });

        let waveform = if settings.scan_waveforms {
            extract(path).unwrap_or_else(|e| {
                log::debug!("no waveform for {}: {e}", path.display());
                Waveform::flat()
            })
        } else {
            Waveform::flat()
        };

        tracks.push(Track {
            id: 0,
            title,
            bpm_label: tags.bpm_label.unwrap_or_default(),
            duration_label: tags
                .duration
                .map(format_clock)
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
            cover: None,
            source: AudioSource::File(path.to_path_buf()),
            waveform,
        });
    }

    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    for (offset, track) in tracks.iter_mut().enumerate() {
        track.id = first_id + offset as TrackId;
    }
    log::info!("scanned {} track(s) under {}", tracks.len(), dir.display());
    tracks
}
