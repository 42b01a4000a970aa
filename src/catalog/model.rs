use std::path::PathBuf;

/// Number of bars in every waveform, spectrum frame and scrubber strip.
pub const BAR_COUNT: usize = 32;

pub type TrackId = u32;

/// Idle bar heights for a track, one per bar, each in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform([f32; BAR_COUNT]);

impl Waveform {
    /// Height used for every bar when nothing better is known.
    pub const FLAT_LEVEL: f32 = 0.3;

    pub fn flat() -> Self {
        Self([Self::FLAT_LEVEL; BAR_COUNT])
    }

    /// Resample `values` onto `BAR_COUNT` bars (nearest neighbour) and clamp into `[0, 1]`.
    pub fn from_values(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self::flat();
        }

        let mut bars = [0.0; BAR_COUNT];
        for (i, bar) in bars.iter_mut().enumerate() {
            let src = i * values.len() / BAR_COUNT;
            let v = values[src];
            *bar = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        }
        Self(bars)
    }

    pub fn get(&self, i: usize) -> f32 {
        self.0.get(i).copied().unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn values(&self) -> &[f32; BAR_COUNT] {
        &self.0
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Self::flat()
    }
}

/// Where a track's audio payload lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    File(PathBuf),
    /// Any non-`file` URI. Kept so the catalog can list it; opening it fails.
    Remote(String),
}

impl AudioSource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(path) = raw.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else if raw.contains("://") {
            Self::Remote(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }

    pub fn local_path(&self) -> Option<&PathBuf> {
        match self {
            Self::File(p) => Some(p),
            Self::Remote(_) => None,
        }
    }

    pub fn uri(&self) -> String {
        match self {
            Self::File(p) => format!("file://{}", p.display()),
            Self::Remote(uri) => uri.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub bpm_label: String,
    pub duration_label: String,
    pub cover: Option<String>,
    pub source: AudioSource,
    pub waveform: Waveform,
}

/// The ordered, read-only list of tracks shown by the player.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Position of `id` in display order.
    pub fn position(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
