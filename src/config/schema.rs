use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/trackdeck/config.toml` or `~/.config/trackdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TRACKDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub catalog: CatalogSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Analyzer resolution. Must be a power of two in `32..=32768`.
    pub fft_size: usize,
    /// Minimum time between two spectrum samples (milliseconds).
    pub update_interval_ms: u64,
    /// Sampling interval used instead of `update_interval_ms` on low-power hosts.
    pub low_power_interval_ms: u64,
    /// Treat this host as a low-power device.
    pub low_power: bool,
    /// Cadence of the animation-frame tick in the audio thread (milliseconds).
    pub frame_interval_ms: u64,
    /// Time smoothing applied to spectrum magnitudes, in `[0, 1)`.
    pub smoothing: f32,
    /// Level mapped to byte value 0.
    pub min_decibels: f32,
    /// Level mapped to byte value 255.
    pub max_decibels: f32,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            fft_size: 256,
            update_interval_ms: 50,
            low_power_interval_ms: 200,
            low_power: false,
            frame_interval_ms: 16,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            quit_fade_out_ms: 300,
        }
    }
}

impl AudioSettings {
    /// Effective sampling interval, honoring the low-power flag.
    pub fn sampling_interval_ms(&self) -> u64 {
        if self.low_power {
            self.low_power_interval_ms
        } else {
            self.update_interval_ms
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the controls footer is shown.
    pub show_controls: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ tracks, live ~ ".to_string(),
            show_controls: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { seek_seconds: 5 }
    }
}

/// One `[[catalog.tracks]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackEntry {
    pub id: u32,
    pub title: String,
    /// Either a `file://` URI or a plain path.
    pub source: String,
    #[serde(default)]
    pub bpm_label: Option<String>,
    #[serde(default)]
    pub duration_label: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    /// Idle magnitudes in `[0, 1]`; resampled to the bar count.
    #[serde(default)]
    pub waveform: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub tracks: Vec<TrackEntry>,
    /// Optional directory scanned for additional tracks.
    pub scan_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Decode configured tracks without a waveform to build one.
    pub extract_waveforms: bool,
    /// Also decode every scanned file at startup. Off by default: a large
    /// directory would delay the first frame.
    pub scan_waveforms: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            scan_dir: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            extract_waveforms: true,
            scan_waveforms: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter directive, e.g. `info` or `trackdeck=debug`.
    pub level: String,
    /// Log file; defaults to `trackdeck.log` in the system temp directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
