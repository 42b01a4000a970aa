use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `TRACKDECK__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TRACKDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let audio = &self.audio;
        if !audio.fft_size.is_power_of_two() || !(32..=32768).contains(&audio.fft_size) {
            return Err(format!(
                "audio.fft_size must be a power of two in 32..=32768, got {}",
                audio.fft_size
            ));
        }
        if audio.update_interval_ms == 0 || audio.low_power_interval_ms == 0 {
            return Err("audio sampling intervals must be >= 1ms".to_string());
        }
        if audio.frame_interval_ms == 0 {
            return Err("audio.frame_interval_ms must be >= 1".to_string());
        }
        if !(0.0..1.0).contains(&audio.smoothing) {
            return Err("audio.smoothing must be in [0, 1)".to_string());
        }
        if audio.min_decibels >= audio.max_decibels {
            return Err("audio.min_decibels must be below audio.max_decibels".to_string());
        }
        // Duplicate track ids are not fatal; the catalog drops the later entries.
        Ok(())
    }
}

/// Resolve the config path from `TRACKDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TRACKDECK_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/trackdeck/config.toml`
/// or `~/.config/trackdeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("trackdeck").join("config.toml"))
}
