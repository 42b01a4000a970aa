//! Log setup. The TUI owns the terminal, so records go to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;

use crate::config::LoggingSettings;

pub fn log_path(settings: &LoggingSettings) -> PathBuf {
    settings
        .file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("trackdeck.log"))
}

/// Initialize `env_logger` writing to the configured file. `RUST_LOG`
/// overrides `logging.level`.
pub fn init(settings: &LoggingSettings) -> io::Result<PathBuf> {
    let path = log_path(settings);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&settings.level))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_path_is_in_temp_dir() {
        let path = log_path(&LoggingSettings::default());
        assert_eq!(path, std::env::temp_dir().join("trackdeck.log"));

        let custom = LoggingSettings {
            file: Some(PathBuf::from("/var/tmp/td.log")),
            ..LoggingSettings::default()
        };
        assert_eq!(log_path(&custom), PathBuf::from("/var/tmp/td.log"));
    }
}
