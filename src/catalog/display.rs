use std::time::Duration;

/// Format a duration as `m:ss` (minutes unpadded, seconds zero-padded).
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Label used when a track's length is unknown.
pub const UNKNOWN_DURATION: &str = "-:--";

/// Normalise a BPM tag value into a display label (`"128 BPM"`).
pub fn bpm_label_from_tag(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f32>() {
        Ok(v) if v > 0.0 => Some(format!("{} BPM", v.round() as u32)),
        Ok(_) => None,
        Err(_) => Some(raw.to_string()),
    }
}
