//! Idle waveform extraction.
//!
//! Decodes a file once and reduces it to `BAR_COUNT` peak levels, normalised
//! to the loudest slice.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::Decoder;

use crate::error::PlayerError;

use super::model::{BAR_COUNT, Waveform};

/// Samples folded into one intermediate peak before the final reduction.
const CHUNK_SAMPLES: usize = 4096;

pub fn extract(path: &Path) -> Result<Waveform, PlayerError> {
    let file = File::open(path).map_err(|source| PlayerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| PlayerError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let mut chunk_peaks: Vec<f32> = Vec::new();
    let mut peak = 0.0f32;
    let mut n = 0usize;
    for sample in decoder {
        peak = peak.max(sample.abs());
        n += 1;
        if n == CHUNK_SAMPLES {
            chunk_peaks.push(peak);
            peak = 0.0;
            n = 0;
        }
    }
    if n > 0 {
        chunk_peaks.push(peak);
    }

    Ok(from_peaks(&chunk_peaks))
}

/// Reduce a run of peak levels to `BAR_COUNT` bars, scaled so the loudest is 1.0.
pub(crate) fn from_peaks(peaks: &[f32]) -> Waveform {
    if peaks.is_empty() {
        return Waveform::flat();
    }

    let mut bars = [0.0f32; BAR_COUNT];
    for (i, bar) in bars.iter_mut().enumerate() {
        let start = i * peaks.len() / BAR_COUNT;
        // Fewer peaks than bars: repeat the nearest one.
        let end = ((i + 1) * peaks.len() / BAR_COUNT).max(start + 1);
        *bar = peaks[start..end.min(peaks.len())]
            .iter()
            .copied()
            .fold(0.0, f32::max);
    }

    let loudest = bars.iter().copied().fold(0.0, f32::max);
    if loudest <= f32::EPSILON {
        return Waveform::flat();
    }
    Waveform::from_values(&bars.map(|b| b / loudest))
}
