//! Spectrum frames: the fixed-size, normalised view of analyzer output that
//! the scrubber draws.

use crate::catalog::BAR_COUNT;

/// One bar height per scrubber bar, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyFrame([f32; BAR_COUNT]);

impl FrequencyFrame {
    pub const ZERO: Self = Self([0.0; BAR_COUNT]);

    pub fn get(&self, i: usize) -> f32 {
        self.0.get(i).copied().unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn values(&self) -> &[f32; BAR_COUNT] {
        &self.0
    }

    #[cfg(test)]
    pub fn is_silent(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }
}

impl Default for FrequencyFrame {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Reduce raw analyzer bytes to `BAR_COUNT` bars by averaging contiguous bins.
///
/// The bucket width is `raw.len() / BAR_COUNT` (at least one bin). Bins past
/// `BAR_COUNT * step` are ignored; buckets starting past the end read as 0.
pub fn bucket_average(raw: &[u8]) -> FrequencyFrame {
    let step = (raw.len() / BAR_COUNT).max(1);
    let mut bars = [0.0f32; BAR_COUNT];

    for (i, bar) in bars.iter_mut().enumerate() {
        let start = i * step;
        if start >= raw.len() {
            break;
        }
        let end = (start + step).min(raw.len());
        let bucket = &raw[start..end];
        let sum: u32 = bucket.iter().map(|&b| u32::from(b)).sum();
        *bar = sum as f32 / bucket.len() as f32 / 255.0;
    }

    FrequencyFrame(bars)
}
