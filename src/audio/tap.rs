//! Source tap: copies the mono mix of a decoded stream into a bounded ring
//! so an analyzer can read the most recent samples.
//!
//! The tap sits inside the sink's source chain, so it runs on rodio's mixer
//! thread. It only ever `try_lock`s; a contended batch is dropped.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;
use rodio::source::SeekError;

/// Mono frames collected before the ring is locked.
const BATCH_FRAMES: usize = 256;

#[derive(Debug, Default)]
struct TapState {
    connected: bool,
    capacity: usize,
    samples: VecDeque<f32>,
}

/// Shared end of the tap, held by the media handle and the analyzer.
#[derive(Debug, Clone, Default)]
pub struct SampleTap(Arc<Mutex<TapState>>);

impl SampleTap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start keeping the latest `capacity` mono samples.
    pub fn connect(&self, capacity: usize) {
        if let Ok(mut s) = self.0.lock() {
            s.connected = true;
            s.capacity = capacity;
            s.samples.clear();
            s.samples.reserve(capacity);
        }
    }

    pub fn disconnect(&self) {
        if let Ok(mut s) = self.0.lock() {
            s.connected = false;
            s.samples.clear();
        }
    }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        self.0.lock().map(|s| s.connected).unwrap_or(false)
    }

    fn push(&self, batch: &[f32]) {
        let Ok(mut s) = self.0.try_lock() else {
            return;
        };
        if !s.connected || s.capacity == 0 {
            return;
        }
        for &x in batch {
            if s.samples.len() == s.capacity {
                s.samples.pop_front();
            }
            s.samples.push_back(x);
        }
    }

    /// Copy the newest samples into the tail of `out`, zero-filling the head.
    /// Returns false when the tap is disconnected.
    pub fn latest(&self, out: &mut [f32]) -> bool {
        out.fill(0.0);
        let Ok(s) = self.0.lock() else {
            return false;
        };
        if !s.connected {
            return false;
        }
        let n = s.samples.len().min(out.len());
        let offset = out.len() - n;
        for (dst, src) in out[offset..]
            .iter_mut()
            .zip(s.samples.iter().skip(s.samples.len() - n))
        {
            *dst = *src;
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn feed(&self, samples: &[f32]) {
        self.push(samples);
    }
}

/// A `Source` wrapper that forwards every sample unchanged and feeds the tap.
pub struct TappedSource<S> {
    inner: S,
    tap: SampleTap,
    channels: u16,
    channel_pos: u16,
    frame_sum: f32,
    batch: Vec<f32>,
}

impl<S: Source> TappedSource<S> {
    pub fn new(inner: S, tap: SampleTap) -> Self {
        let channels = u16::from(inner.channels()).max(1);
        Self {
            inner,
            tap,
            channels,
            channel_pos: 0,
            frame_sum: 0.0,
            batch: Vec::with_capacity(BATCH_FRAMES),
        }
    }
}

impl<S: Source> Iterator for TappedSource<S> {
    type Item = rodio::Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(sample) = self.inner.next() else {
            if !self.batch.is_empty() {
                self.tap.push(&self.batch);
                self.batch.clear();
            }
            return None;
        };

        self.frame_sum += sample;
        self.channel_pos += 1;
        if self.channel_pos >= self.channels {
            self.batch.push(self.frame_sum / f32::from(self.channels));
            self.frame_sum = 0.0;
            self.channel_pos = 0;
            if self.batch.len() >= BATCH_FRAMES {
                self.tap.push(&self.batch);
                self.batch.clear();
            }
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S: Source> Source for TappedSource<S> {
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> rodio::ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> rodio::SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.channel_pos = 0;
        self.frame_sum = 0.0;
        self.batch.clear();
        self.inner.try_seek(pos)
    }
}
