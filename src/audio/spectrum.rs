//! FFT analyzer node for the rodio backend.
//!
//! Produces byte magnitudes the way a browser analyser node does: Blackman
//! window, `|X[k]| / N`, exponential smoothing over time, then a linear map
//! of `[min_decibels, max_decibels]` onto `0..=255`.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::AudioSettings;

use super::media::FrequencyAnalyzer;
use super::tap::SampleTap;

pub struct SpectrumAnalyzer {
    tap: Option<SampleTap>,
    size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    samples: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
}

impl SpectrumAnalyzer {
    pub fn new(tap: Option<SampleTap>, fft_size: usize, settings: &AudioSettings) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let n = fft_size as f32;
        let window = (0..fft_size)
            .map(|i| {
                let x = i as f32 / n;
                0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
            })
            .collect();

        Self {
            tap,
            size: fft_size,
            fft,
            window,
            samples: vec![0.0; fft_size],
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            smoothing: settings.smoothing,
            min_decibels: settings.min_decibels,
            max_decibels: settings.max_decibels,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.size
    }

    /// Run one analysis pass over `samples` (FFT-size mono samples) into `out`.
    pub fn analyze(&mut self, samples: &[f32], out: &mut [u8]) {
        let n = self.fft_size();
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let range = self.max_decibels - self.min_decibels;
        for (k, level) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.buffer[k].norm() / n as f32;
            *level = self.smoothing * *level + (1.0 - self.smoothing) * magnitude;

            let Some(byte) = out.get_mut(k) else {
                continue;
            };
            if *level <= 0.0 {
                *byte = 0;
                continue;
            }
            let db = 20.0 * level.log10();
            let scaled = 255.0 * (db - self.min_decibels) / range;
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }
    }
}

impl FrequencyAnalyzer for SpectrumAnalyzer {
    fn frequency_bin_count(&self) -> usize {
        self.fft_size() / 2
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        let connected = match &self.tap {
            Some(tap) => tap.latest(&mut self.samples),
            None => false,
        };
        if !connected {
            out.fill(0);
            return;
        }
        let samples = std::mem::take(&mut self.samples);
        self.analyze(&samples, out);
        self.samples = samples;
    }

    fn disconnect(&mut self) {
        if let Some(tap) = self.tap.take() {
            tap.disconnect();
        }
        self.smoothed.fill(0.0);
    }
}
