//! Track player controller.
//!
//! Owns the playback session and the media + analyzer pair of the active
//! track. At most one pair is alive at any time: switching tracks always
//! drops the old pair before the backend is asked for a new one.

use std::thread;
use std::time::{Duration, Instant};

use crate::catalog::{Catalog, TrackId};
use crate::config::AudioSettings;

use super::analyzer::{FrequencyFrame, bucket_average};
use super::media::{AudioBackend, FrequencyAnalyzer, MediaEvent, MediaHandle};
use super::sampler::FrequencySampler;
use super::types::PlaybackInfo;

/// Mutable playback state. Other components only see it through `PlaybackInfo`.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    pub active_track: Option<TrackId>,
    pub is_playing: bool,
    pub current_time: Duration,
    pub duration: Duration,
    pub frame: FrequencyFrame,
}

impl PlaybackSession {
    fn clamp_time(&self, t: Duration) -> Duration {
        if self.duration.is_zero() {
            t
        } else {
            t.min(self.duration)
        }
    }
}

/// The media handle and analyzer of one track, built and released together.
struct PlaybackResources<M: MediaHandle, A: FrequencyAnalyzer> {
    track: TrackId,
    media: M,
    analyzer: A,
}

impl<M: MediaHandle, A: FrequencyAnalyzer> Drop for PlaybackResources<M, A> {
    fn drop(&mut self) {
        self.media.detach();
        self.media.pause();
        self.analyzer.disconnect();
        log::debug!("released playback resources for track {}", self.track);
    }
}

pub struct TrackPlayerController<B: AudioBackend> {
    backend: B,
    catalog: Catalog,
    fft_size: usize,
    session: PlaybackSession,
    resources: Option<PlaybackResources<B::Media, B::Analyzer>>,
    sampler: FrequencySampler,
    visible: bool,
    events: Vec<MediaEvent>,
    bins: Vec<u8>,
}

impl<B: AudioBackend> TrackPlayerController<B> {
    pub fn new(backend: B, catalog: Catalog, settings: &AudioSettings) -> Self {
        Self {
            backend,
            catalog,
            fft_size: settings.fft_size,
            session: PlaybackSession::default(),
            resources: None,
            sampler: FrequencySampler::new(Duration::from_millis(settings.sampling_interval_ms())),
            visible: true,
            events: Vec::new(),
            bins: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn snapshot(&self) -> PlaybackInfo {
        PlaybackInfo {
            active: self.session.active_track,
            playing: self.session.is_playing,
            has_media: self.resources.is_some(),
            elapsed: self.session.current_time,
            duration: self.session.duration,
            frame: self.session.frame,
        }
    }

    /// Play or pause `id`, switching to it when another track is active.
    /// Unknown ids are ignored.
    pub fn toggle_play(&mut self, id: TrackId) {
        if self.catalog.get(id).is_none() {
            log::debug!("toggle_play: unknown track {id}");
            return;
        }

        let is_current = self.session.active_track == Some(id) && self.resources.is_some();
        if is_current {
            self.flip_pause();
        } else {
            self.switch_to(id);
        }
    }

    fn flip_pause(&mut self) {
        let Some(res) = self.resources.as_mut() else {
            return;
        };
        if self.session.is_playing {
            res.media.pause();
            self.session.current_time = self.session.clamp_time(res.media.current_time());
            self.sampler.cancel();
            self.session.frame = FrequencyFrame::ZERO;
            self.session.is_playing = false;
        } else {
            res.media.play();
            self.sampler.start();
            self.session.is_playing = true;
        }
    }

    /// Cancel sampling, then drop the media + analyzer pair.
    fn release(&mut self) {
        self.sampler.cancel();
        self.resources = None;
    }

    fn switch_to(&mut self, id: TrackId) {
        self.release();
        self.session = PlaybackSession::default();

        let Some(track) = self.catalog.get(id) else {
            return;
        };

        let built = self.backend.open(track).and_then(|mut media| {
            let analyzer = self.backend.attach_analyzer(&mut media, self.fft_size)?;
            Ok(PlaybackResources {
                track: id,
                media,
                analyzer,
            })
        });

        match built {
            Ok(mut res) => {
                if let Some(d) = res.media.duration() {
                    self.session.duration = d;
                }
                res.media.play();
                self.resources = Some(res);
                self.session.active_track = Some(id);
                self.session.is_playing = true;
                self.sampler.start();
                log::info!("playing track {id} ({})", track.title);
            }
            Err(e) => log::warn!("cannot play track {id}: {e}"),
        }
    }

    /// Seek the active track, clamped to `[0, duration]`.
    pub fn seek(&mut self, to: Duration) {
        let target = self.session.clamp_time(to);
        let Some(res) = self.resources.as_mut() else {
            return;
        };
        match res.media.seek(target) {
            Ok(()) => {
                self.session.current_time = target;
                log::debug!("seek track {} to {:?}", res.track, target);
            }
            Err(e) => log::warn!("seek failed on track {}: {e}", res.track),
        }
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_secs: i64) {
        let secs = (self.session.current_time.as_secs_f64() + delta_secs as f64).max(0.0);
        self.seek(Duration::from_secs_f64(secs));
    }

    /// Whether the player is on screen. Hidden players pin the frame to zero.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.session.frame = FrequencyFrame::ZERO;
        }
    }

    /// One animation frame: deliver media notifications, then sample if due.
    pub fn tick(&mut self, now: Instant) {
        self.drain_events();

        if !self.sampler.is_running() {
            return;
        }
        if !self.visible {
            self.session.frame = FrequencyFrame::ZERO;
            return;
        }
        if !self.sampler.due(now) {
            return;
        }
        let Some(res) = self.resources.as_mut() else {
            self.sampler.cancel();
            self.session.frame = FrequencyFrame::ZERO;
            return;
        };

        self.bins.resize(res.analyzer.frequency_bin_count(), 0);
        res.analyzer.byte_frequency_data(&mut self.bins);
        self.session.frame = bucket_average(&self.bins);
    }

    fn drain_events(&mut self) {
        let Some(res) = self.resources.as_mut() else {
            return;
        };
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        res.media.poll_events(&mut events);

        let mut ended = false;
        for event in events.drain(..) {
            match event {
                MediaEvent::MetadataLoaded(d) => {
                    self.session.duration = d;
                    self.session.current_time = self.session.clamp_time(self.session.current_time);
                }
                MediaEvent::TimeUpdate(t) => {
                    self.session.current_time = self.session.clamp_time(t);
                }
                MediaEvent::Ended => ended = true,
            }
        }
        self.events = events;

        if ended {
            self.finish_track();
        }
    }

    /// End of track: stop and rewind, keep the track selected. No auto-advance.
    fn finish_track(&mut self) {
        self.session.is_playing = false;
        self.session.current_time = Duration::ZERO;
        self.session.frame = FrequencyFrame::ZERO;
        self.release();
        if let Some(id) = self.session.active_track {
            log::info!("track {id} ended");
        }
    }

    /// Fade out the active track, release it and close the audio context.
    pub fn shutdown(&mut self, fade_out: Duration) {
        if let Some(res) = self.resources.as_mut() {
            if self.session.is_playing && !fade_out.is_zero() {
                fade_out_media(&mut res.media, fade_out);
            }
        }
        self.release();
        self.session.is_playing = false;
        self.session.frame = FrequencyFrame::ZERO;
        self.backend.shutdown();
    }
}

fn fade_out_media<M: MediaHandle>(media: &mut M, fade_out: Duration) {
    let steps: u32 = 20;
    let step = (fade_out / steps).max(Duration::from_millis(1));
    for i in 1..=steps {
        media.set_volume(1.0 - i as f32 / steps as f32);
        thread::sleep(step);
    }
    media.set_volume(0.0);
}
