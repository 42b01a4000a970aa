//! rodio implementation of the media seams.
//!
//! The output stream is the shared audio context: opened on the first track
//! and closed by `shutdown`. Each media handle is a paused `Sink` fed through
//! a `TappedSource`, so the analyzer sees exactly what is played.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::catalog::{self, Track};
use crate::config::AudioSettings;
use crate::error::PlayerError;

use super::media::{AudioBackend, MediaEvent, MediaHandle};
use super::spectrum::SpectrumAnalyzer;
use super::tap::{SampleTap, TappedSource};

/// Turns polled sink state into media events.
#[derive(Debug, Default)]
struct EventGate {
    metadata_reported: bool,
    last_position: Duration,
    playing: bool,
    ended_reported: bool,
}

impl EventGate {
    fn play(&mut self) {
        self.playing = true;
        self.ended_reported = false;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    /// `empty` is true once the sink has consumed its whole source.
    fn poll(
        &mut self,
        duration: Option<Duration>,
        pos: Duration,
        empty: bool,
        out: &mut Vec<MediaEvent>,
    ) {
        if !self.metadata_reported {
            if let Some(d) = duration {
                out.push(MediaEvent::MetadataLoaded(d));
                self.metadata_reported = true;
            }
        }

        if pos != self.last_position {
            out.push(MediaEvent::TimeUpdate(pos));
            self.last_position = pos;
        }

        // A paused sink is never "ended", even if it holds nothing.
        if self.playing && !self.ended_reported && empty {
            self.ended_reported = true;
            self.playing = false;
            out.push(MediaEvent::Ended);
        }
    }
}

pub struct RodioMedia {
    sink: Sink,
    tap: SampleTap,
    duration: Option<Duration>,
    gate: EventGate,
    attached: bool,
}

impl MediaHandle for RodioMedia {
    fn play(&mut self) {
        self.sink.play();
        self.gate.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
        self.gate.pause();
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlayerError> {
        self.sink.try_seek(to)?;
        Ok(())
    }

    fn current_time(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn poll_events(&mut self, out: &mut Vec<MediaEvent>) {
        if !self.attached {
            return;
        }

        self.gate
            .poll(self.duration, self.sink.get_pos(), self.sink.empty(), out);
    }

    fn detach(&mut self) {
        self.attached = false;
    }
}

impl Drop for RodioMedia {
    fn drop(&mut self) {
        self.sink.stop();
    }
}

pub struct RodioBackend {
    context: Option<OutputStream>,
    settings: AudioSettings,
}

impl RodioBackend {
    pub fn new(settings: AudioSettings) -> Self {
        Self {
            context: None,
            settings,
        }
    }

    /// The shared output stream, opened on first use.
    fn context(&mut self) -> Result<&OutputStream, PlayerError> {
        let stream = match self.context.take() {
            Some(stream) => stream,
            None => {
                let mut stream = OutputStreamBuilder::open_default_stream()?;
                // rodio logs to stderr when the stream is dropped; the TUI owns stderr.
                stream.log_on_drop(false);
                log::info!("audio context opened");
                stream
            }
        };
        Ok(self.context.insert(stream))
    }
}

impl AudioBackend for RodioBackend {
    type Media = RodioMedia;
    type Analyzer = SpectrumAnalyzer;

    fn open(&mut self, track: &Track) -> Result<RodioMedia, PlayerError> {
        let path = track
            .source
            .local_path()
            .ok_or_else(|| PlayerError::UnsupportedSource(track.source.uri()))?;

        let file = File::open(path).map_err(|source| PlayerError::Open {
            path: path.clone(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|source| PlayerError::Decode {
            path: path.clone(),
            source,
        })?;
        let duration = decoder
            .total_duration()
            .or_else(|| catalog::probe_duration(path));

        let tap = SampleTap::new();
        let source = TappedSource::new(decoder, tap.clone());

        let sink = Sink::connect_new(self.context()?.mixer());
        sink.append(source);
        sink.pause();

        log::debug!("opened {} ({:?})", path.display(), duration);
        Ok(RodioMedia {
            sink,
            tap,
            duration,
            gate: EventGate::default(),
            attached: true,
        })
    }

    fn attach_analyzer(
        &mut self,
        media: &mut RodioMedia,
        fft_size: usize,
    ) -> Result<SpectrumAnalyzer, PlayerError> {
        media.tap.connect(fft_size);
        Ok(SpectrumAnalyzer::new(
            Some(media.tap.clone()),
            fft_size,
            &self.settings,
        ))
    }

    fn shutdown(&mut self) {
        if self.context.take().is_some() {
            log::info!("audio context closed");
        }
    }
}
