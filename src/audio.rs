//! Audio subsystem: the track player controller, its analyzer plumbing and
//! the thread that drives it.
//!
//! The UI talks to it through `AudioPlayer` (commands in) and a shared
//! `PlaybackHandle` (read-only snapshot out).

mod analyzer;
mod controller;
mod media;
mod player;
mod rodio_backend;
mod sampler;
mod spectrum;
mod tap;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::*;

#[cfg(test)]
pub use analyzer::{FrequencyFrame, bucket_average};
