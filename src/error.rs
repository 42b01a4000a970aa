//! Error type shared by the catalog and the audio backend.
//!
//! Nothing here is surfaced to the user: the controller logs these and falls
//! back to an idle player.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no audio output device: {0}")]
    Output(#[from] rodio::StreamError),

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("unsupported audio source `{0}`")]
    UnsupportedSource(String),

    #[error("seek failed: {0}")]
    Seek(#[from] rodio::source::SeekError),
}
