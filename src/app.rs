//! Application module: the model behind the track list and its scrubbers.
//!
//! `app::model` holds the catalog, selection and playback state; the pure
//! bar/label/seek math lives in `app::scrubber`.

mod model;
mod scrubber;

pub use model::*;
pub use scrubber::*;

#[cfg(test)]
mod tests;
