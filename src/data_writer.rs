use std::io;

use crate::encoder::{DecodeError, EncodeError};
use crate::feature::Feature;

/// Errors raised while writing training data.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Outcome(#[from] DecodeError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to serialize encoders: {0}")]
    Encoders(#[from] serde_json::Error),
}

/// Writes encoded training instances into a training directory.
///
/// One writer owns the encoders for a training run. [`finish`](Self::finish)
/// finalizes the encoders (freezing their id spaces), serializes them next
/// to the training data, and records which classifier builder can train and
/// package the directory. A writer that is dropped without `finish` leaves
/// the directory unusable for training, by design: a partial run must not
/// look complete.
pub trait DataWriter {
    type Outcome;

    /// Encodes and writes one training instance.
    fn write(&mut self, features: &[Feature], outcome: &Self::Outcome) -> Result<(), WriteError>;

    /// Flushes the training data and persists the encoders and manifest.
    fn finish(self) -> Result<(), WriteError>;
}

/// Formats a training-file value the way the wrapped tools write doubles:
/// integral values keep a trailing `.0`.
pub(crate) fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
