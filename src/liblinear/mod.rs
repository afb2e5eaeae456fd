//! LIBLINEAR backend: multiclass string-outcome classification over sparse
//! vectors.
//!
//! The data writer produces `<label> index:value ...` training lines for
//! the external `train` binary; the model file is parsed and evaluated
//! in-process.

mod classifier;
mod data_writer;
mod model;

pub use classifier::{LiblinearClassifier, LiblinearClassifierBuilder};
pub use data_writer::LiblinearDataWriter;
pub use model::{LinearModel, ModelParseError};

use serde::{Deserialize, Serialize};

use crate::encoder::{StringToIntOutcomeEncoder, VectorFeaturesEncoder};

/// Training data file written into the training directory.
pub const TRAINING_DATA_FILE: &str = "training-data.liblinear";

/// LIBLINEAR feature indices are 1-based.
pub(crate) const FIRST_FEATURE_INDEX: usize = 1;

/// The encoder pair serialized into `encoders.json`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Encoders {
    pub features: VectorFeaturesEncoder,
    pub outcomes: StringToIntOutcomeEncoder,
}
