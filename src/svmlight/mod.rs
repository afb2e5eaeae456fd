//! SVM-light backend: boolean-outcome classification over sparse vectors.
//!
//! The data writer produces `±1 index:value ...` training lines for the
//! external `svm_learn` binary; the model it writes back is parsed and
//! evaluated in-process, so classification needs no subprocess.

mod classifier;
mod data_writer;
mod model;

pub use classifier::{SvmLightClassifier, SvmLightClassifierBuilder};
pub use data_writer::SvmLightDataWriter;
pub use model::{Kernel, ModelParseError, SupportVector, SvmLightModel};

use serde::{Deserialize, Serialize};

use crate::encoder::{BooleanOutcomeEncoder, VectorFeaturesEncoder};

/// Training data file written into the training directory.
pub const TRAINING_DATA_FILE: &str = "training-data.svmlight";

/// SVM-light reserves feature index 0.
pub(crate) const FIRST_FEATURE_INDEX: usize = 1;

/// The encoder pair serialized into `encoders.json`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Encoders {
    pub features: VectorFeaturesEncoder,
    pub outcomes: BooleanOutcomeEncoder,
}
