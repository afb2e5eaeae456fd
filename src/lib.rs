//! Feature encoding and model packaging for classifiers backed by external
//! machine-learning tools.
//!
//! Feature extraction produces named, typed [`Feature`]s; this crate turns
//! them into the numeric representation a wrapped backend expects, writes
//! the backend's training file, runs its trainer, and packages the trained
//! model together with the serialized encoders into a single archive. At
//! classification time the archive is loaded back, the encoders are frozen,
//! and queries run encode → native prediction → decode.
//!
//! # Writing training data
//!
//! ```no_run
//! use std::path::Path;
//! use featkit::{DataWriter, Feature, SvmLightDataWriter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut writer = SvmLightDataWriter::new(Path::new("training"))?;
//! writer.write(
//!     &[Feature::new("length", 4.0), Feature::new("pos", "NN")],
//!     &true,
//! )?;
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Encoding
//!
//! ```
//! use featkit::{Feature, VectorFeaturesEncoder};
//!
//! # fn main() -> Result<(), featkit::EncodeError> {
//! let mut encoder = VectorFeaturesEncoder::new(1);
//! let vector = encoder.encode_all(&[
//!     Feature::new("length", 4.0),
//!     Feature::new("pos", "NN"),
//! ])?;
//! assert_eq!(vector.get(1), 4.0);
//! assert_eq!(vector.get(2), 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! Training and packaging are driven either through the
//! [`ClassifierBuilder`] implementations or the `featkit-train` binary,
//! which reads the builder recorded in the training directory's manifest.
//! Everything here is synchronous and single-threaded; the only background
//! threads drain a trainer subprocess's output.

pub mod classifier;
pub mod data_writer;
pub mod encoder;
pub mod feature;
pub mod feature_vector;
pub mod liblinear;
pub mod maxent;
pub mod package;
pub mod svmlight;
pub mod training;

pub use classifier::{Classifier, ClassifyError, ScoredOutcome};
pub use data_writer::{DataWriter, WriteError};
pub use encoder::{
    BooleanOutcomeEncoder, DecodeError, EncodeError, IdentityOutcomeEncoder, NameIndexMap,
    NameValue, NamesFeaturesEncoder, OutcomeEncoder, StringToIntOutcomeEncoder,
    VectorFeaturesEncoder,
};
pub use feature::{create_name, escape, Feature, FeatureValue};
pub use feature_vector::{FeatureVector, InvalidVectorValue};
pub use liblinear::{LiblinearClassifier, LiblinearClassifierBuilder, LiblinearDataWriter};
pub use maxent::MaxentDataWriter;
pub use package::{
    load_classifier, train_and_package, ClassifierBuilder, LoadError, LoadedClassifier,
    PackageError, TrainingRunError,
};
pub use svmlight::{SvmLightClassifier, SvmLightClassifierBuilder, SvmLightDataWriter};
pub use training::TrainError;

pub fn init_logger() {
    env_logger::init();
}
