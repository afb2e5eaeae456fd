//! Model container packaging and loading.
//!
//! A trained classifier lives on disk as a single zip archive holding the
//! backend-native model bytes, the serialized encoders, and a manifest
//! naming the concrete builder that knows how to put the pieces back
//! together. The builder moves a training directory through its three
//! states: untrained (training data and manifest written by a data
//! writer), trained (backend model file present), packaged (archive
//! written).

mod archive;
mod manifest;
mod registry;

pub use archive::{write_archive, ModelArchive, ARCHIVE_FILE, ENCODERS_ENTRY, MODEL_ENTRY};
pub use manifest::{Manifest, ManifestError, BUILDER_ATTRIBUTE, MANIFEST_FILE};
pub use registry::{load_classifier, train_and_package, LoadedClassifier};

use std::io;
use std::path::{Path, PathBuf};

use crate::training::TrainError;

/// Errors raised while packaging a trained classifier.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// The backend never produced its model file; training was partial.
    #[error("expected model file is missing: {0}")]
    MissingFile(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Errors raised while loading a packaged classifier.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("archive entry not found: {0}")]
    MissingEntry(String),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("unknown classifier builder: {0}")]
    UnknownBuilder(String),
    #[error("model file could not be parsed: {0}")]
    Model(String),
    #[error("encoder deserialization failed: {0}")]
    Encoders(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Errors raised by the manifest-driven train-then-package entry point.
#[derive(Debug, thiserror::Error)]
pub enum TrainingRunError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("unknown classifier builder: {0}")]
    UnknownBuilder(String),
    #[error(transparent)]
    Train(#[from] TrainError),
    #[error(transparent)]
    Package(#[from] PackageError),
}

/// Trains, packages and reloads one concrete classifier type.
///
/// Builders are stateless: everything they need is read from the training
/// directory or the archive, so the process that trains need not be the
/// process that wrote the training data.
pub trait ClassifierBuilder {
    type Classifier;

    /// The tag recorded in manifests for this builder.
    fn name(&self) -> &'static str;

    /// Runs the external trainer on the directory's training data,
    /// expecting it to leave `model.dat` behind. Propagates the trainer's
    /// exit status; never retries.
    fn train(&self, dir: &Path, args: &[String]) -> Result<(), TrainError>;

    /// Packages the trained directory into `model.zip`, overwriting any
    /// previous archive. Fails if the model file is missing.
    fn package(&self, dir: &Path) -> Result<PathBuf, PackageError>;

    /// Loads a packaged archive into a ready classifier, with the encoder
    /// id spaces frozen.
    fn load(&self, archive: &Path) -> Result<Self::Classifier, LoadError>;
}
