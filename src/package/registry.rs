use std::path::{Path, PathBuf};

use log::info;

use super::{
    ClassifierBuilder, LoadError, Manifest, ModelArchive, TrainingRunError,
};
use crate::liblinear::{LiblinearClassifier, LiblinearClassifierBuilder};
use crate::svmlight::{SvmLightClassifier, SvmLightClassifierBuilder};

/// A classifier reconstructed from an archive whose concrete type was
/// known only to the manifest.
///
/// The builder set is closed and known at compile time, so dispatch is a
/// plain match on the manifest tag rather than any dynamic lookup.
#[derive(Debug)]
pub enum LoadedClassifier {
    SvmLight(SvmLightClassifier),
    Liblinear(LiblinearClassifier),
}

/// Loads whatever classifier the archive's manifest names.
pub fn load_classifier(archive: &Path) -> Result<LoadedClassifier, LoadError> {
    let opened = ModelArchive::open(archive)?;
    let tag = opened.manifest().builder_class()?.to_string();
    drop(opened);

    info!("loading classifier built by {}", tag);
    match tag.as_str() {
        SvmLightClassifierBuilder::NAME => Ok(LoadedClassifier::SvmLight(
            SvmLightClassifierBuilder.load(archive)?,
        )),
        LiblinearClassifierBuilder::NAME => Ok(LoadedClassifier::Liblinear(
            LiblinearClassifierBuilder.load(archive)?,
        )),
        other => Err(LoadError::UnknownBuilder(other.to_string())),
    }
}

/// Trains and packages a prepared training directory through the builder
/// its manifest records. This is the library side of the train CLI.
pub fn train_and_package(dir: &Path, args: &[String]) -> Result<PathBuf, TrainingRunError> {
    let manifest = Manifest::read_from(dir)?;
    let tag = manifest.builder_class()?.to_string();

    info!("training {} in {}", tag, dir.display());
    match tag.as_str() {
        SvmLightClassifierBuilder::NAME => {
            let builder = SvmLightClassifierBuilder;
            builder.train(dir, args)?;
            Ok(builder.package(dir)?)
        }
        LiblinearClassifierBuilder::NAME => {
            let builder = LiblinearClassifierBuilder;
            builder.train(dir, args)?;
            Ok(builder.package(dir)?)
        }
        other => Err(TrainingRunError::UnknownBuilder(other.to_string())),
    }
}
