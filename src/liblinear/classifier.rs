use std::env;
use std::path::{Path, PathBuf};

use super::{Encoders, LinearModel, TRAINING_DATA_FILE};
use crate::classifier::{Classifier, ClassifyError, ScoredOutcome};
use crate::encoder::{OutcomeEncoder, StringToIntOutcomeEncoder, VectorFeaturesEncoder};
use crate::feature::Feature;
use crate::package::{
    write_archive, ClassifierBuilder, LoadError, Manifest, ModelArchive, PackageError,
    ENCODERS_ENTRY, MODEL_ENTRY,
};
use crate::training::{run_trainer, TrainError};

/// A loaded LIBLINEAR classifier with its frozen encoders.
#[derive(Debug)]
pub struct LiblinearClassifier {
    model: LinearModel,
    features: VectorFeaturesEncoder,
    outcomes: StringToIntOutcomeEncoder,
}

impl Classifier for LiblinearClassifier {
    type Outcome = String;

    fn classify(&self, features: &[Feature]) -> Result<String, ClassifyError> {
        let vector = self.features.encode(features)?;
        Ok(self.outcomes.decode(&self.model.predict(&vector))?)
    }

    fn score(
        &self,
        features: &[Feature],
        max_results: usize,
    ) -> Result<Vec<ScoredOutcome<String>>, ClassifyError> {
        let vector = self.features.encode(features)?;
        let mut scored = Vec::new();
        for (label, score) in self.model.score(&vector) {
            scored.push(ScoredOutcome {
                outcome: self.outcomes.decode(&label)?,
                score,
            });
            if scored.len() == max_results {
                break;
            }
        }
        Ok(scored)
    }
}

/// Trains with the external LIBLINEAR `train` binary and packages/loads
/// the resulting model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiblinearClassifierBuilder;

impl LiblinearClassifierBuilder {
    pub const NAME: &'static str = "LiblinearClassifierBuilder";

    /// Environment variable overriding the trainer binary.
    pub const TRAINER_ENV: &'static str = "FEATKIT_LIBLINEAR_TRAIN";

    const DEFAULT_TRAINER: &'static str = "train";

    fn trainer_program() -> String {
        env::var(Self::TRAINER_ENV).unwrap_or_else(|_| Self::DEFAULT_TRAINER.to_string())
    }
}

impl ClassifierBuilder for LiblinearClassifierBuilder {
    type Classifier = LiblinearClassifier;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn train(&self, dir: &Path, args: &[String]) -> Result<(), TrainError> {
        let model_file = dir.join(MODEL_ENTRY);
        let mut trainer_args: Vec<String> = args.to_vec();
        trainer_args.push(dir.join(TRAINING_DATA_FILE).display().to_string());
        trainer_args.push(model_file.display().to_string());

        run_trainer(&Self::trainer_program(), &trainer_args)?;
        if !model_file.is_file() {
            return Err(TrainError::MissingModel(model_file));
        }
        Ok(())
    }

    fn package(&self, dir: &Path) -> Result<PathBuf, PackageError> {
        write_archive(
            dir,
            &Manifest::for_builder(Self::NAME),
            &[
                (MODEL_ENTRY, dir.join(MODEL_ENTRY)),
                (ENCODERS_ENTRY, dir.join(ENCODERS_ENTRY)),
            ],
        )
    }

    fn load(&self, archive: &Path) -> Result<LiblinearClassifier, LoadError> {
        let mut archive = ModelArchive::open(archive)?;
        let encoders: Encoders = serde_json::from_slice(&archive.read_entry(ENCODERS_ENTRY)?)?;

        let extracted = archive.extract_entry(MODEL_ENTRY)?;
        let model = LinearModel::from_file(extracted.path())
            .map_err(|err| LoadError::Model(err.to_string()))?;
        drop(extracted);

        let mut features = encoders.features;
        features.freeze();
        let mut outcomes = encoders.outcomes;
        outcomes.freeze();
        Ok(LiblinearClassifier {
            model,
            features,
            outcomes,
        })
    }
}
