use std::cmp::Ordering;
use std::env;
use std::path::{Path, PathBuf};

use log::info;

use super::{Encoders, SvmLightModel, TRAINING_DATA_FILE};
use crate::classifier::{Classifier, ClassifyError, ScoredOutcome};
use crate::encoder::{BooleanOutcomeEncoder, OutcomeEncoder, VectorFeaturesEncoder};
use crate::feature::Feature;
use crate::package::{
    write_archive, ClassifierBuilder, LoadError, Manifest, ModelArchive, PackageError,
    ENCODERS_ENTRY, MODEL_ENTRY,
};
use crate::training::{run_trainer, TrainError};

/// A loaded SVM-light classifier with its frozen encoders.
#[derive(Debug)]
pub struct SvmLightClassifier {
    model: SvmLightModel,
    features: VectorFeaturesEncoder,
    outcomes: BooleanOutcomeEncoder,
}

impl SvmLightClassifier {
    /// Raw decision value for one instance; positive means `true`.
    pub fn decision_value(&self, features: &[Feature]) -> Result<f64, ClassifyError> {
        let vector = self.features.encode(features)?;
        Ok(self.model.evaluate(&vector))
    }

    pub fn model(&self) -> &SvmLightModel {
        &self.model
    }
}

impl Classifier for SvmLightClassifier {
    type Outcome = bool;

    fn classify(&self, features: &[Feature]) -> Result<bool, ClassifyError> {
        let value = self.decision_value(features)?;
        let encoded = if value > 0.0 { 1 } else { -1 };
        Ok(self.outcomes.decode(&encoded)?)
    }

    fn score(
        &self,
        features: &[Feature],
        max_results: usize,
    ) -> Result<Vec<ScoredOutcome<bool>>, ClassifyError> {
        let value = self.decision_value(features)?;
        let mut scored = vec![
            ScoredOutcome {
                outcome: true,
                score: value,
            },
            ScoredOutcome {
                outcome: false,
                score: -value,
            },
        ];
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(max_results);
        Ok(scored)
    }
}

/// Trains with the external `svm_learn` binary and packages/loads the
/// resulting model.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvmLightClassifierBuilder;

impl SvmLightClassifierBuilder {
    pub const NAME: &'static str = "SvmLightClassifierBuilder";

    /// Environment variable overriding the trainer binary.
    pub const TRAINER_ENV: &'static str = "FEATKIT_SVM_LEARN";

    const DEFAULT_TRAINER: &'static str = "svm_learn";

    fn trainer_program() -> String {
        env::var(Self::TRAINER_ENV).unwrap_or_else(|_| Self::DEFAULT_TRAINER.to_string())
    }
}

impl ClassifierBuilder for SvmLightClassifierBuilder {
    type Classifier = SvmLightClassifier;

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

    fn load(&self, archive: &Path) -> Result<SvmLightClassifier, LoadError> {
        let mut archive = ModelArchive::open(archive)?;
        let encoders: Encoders = serde_json::from_slice(&archive.read_entry(ENCODERS_ENTRY)?)?;

        // svm_learn models are parsed from a path; the extracted temp file
        // is deleted when `extracted` drops, error or not.
        let extracted = archive.extract_entry(MODEL_ENTRY)?;
        let mut model = SvmLightModel::from_file(extracted.path())
            .map_err(|err| LoadError::Model(err.to_string()))?;
        drop(extracted);

        model
            .compress()
            .map_err(|err| LoadError::Model(err.to_string()))?;
        if model.is_compressed() {
            info!("collapsed linear support vectors into a single weight vector");
        }

        let mut features = encoders.features;
        features.freeze();
        Ok(SvmLightClassifier {
            model,
            features,
            outcomes: encoders.outcomes,
        })
    }
}
