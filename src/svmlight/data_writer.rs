use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::classifier::SvmLightClassifierBuilder;
use super::{Encoders, FIRST_FEATURE_INDEX, TRAINING_DATA_FILE};
use crate::data_writer::{format_value, DataWriter, WriteError};
use crate::encoder::{BooleanOutcomeEncoder, OutcomeEncoder, VectorFeaturesEncoder};
use crate::feature::Feature;
use crate::package::{Manifest, ENCODERS_ENTRY};

/// Writes SVM-light training data: one `±1 index:value ...` line per
/// instance, indices ascending, zero values omitted.
pub struct SvmLightDataWriter {
    dir: PathBuf,
    out: BufWriter<File>,
    features: VectorFeaturesEncoder,
    outcomes: BooleanOutcomeEncoder,
    instances: usize,
}

impl SvmLightDataWriter {
    pub fn new(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let out = BufWriter::new(File::create(dir.join(TRAINING_DATA_FILE))?);
        Ok(Self {
            dir: dir.to_path_buf(),
            out,
            features: VectorFeaturesEncoder::new(FIRST_FEATURE_INDEX),
            outcomes: BooleanOutcomeEncoder::new(),
            instances: 0,
        })
    }
}

impl DataWriter for SvmLightDataWriter {
    type Outcome = bool;

    fn write(&mut self, features: &[Feature], outcome: &bool) -> Result<(), WriteError> {
        let vector = self.features.encode_all(features)?;
        let label = self.outcomes.encode(outcome)?;
        write!(self.out, "{:+}", label)?;
        for (index, value) in vector.iter() {
            write!(self.out, " {}:{}", index, format_value(value))?;
        }
        writeln!(self.out)?;
        self.instances += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<(), WriteError> {
        self.out.flush()?;
        self.features.finalize_feature_set(&self.dir)?;

        let encoders = Encoders {
            features: self.features,
            outcomes: self.outcomes,
        };
        serde_json::to_writer(File::create(self.dir.join(ENCODERS_ENTRY))?, &encoders)?;
        Manifest::for_builder(SvmLightClassifierBuilder::NAME).write_to(&self.dir)?;

        info!(
            "wrote {} SVM-light training instances to {}",
            self.instances,
            self.dir.display()
        );
        Ok(())
    }
}
