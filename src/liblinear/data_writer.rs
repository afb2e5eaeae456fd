use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::classifier::LiblinearClassifierBuilder;
use super::{Encoders, FIRST_FEATURE_INDEX, TRAINING_DATA_FILE};
use crate::data_writer::{format_value, DataWriter, WriteError};
use crate::encoder::{OutcomeEncoder, StringToIntOutcomeEncoder, VectorFeaturesEncoder};
use crate::feature::Feature;
use crate::package::{Manifest, ENCODERS_ENTRY};

/// Writes LIBLINEAR training data: one `<label> index:value ...` line per
/// instance, string outcomes mapped to integer labels in first-seen order.
pub struct LiblinearDataWriter {
    dir: PathBuf,
    out: BufWriter<File>,
    features: VectorFeaturesEncoder,
    outcomes: StringToIntOutcomeEncoder,
    instances: usize,
}

impl LiblinearDataWriter {
    pub fn new(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let out = BufWriter::new(File::create(dir.join(TRAINING_DATA_FILE))?);
        Ok(Self {
            dir: dir.to_path_buf(),
            out,
            features: VectorFeaturesEncoder::new(FIRST_FEATURE_INDEX),
            outcomes: StringToIntOutcomeEncoder::new(),
            instances: 0,
        })
    }
}

impl DataWriter for LiblinearDataWriter {
    type Outcome = String;

    fn write(&mut self, features: &[Feature], outcome: &String) -> Result<(), WriteError> {
        let vector = self.features.encode_all(features)?;
        let label = self.outcomes.encode(outcome)?;
        write!(self.out, "{}", label)?;
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
        self.outcomes.freeze();

        let encoders = Encoders {
            features: self.features,
            outcomes: self.outcomes,
        };
        serde_json::to_writer(File::create(self.dir.join(ENCODERS_ENTRY))?, &encoders)?;
        Manifest::for_builder(LiblinearClassifierBuilder::NAME).write_to(&self.dir)?;

        info!(
            "wrote {} LIBLINEAR training instances to {}",
            self.instances,
            self.dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_lines_and_label_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LiblinearDataWriter::new(dir.path()).unwrap();
        writer
            .write(&[Feature::new("A", 1.1)], &"yes".to_string())
            .unwrap();
        writer
            .write(&[Feature::new("A", 2.1)], &"no".to_string())
            .unwrap();
        writer
            .write(&[Feature::new("A", 3.1)], &"yes".to_string())
            .unwrap();
        writer.finish().unwrap();

        let data = fs::read_to_string(dir.path().join(TRAINING_DATA_FILE)).unwrap();
        assert_eq!(data, "1 1:1.1\n2 1:2.1\n1 1:3.1\n");
    }

    #[test]
    fn test_finish_serializes_frozen_encoders() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = LiblinearDataWriter::new(dir.path()).unwrap();
        writer
            .write(&[Feature::new("A", 1.0)], &"yes".to_string())
            .unwrap();
        writer.finish().unwrap();

        let json = fs::read_to_string(dir.path().join(ENCODERS_ENTRY)).unwrap();
        let encoders: Encoders = serde_json::from_str(&json).unwrap();
        assert!(encoders.features.names().is_frozen());
        assert_eq!(encoders.outcomes.decode(&1).unwrap(), "yes");
    }
}
