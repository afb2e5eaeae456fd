use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::TRAINING_DATA_FILE;
use crate::data_writer::{format_value, DataWriter, WriteError};
use crate::encoder::{IdentityOutcomeEncoder, NamesFeaturesEncoder, OutcomeEncoder};
use crate::feature::Feature;

/// Writes maxent-style training data: one `outcome name:value ...` line
/// per instance. The `:value` suffix is omitted when the value is exactly
/// 1.0, matching the backend's indicator-feature shorthand; names are
/// percent-escaped so the space-delimited grammar survives arbitrary
/// feature values.
pub struct MaxentDataWriter {
    dir: PathBuf,
    out: BufWriter<File>,
    features: NamesFeaturesEncoder,
    outcomes: IdentityOutcomeEncoder,
    instances: usize,
}

impl MaxentDataWriter {
    pub fn new(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let out = BufWriter::new(File::create(dir.join(TRAINING_DATA_FILE))?);
        Ok(Self {
            dir: dir.to_path_buf(),
            out,
            features: NamesFeaturesEncoder::new(),
            outcomes: IdentityOutcomeEncoder::new(),
            instances: 0,
        })
    }
}

impl DataWriter for MaxentDataWriter {
    type Outcome = String;

    fn write(&mut self, features: &[Feature], outcome: &String) -> Result<(), WriteError> {
        let pairs = self.features.encode_all(features)?;
        let outcome = self.outcomes.encode(outcome)?;
        write!(self.out, "{}", outcome)?;
        for pair in pairs {
            if pair.value == 1.0 {
                write!(self.out, " {}", pair.name)?;
            } else {
                write!(self.out, " {}:{}", pair.name, format_value(pair.value))?;
            }
        }
        writeln!(self.out)?;
        self.instances += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<(), WriteError> {
        self.out.flush()?;
        info!(
            "wrote {} maxent training instances to {}",
            self.instances,
            self.dir.display()
        );
        Ok(())
    }
}
