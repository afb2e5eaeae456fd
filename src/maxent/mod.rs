//! Maxent-style backend: name:value training files for tools that resolve
//! feature names themselves (OpenNLP maxent, Mallet). Only the data-writer
//! side lives here; those backends train through their own APIs.

mod data_writer;

pub use data_writer::MaxentDataWriter;

/// Training data file written into the training directory.
pub const TRAINING_DATA_FILE: &str = "training-data.maxent";
