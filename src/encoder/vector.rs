use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::name_index::NameIndexMap;
use super::{flatten, EncodeError};
use crate::feature::Feature;
use crate::feature_vector::FeatureVector;

/// Human-readable dictionary dump written next to the training data.
pub const FEATURE_NAMES_FILE: &str = "feature-names.txt";

/// Encodes features into sparse [`FeatureVector`]s through a shared
/// name-to-index dictionary.
///
/// One encoder instance is shared across every instance of a training run,
/// so equal flattened names always land on the same index. Training goes
/// through [`encode_all`](Self::encode_all), which grows the dictionary;
/// after [`finalize_feature_set`](Self::finalize_feature_set) the dictionary
/// is frozen and classification uses [`encode`](Self::encode), under which
/// names never seen during training are silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorFeaturesEncoder {
    names: NameIndexMap,
}

impl VectorFeaturesEncoder {
    /// Creates an encoder assigning indices from `first_index` upward.
    pub fn new(first_index: usize) -> Self {
        Self {
            names: NameIndexMap::new(first_index),
        }
    }

    /// Encodes one instance, assigning fresh indices to new names while the
    /// dictionary is still open. A failed write (non-finite value,
    /// un-keyable feature) reports the offending feature and leaves the
    /// dictionary usable for subsequent calls.
    pub fn encode_all(&mut self, features: &[Feature]) -> Result<FeatureVector, EncodeError> {
        let mut vector = FeatureVector::new();
        for feature in features {
            let (name, value) = flatten(feature)?;
            if let Some(index) = self.names.get_or_insert(&name) {
                vector.set(index, value)?;
            }
        }
        Ok(vector)
    }

    /// Encodes one instance using only already-assigned indices. Unseen
    /// names do not appear in the result and do not alter the dictionary.
    pub fn encode(&self, features: &[Feature]) -> Result<FeatureVector, EncodeError> {
        let mut vector = FeatureVector::new();
        for feature in features {
            let (name, value) = flatten(feature)?;
            if let Some(index) = self.names.get(&name) {
                vector.set(index, value)?;
            }
        }
        Ok(vector)
    }

    /// Freezes the dictionary and writes the `feature-names.txt` dump into
    /// `dir`. Safe to call more than once; the dump is rewritten with the
    /// same content.
    pub fn finalize_feature_set(&mut self, dir: &Path) -> io::Result<()> {
        self.names.freeze();
        let mut dump = String::new();
        for (name, index) in self.names.iter() {
            let _ = writeln!(dump, "{}\t{}", name, index);
        }
        fs::write(dir.join(FEATURE_NAMES_FILE), dump)
    }

    /// Freezes the dictionary without persisting it; used when an encoder
    /// is re-hydrated from a model archive.
    pub fn freeze(&mut self) {
        self.names.freeze();
    }

    pub fn names(&self) -> &NameIndexMap {
        &self.names
    }
}
