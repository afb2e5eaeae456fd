use serde::{Deserialize, Serialize};

use super::{flatten, EncodeError};
use crate::feature::{escape, Feature};

/// One encoded feature for backends that keep names in their training
/// files: an escaped flattened name plus its numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: f64,
}

/// Encodes features as escaped name/value pairs (maxent-style backends).
///
/// Dictionary-free: the backend resolves names itself, so there is no index
/// space to freeze and nothing to persist at finalize time. Names are
/// escaped for space-delimited files, with `:` reserved as the name/value
/// separator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NamesFeaturesEncoder;

impl NamesFeaturesEncoder {
    const ESCAPED: [char; 3] = [':', ' ', '\t'];

    pub fn new() -> Self {
        Self
    }

    pub fn encode_all(&self, features: &[Feature]) -> Result<Vec<NameValue>, EncodeError> {
        features
            .iter()
            .map(|feature| {
                let (name, value) = flatten(feature)?;
                if !value.is_finite() {
                    return Err(crate::feature_vector::InvalidVectorValue { index: 0, value }.into());
                }
                Ok(NameValue {
                    name: escape(&name, &Self::ESCAPED),
                    value,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_names_and_values() {
        let encoder = NamesFeaturesEncoder::new();
        let pairs = encoder
            .encode_all(&[Feature::new("length", 4.0), Feature::new("pos", "NN")])
            .unwrap();
        assert_eq!(
            pairs,
            vec![
                NameValue {
                    name: "length".into(),
                    value: 4.0
                },
                NameValue {
                    name: "pos_NN".into(),
                    value: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_escapes_separator_characters() {
        let encoder = NamesFeaturesEncoder::new();
        let pairs = encoder
            .encode_all(&[Feature::new("word", "a:b c")])
            .unwrap();
        assert_eq!(pairs[0].name, "word_a%U003Ab%U0020c");
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let encoder = NamesFeaturesEncoder::new();
        let err = encoder
            .encode_all(&[Feature::new("bad", f64::INFINITY)])
            .unwrap_err();
        assert!(matches!(err, EncodeError::InvalidVectorValue(_)));
    }
}
