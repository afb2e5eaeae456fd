//! Feature and outcome encoders.
//!
//! A features encoder turns the [`Feature`]s of one classification instance
//! into the representation a particular backend understands; an outcome
//! encoder maps the user-facing label to and from the backend's native
//! label type. Encoders are created by a data writer at training time,
//! serialized into the model archive, and re-hydrated (frozen) when the
//! classifier is loaded back, which is what keeps feature indices and label
//! ids consistent between training and classification.

mod name_index;
mod names;
mod outcome;
mod vector;

pub use name_index::NameIndexMap;
pub use names::{NameValue, NamesFeaturesEncoder};
pub use outcome::{BooleanOutcomeEncoder, IdentityOutcomeEncoder, StringToIntOutcomeEncoder};
pub use vector::{VectorFeaturesEncoder, FEATURE_NAMES_FILE};

use crate::feature::{Feature, FeatureValue};
use crate::feature_vector::InvalidVectorValue;

/// Errors raised while encoding the features of one instance.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error(transparent)]
    InvalidVectorValue(#[from] InvalidVectorValue),
    /// No encoder rule applies to the feature; carries its display form.
    #[error("no matching encoder for feature {0}")]
    NoMatchingEncoder(String),
}

/// Errors raised by outcome encoders.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The encoded value was never produced by this encoder.
    #[error("unknown encoded outcome: {0}")]
    UnknownEncoded(String),
    /// The outcome was never seen while the encoder was still growable.
    #[error("outcome never seen during training: {0}")]
    UnknownOutcome(String),
}

/// Bidirectional mapping between an outcome type and a backend label type.
///
/// `decode(encode(x)) == x` holds for every outcome `x` this instance has
/// encoded. Decoding a value the encoder never produced is a
/// [`DecodeError`]; callers are expected not to feed foreign values in.
pub trait OutcomeEncoder {
    type Outcome;
    type Encoded;

    fn encode(&mut self, outcome: &Self::Outcome) -> Result<Self::Encoded, DecodeError>;

    fn decode(&self, encoded: &Self::Encoded) -> Result<Self::Outcome, DecodeError>;
}

/// Flattens a feature into its canonical dictionary key and numeric value.
///
/// Numeric values keep the name as key and the number as value; all other
/// values fold into the key (`name_value`) with an indicator value of 1.0,
/// so categorical and continuous features share one sparse representation.
/// A numeric or null value without a name has no possible key and is a
/// [`EncodeError::NoMatchingEncoder`] error.
pub(crate) fn flatten(feature: &Feature) -> Result<(String, f64), EncodeError> {
    let no_match = || EncodeError::NoMatchingEncoder(feature.to_string());
    match (&feature.value, feature.name()) {
        (FeatureValue::Number(value), Some(name)) => Ok((name.to_string(), *value)),
        (FeatureValue::Number(_), None) => Err(no_match()),
        (FeatureValue::Null, Some(name)) => Ok((name.to_string(), 1.0)),
        (FeatureValue::Null, None) => Err(no_match()),
        // An empty text value degenerates to the bare name, like null.
        (FeatureValue::Text(text), Some(name)) if text.is_empty() => Ok((name.to_string(), 1.0)),
        (value, Some(name)) => Ok((format!("{}_{}", name, value), 1.0)),
        (FeatureValue::Text(text), None) if !text.is_empty() => Ok((text.clone(), 1.0)),
        (FeatureValue::Boolean(value), None) => Ok((value.to_string(), 1.0)),
        (_, None) => Err(no_match()),
    }
}
