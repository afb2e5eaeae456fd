use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{DecodeError, OutcomeEncoder};

/// Maps string outcomes to 1-based integer labels in first-seen order.
///
/// Growable while training; [`freeze`](Self::freeze) closes the label set
/// so a stray outcome at classification time cannot invent a label the
/// trained model never saw. The assignment order is serialized, so a
/// re-hydrated encoder decodes exactly the labels it encoded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StringToIntOutcomeEncoder {
    #[serde(with = "indexmap::map::serde_seq")]
    outcomes: IndexMap<String, i32>,
    frozen: bool,
}

impl StringToIntOutcomeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the outcome set. Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Iterates `(outcome, label)` pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.outcomes
            .iter()
            .map(|(outcome, &label)| (outcome.as_str(), label))
    }
}

impl OutcomeEncoder for StringToIntOutcomeEncoder {
    type Outcome = String;
    type Encoded = i32;

    fn encode(&mut self, outcome: &String) -> Result<i32, DecodeError> {
        if let Some(&label) = self.outcomes.get(outcome) {
            return Ok(label);
        }
        if self.frozen {
            return Err(DecodeError::UnknownOutcome(outcome.clone()));
        }
        let label = self.outcomes.len() as i32 + 1;
        self.outcomes.insert(outcome.clone(), label);
        Ok(label)
    }

    fn decode(&self, encoded: &i32) -> Result<String, DecodeError> {
        self.outcomes
            .iter()
            .find(|entry| *entry.1 == *encoded)
            .map(|(outcome, _)| outcome.clone())
            .ok_or_else(|| DecodeError::UnknownEncoded(encoded.to_string()))
    }
}

/// Maps boolean outcomes to the `+1`/`-1` convention of margin classifiers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BooleanOutcomeEncoder;

impl BooleanOutcomeEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl OutcomeEncoder for BooleanOutcomeEncoder {
    type Outcome = bool;
    type Encoded = i32;

    fn encode(&mut self, outcome: &bool) -> Result<i32, DecodeError> {
        Ok(if *outcome { 1 } else { -1 })
    }

    fn decode(&self, encoded: &i32) -> Result<bool, DecodeError> {
        match encoded {
            1 => Ok(true),
            -1 => Ok(false),
            other => Err(DecodeError::UnknownEncoded(other.to_string())),
        }
    }
}

/// Passes string outcomes through unchanged, for backends whose native
/// label type is already the string itself.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IdentityOutcomeEncoder;

impl IdentityOutcomeEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl OutcomeEncoder for IdentityOutcomeEncoder {
    type Outcome = String;
    type Encoded = String;

    fn encode(&mut self, outcome: &String) -> Result<String, DecodeError> {
        Ok(outcome.clone())
    }

    fn decode(&self, encoded: &String) -> Result<String, DecodeError> {
        Ok(encoded.clone())
    }
}
