use std::fmt;

use serde::{Deserialize, Serialize};

/// The value carried by a [`Feature`].
///
/// The set of value shapes is closed: encoders dispatch on it exhaustively,
/// so an observation that cannot be expressed here cannot silently reach a
/// training file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns `true` for values that flatten into the feature name rather
    /// than contributing a numeric magnitude.
    pub fn is_categorical(&self) -> bool {
        !matches!(self, FeatureValue::Number(_))
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Null => Ok(()),
            FeatureValue::Boolean(value) => write!(f, "{}", value),
            FeatureValue::Number(value) => write!(f, "{}", value),
            FeatureValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Boolean(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Number(value as f64)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

/// A single named observation about a unit of text, produced by a feature
/// extractor and consumed immediately by an encoder.
///
/// Features are immutable once created. The name is optional; encoders
/// derive the canonical dictionary key from the name/value combination and
/// reject features for which no key can be formed.
///
/// # Example
/// ```
/// use featkit::{Feature, FeatureValue};
///
/// let length = Feature::new("token_length", 5.0);
/// let pos = Feature::new("pos", "NN");
/// assert_eq!(pos.value, FeatureValue::Text("NN".into()));
/// assert_eq!(length.value.as_number(), Some(5.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: Option<String>,
    pub value: FeatureValue,
}

impl Feature {
    /// Creates a named feature.
    pub fn new(name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() { None } else { Some(name) },
            value: value.into(),
        }
    }

    /// Creates a feature with no name; the value alone forms the key.
    pub fn nameless(value: impl Into<FeatureValue>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    /// The feature name, treating an empty string as absent.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}={}", name, self.value),
            None => write!(f, "<unnamed>={}", self.value),
        }
    }
}

/// Joins non-empty name parts with `_` into a canonical feature name.
///
/// This is the deterministic counterpart used by extractors that build
/// hierarchical names (`create_name(["ngram", "left"]) == "ngram_left"`).
pub fn create_name<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut name = String::new();
    for part in parts {
        if part.is_empty() {
            continue;
        }
        if !name.is_empty() {
            name.push('_');
        }
        name.push_str(part);
    }
    name
}

/// Escapes a feature name for whitespace-delimited training-file formats.
///
/// Any character outside printable ASCII, plus `%`, `\` and the characters
/// in `extra`, is written as `%U` followed by four uppercase hex digits of
/// the code point. This is a wire-format contract shared with existing
/// training files; do not change the digits or the marker.
pub fn escape(name: &str, extra: &[char]) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch < ' ' || ch > '~' || ch == '%' || ch == '\\' || extra.contains(&ch) {
            let mut buffer = [0u16; 2];
            for &unit in ch.encode_utf16(&mut buffer).iter() {
                escaped.push_str(&format!("%U{:04X}", unit));
            }
        } else {
            escaped.push(ch);
        }
    }
    escaped
}
