use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::feature_vector::{FeatureVector, InvalidVectorValue};

/// Errors raised while parsing a LIBLINEAR model file.
#[derive(Debug, thiserror::Error)]
pub enum ModelParseError {
    #[error("unexpected end of model file")]
    UnexpectedEof,
    #[error("model file line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error(transparent)]
    InvalidValue(#[from] InvalidVectorValue),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// One column of the weight matrix: a binary one-vs-rest classifier.
#[derive(Debug, Clone)]
struct BinaryClassifier {
    label: i32,
    weights: FeatureVector,
    bias: f64,
}

impl BinaryClassifier {
    fn evaluate(&self, vector: &FeatureVector) -> f64 {
        self.weights.inner_product(vector) + self.bias
    }
}

/// A parsed LIBLINEAR model.
///
/// Header lines (`solver_type`, `nr_class`, `label`, `nr_feature`, `bias`,
/// `w`) are followed by one weight row per feature with one column per
/// binary classifier. Two-class models store a single column whose sign
/// decides between the first label and the fallback label; multiclass
/// models store one column per class and predict the best-scoring one.
/// A non-negative `bias` value folds an extra weight row into each column's
/// intercept.
#[derive(Debug, Clone)]
pub struct LinearModel {
    class_count: usize,
    classifiers: Vec<BinaryClassifier>,
    fallback_label: i32,
}

impl LinearModel {
    pub fn from_file(path: &Path) -> Result<Self, ModelParseError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ModelParseError> {
        let mut lines = ModelLines::new(reader);

        let _solver_type = lines.next_line()?;
        let class_count: usize = lines.field(1, "nr_class")?;
        let classifier_count = if class_count == 2 { 1 } else { class_count };

        let label_fields = lines.fields("label")?;
        if label_fields.len() < class_count {
            return Err(lines.malformed(format!(
                "label line has {} entries for {} classes",
                label_fields.len(),
                class_count
            )));
        }
        let labels: Vec<i32> = label_fields[..classifier_count]
            .iter()
            .map(|field| field.parse())
            .collect::<Result<_, _>>()
            .map_err(|_| lines.malformed("bad label".to_string()))?;
        let fallback_label: i32 = if class_count == 2 {
            label_fields[1]
                .parse()
                .map_err(|_| lines.malformed("bad fallback label".to_string()))?
        } else {
            0
        };

        let feature_count: usize = lines.field(1, "nr_feature")?;
        let bias: f64 = lines.field(1, "bias")?;
        let _w_header = lines.next_line()?;

        let mut classifiers: Vec<BinaryClassifier> = labels
            .into_iter()
            .map(|label| BinaryClassifier {
                label,
                weights: FeatureVector::new(),
                bias: 0.0,
            })
            .collect();

        for feature in 0..feature_count {
            let row = lines.weight_row(classifier_count)?;
            for (classifier, weight) in classifiers.iter_mut().zip(row) {
                classifier.weights.set(feature + 1, weight)?;
            }
        }

        if bias >= 0.0 {
            let row = lines.weight_row(classifier_count)?;
            for (classifier, weight) in classifiers.iter_mut().zip(row) {
                classifier.bias = weight * bias;
            }
        }

        Ok(Self {
            class_count,
            classifiers,
            fallback_label,
        })
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// The winning native label for one encoded instance.
    pub fn predict(&self, vector: &FeatureVector) -> i32 {
        if self.class_count == 2 {
            let value = self.classifiers[0].evaluate(vector);
            if value > 0.0 {
                self.classifiers[0].label
            } else {
                self.fallback_label
            }
        } else {
            let mut best_label = self.classifiers[0].label;
            let mut best_value = self.classifiers[0].evaluate(vector);
            for classifier in &self.classifiers[1..] {
                let value = classifier.evaluate(vector);
                if value > best_value {
                    best_value = value;
                    best_label = classifier.label;
                }
            }
            best_label
        }
    }

    /// `(label, score)` pairs for every class, sorted by descending score.
    pub fn score(&self, vector: &FeatureVector) -> Vec<(i32, f64)> {
        let mut scored: Vec<(i32, f64)> = if self.class_count == 2 {
            let value = self.classifiers[0].evaluate(vector);
            vec![(self.classifiers[0].label, value), (self.fallback_label, -value)]
        } else {
            self.classifiers
                .iter()
                .map(|classifier| (classifier.label, classifier.evaluate(vector)))
                .collect()
        };
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }
}

struct ModelLines<R> {
    reader: R,
    number: usize,
}

impl<R: BufRead> ModelLines<R> {
    fn new(reader: R) -> Self {
        Self { reader, number: 0 }
    }

    fn next_line(&mut self) -> Result<String, ModelParseError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ModelParseError::UnexpectedEof);
        }
        self.number += 1;
        Ok(line.trim().to_string())
    }

    fn fields(&mut self, expected_key: &str) -> Result<Vec<String>, ModelParseError> {
        let line = self.next_line()?;
        let mut fields = line.split_whitespace().map(str::to_string);
        match fields.next() {
            Some(key) if key == expected_key => Ok(fields.collect()),
            _ => Err(self.malformed(format!("expected `{}` line, found `{}`", expected_key, line))),
        }
    }

    fn field<T: std::str::FromStr>(
        &mut self,
        index: usize,
        expected_key: &str,
    ) -> Result<T, ModelParseError> {
        let fields = self.fields(expected_key)?;
        fields
            .get(index - 1)
            .and_then(|field| field.parse().ok())
            .ok_or_else(|| self.malformed(format!("bad `{}` line", expected_key)))
    }

    fn weight_row(&mut self, columns: usize) -> Result<Vec<f64>, ModelParseError> {
        let line = self.next_line()?;
        let row: Vec<f64> = line
            .split_whitespace()
            .map(|field| field.parse())
            .collect::<Result<_, _>>()
            .map_err(|_| self.malformed(format!("bad weight row `{}`", line)))?;
        if row.len() < columns {
            return Err(self.malformed(format!(
                "weight row has {} columns, expected {}",
                row.len(),
                columns
            )));
        }
        Ok(row)
    }

    fn malformed(&self, message: String) -> ModelParseError {
        ModelParseError::Malformed {
            line: self.number,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn two_class_text() -> &'static str {
        // Single weight column; label 1 wins on positive values.
        "solver_type L2R_L2LOSS_SVC\n\
         nr_class 2\n\
         label 1 2\n\
         nr_feature 3\n\
         bias -1\n\
         w\n\
         0.5\n\
         -0.25\n\
         1\n"
    }

    fn three_class_text() -> &'static str {
        "solver_type MCSVM_CS\n\
         nr_class 3\n\
         label 1 2 3\n\
         nr_feature 2\n\
         bias 1\n\
         w\n\
         1.0 -1.0 0.0\n\
         0.0 1.0 -1.0\n\
         0.25 0.0 -0.25\n"
    }

    #[test]
    fn test_two_class_predict() {
        let model = LinearModel::from_reader(Cursor::new(two_class_text())).unwrap();
        assert_eq!(model.class_count(), 2);

        let positive: FeatureVector = [(1, 2.0)].into_iter().collect();
        assert_eq!(model.predict(&positive), 1);

        let negative: FeatureVector = [(2, 4.0)].into_iter().collect();
        assert_eq!(model.predict(&negative), 2);
    }

    #[test]
    fn test_two_class_score_mirrors_decision_value() {
        let model = LinearModel::from_reader(Cursor::new(two_class_text())).unwrap();
        let vector: FeatureVector = [(1, 2.0), (3, 1.0)].into_iter().collect();
        let scored = model.score(&vector);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].0, 1);
        assert_eq!(scored[0].1, 2.0);
        assert_eq!(scored[1], (2, -2.0));
    }

    #[test]
    fn test_multiclass_predict_and_score_all_columns() {
        let model = LinearModel::from_reader(Cursor::new(three_class_text())).unwrap();
        // bias of 1 folds the last weight row into each intercept.
        let vector: FeatureVector = [(1, 1.0)].into_iter().collect();
        let scored = model.score(&vector);
        assert_eq!(scored.len(), 3);
        assert_eq!(scored[0].0, 1);
        assert_eq!(scored[0].1, 1.25);
        assert_eq!(model.predict(&vector), 1);

        let vector: FeatureVector = [(2, 2.0)].into_iter().collect();
        assert_eq!(model.predict(&vector), 2);
    }

    #[test]
    fn test_truncated_model_is_eof() {
        let err = LinearModel::from_reader(Cursor::new("solver_type X\nnr_class 2\n"))
            .unwrap_err();
        assert!(matches!(err, ModelParseError::UnexpectedEof));
    }

    #[test]
    fn test_short_weight_row_is_malformed() {
        let text = "solver_type X\nnr_class 3\nlabel 1 2 3\nnr_feature 1\nbias -1\nw\n1.0 2.0\n";
        let err = LinearModel::from_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, ModelParseError::Malformed { line: 7, .. }));
    }
}
