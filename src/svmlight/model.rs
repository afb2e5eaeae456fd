use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::feature_vector::{FeatureVector, InvalidVectorValue};

/// Errors raised while parsing an SVM-light model file.
#[derive(Debug, thiserror::Error)]
pub enum ModelParseError {
    #[error("unexpected end of model file")]
    UnexpectedEof,
    #[error("model file line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("unsupported kernel type {0}")]
    UnsupportedKernel(i64),
    #[error(transparent)]
    InvalidValue(#[from] InvalidVectorValue),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The kernel function of an SVM-light model.
#[derive(Debug, Clone, PartialEq)]
pub enum Kernel {
    Linear,
    Polynomial { s: f64, c: f64, degree: i32 },
    Rbf { gamma: f64 },
    Sigmoid { s: f64, c: f64 },
}

impl Kernel {
    pub fn evaluate(&self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        match self {
            Kernel::Linear => a.inner_product(b),
            Kernel::Polynomial { s, c, degree } => {
                (s * a.inner_product(b) + c).powi(*degree)
            }
            Kernel::Rbf { gamma } => (-gamma * a.squared_distance(b)).exp(),
            Kernel::Sigmoid { s, c } => (s * a.inner_product(b) + c).tanh(),
        }
    }
}

/// One support vector: the training-time coefficient `alpha * y` and the
/// sparse vector itself.
#[derive(Debug, Clone)]
pub struct SupportVector {
    pub alpha_y: f64,
    pub vector: FeatureVector,
}

/// A parsed SVM-light model.
///
/// The text format is a fixed line protocol: a version line, the kernel
/// type, the `-d`, `-g`, `-s`, `-r` and `-u` kernel parameter lines, the
/// highest feature index, the training document count, the support-vector
/// count (stored as the count plus one), the threshold `b`, then one
/// `alpha_y index:value ...` line per support vector. A `#` starts a
/// comment on any line. Kept byte-compatible with files written by the
/// `svm_learn` binary; existing trained models must keep loading.
#[derive(Debug, Clone)]
pub struct SvmLightModel {
    version: String,
    kernel: Kernel,
    bias: f64,
    support_vectors: Vec<SupportVector>,
    // Collapsed linear weights; present only after compress() on a
    // linear-kernel model.
    weights: Option<FeatureVector>,
}

impl SvmLightModel {
    pub fn from_file(path: &Path) -> Result<Self, ModelParseError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ModelParseError> {
        let mut lines = ModelLines::new(reader);

        let version = lines.next_line()?;
        let kernel_type: i64 = lines.parse()?;
        let degree: i32 = lines.parse()?;
        let gamma: f64 = lines.parse()?;
        let s: f64 = lines.parse()?;
        let c: f64 = lines.parse()?;
        let _user_parameter = lines.next_line()?;
        let _highest_feature_index: u64 = lines.parse()?;
        let _document_count: u64 = lines.parse()?;
        let stored_count: usize = lines.parse()?;
        let bias: f64 = lines.parse()?;

        let kernel = match kernel_type {
            0 => Kernel::Linear,
            1 => Kernel::Polynomial { s, c, degree },
            2 => Kernel::Rbf { gamma },
            3 => Kernel::Sigmoid { s, c },
            other => return Err(ModelParseError::UnsupportedKernel(other)),
        };

        let count = stored_count.checked_sub(1).ok_or_else(|| {
            lines.malformed("support vector count must be at least 1".to_string())
        })?;
        let mut support_vectors = Vec::with_capacity(count);
        for _ in 0..count {
            let line = lines.next_line()?;
            support_vectors.push(parse_support_vector(&line, lines.number())?);
        }

        Ok(Self {
            version,
            kernel,
            bias,
            support_vectors,
            weights: None,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn support_vectors(&self) -> &[SupportVector] {
        &self.support_vectors
    }

    /// Decision value for one encoded instance.
    pub fn evaluate(&self, vector: &FeatureVector) -> f64 {
        match &self.weights {
            Some(weights) => weights.inner_product(vector) - self.bias,
            None => {
                let sum: f64 = self
                    .support_vectors
                    .iter()
                    .map(|sv| sv.alpha_y * self.kernel.evaluate(&sv.vector, vector))
                    .sum();
                sum - self.bias
            }
        }
    }

    /// Collapses the support vectors of a linear-kernel model into one
    /// equivalent weight vector (`sum(alpha_y_i * sv_i)`), turning each
    /// evaluation into a single inner product. The transformation is only
    /// valid for the linear kernel; for any other kernel this is a no-op.
    pub fn compress(&mut self) -> Result<(), InvalidVectorValue> {
        if self.kernel != Kernel::Linear || self.weights.is_some() {
            return Ok(());
        }
        let mut weights = FeatureVector::new();
        for sv in &self.support_vectors {
            weights.add_scaled(&sv.vector, sv.alpha_y)?;
        }
        self.weights = Some(weights);
        self.support_vectors = Vec::new();
        Ok(())
    }

    pub fn is_compressed(&self) -> bool {
        self.weights.is_some()
    }
}

fn parse_support_vector(line: &str, number: usize) -> Result<SupportVector, ModelParseError> {
    let malformed = |message: String| ModelParseError::Malformed {
        line: number,
        message,
    };

    let mut fields = line.split_whitespace();
    let alpha_y: f64 = fields
        .next()
        .ok_or_else(|| malformed("empty support vector line".to_string()))?
        .parse()
        .map_err(|_| malformed("support vector coefficient is not a number".to_string()))?;

    let mut vector = FeatureVector::new();
    for field in fields {
        let (index, value) = field
            .split_once(':')
            .ok_or_else(|| malformed(format!("expected index:value, found `{}`", field)))?;
        let index: usize = index
            .parse()
            .map_err(|_| malformed(format!("bad feature index `{}`", index)))?;
        let value: f64 = value
            .parse()
            .map_err(|_| malformed(format!("bad feature value `{}`", value)))?;
        vector.set(index, value)?;
    }

    Ok(SupportVector { alpha_y, vector })
}

/// Line reader for the model protocol: strips `#` comments, trims, counts.
struct ModelLines<R> {
    reader: R,
    number: usize,
}

impl<R: BufRead> ModelLines<R> {
    fn new(reader: R) -> Self {
        Self { reader, number: 0 }
    }

    fn number(&self) -> usize {
        self.number
    }

    fn next_line(&mut self) -> Result<String, ModelParseError> {
        let mut raw = String::new();
        if self.reader.read_line(&mut raw)? == 0 {
            return Err(ModelParseError::UnexpectedEof);
        }
        self.number += 1;
        let line = match raw.split_once('#') {
            Some((before, _)) => before,
            None => &raw,
        };
        Ok(line.trim().to_string())
    }

    fn parse<T: FromStr>(&mut self) -> Result<T, ModelParseError> {
        let line = self.next_line()?;
        line.parse().map_err(|_| self.malformed(format!("could not parse `{}`", line)))
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

    fn model_text(kernel_type: u32, svs: &[&str]) -> String {
        let mut text = String::new();
        text.push_str("SVM-light Version V6.02\n");
        text.push_str(&format!("{} # kernel type\n", kernel_type));
        text.push_str("3 # kernel parameter -d\n");
        text.push_str("0.5 # kernel parameter -g\n");
        text.push_str("1 # kernel parameter -s\n");
        text.push_str("1 # kernel parameter -r\n");
        text.push_str("empty# kernel parameter -u\n");
        text.push_str("4 # highest feature index\n");
        text.push_str("6 # number of training documents\n");
        text.push_str(&format!("{} # number of support vectors plus 1\n", svs.len() + 1));
        text.push_str("0.25 # threshold b\n");
        for sv in svs {
            text.push_str(sv);
            text.push('\n');
        }
        text
    }

    fn sample(kernel_type: u32) -> SvmLightModel {
        let text = model_text(
            kernel_type,
            &["0.8 1:1.0 3:2.0 #", "-0.5 2:1.5 4:0.5 #", "0.1 1:0.5 2:1.0 #"],
        );
        SvmLightModel::from_reader(Cursor::new(text)).unwrap()
    }

    fn query() -> FeatureVector {
        [(1, 1.0), (2, 2.0), (4, 1.0)].into_iter().collect()
    }

    #[test]
    fn test_parse_linear_model() {
        let model = sample(0);
        assert_eq!(model.version(), "SVM-light Version V6.02");
        assert_eq!(*model.kernel(), Kernel::Linear);
        assert_eq!(model.bias(), 0.25);
        assert_eq!(model.support_vectors().len(), 3);
        assert_eq!(model.support_vectors()[0].alpha_y, 0.8);
        assert_eq!(model.support_vectors()[1].vector.get(4), 0.5);
    }

    #[test]
    fn test_linear_evaluate() {
        let model = sample(0);
        let expected = 0.8 * 1.0 + (-0.5) * (1.5 * 2.0 + 0.5 * 1.0) + 0.1 * (0.5 + 2.0) - 0.25;
        assert!((model.evaluate(&query()) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_compress_matches_uncompressed_linear() {
        let model = sample(0);
        let mut compressed = model.clone();
        compressed.compress().unwrap();
        assert!(compressed.is_compressed());
        assert!(compressed.support_vectors().is_empty());

        for vector in [
            query(),
            FeatureVector::new(),
            [(3, 4.0)].into_iter().collect(),
            [(1, -1.0), (2, -2.0), (3, -3.0), (4, -4.0)].into_iter().collect(),
        ] {
            let expected = model.evaluate(&vector);
            let actual = compressed.evaluate(&vector);
            assert!(
                (expected - actual).abs() < 1e-9,
                "compressed evaluation diverged: {} vs {}",
                expected,
                actual
            );
        }
    }

    #[test]
    fn test_compress_is_noop_for_nonlinear_kernels() {
        for kernel_type in [1, 2, 3] {
            let mut model = sample(kernel_type);
            let before = model.evaluate(&query());
            model.compress().unwrap();
            assert!(!model.is_compressed());
            assert_eq!(model.support_vectors().len(), 3);
            assert_eq!(model.evaluate(&query()), before);
        }
    }

    #[test]
    fn test_rbf_kernel_evaluation() {
        let model = sample(2);
        let expected: f64 = model
            .support_vectors()
            .iter()
            .map(|sv| sv.alpha_y * (-0.5 * sv.vector.squared_distance(&query())).exp())
            .sum();
        assert!((model.evaluate(&query()) - (expected - 0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_polynomial_kernel_uses_parameters() {
        let model = sample(1);
        match model.kernel() {
            Kernel::Polynomial { s, c, degree } => {
                assert_eq!((*s, *c, *degree), (1.0, 1.0, 3));
            }
            other => panic!("unexpected kernel: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_kernel_type() {
        let text = model_text(4, &[]);
        let err = SvmLightModel::from_reader(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, ModelParseError::UnsupportedKernel(4)));
    }

    #[test]
    fn test_truncated_file_is_eof() {
        let err = SvmLightModel::from_reader(Cursor::new("SVM-light Version V6.02\n0\n"))
            .unwrap_err();
        assert!(matches!(err, ModelParseError::UnexpectedEof));
    }

    #[test]
    fn test_malformed_support_vector_names_line() {
        let text = model_text(0, &["0.8 not-a-pair"]);
        let err = SvmLightModel::from_reader(Cursor::new(text)).unwrap_err();
        match err {
            ModelParseError::Malformed { line, .. } => assert_eq!(line, 12),
            other => panic!("unexpected error: {}", other),
        }
    }
}
