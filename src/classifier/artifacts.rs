//! Exported classifier bundle: TF-IDF vectorizer, linear model and label encoder
//!
//! A bundle directory holds four files:
//!
//! * `config.json`: model type and multi-class strategy
//! * `vectorizer.json`: vocabulary, idf weights and term weighting options
//! * `classifier.safetensors`: `coef` `[n_classes, n_features]` and `intercept` `[n_classes]`
//! * `labels.json`: role names in class-index order

use super::{ClassificationArtifacts, LabelDecoder, ProbabilisticClassifier, Vectorizer};
use crate::error::{Result, ResumeInsightError};
use half::f16;
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1};
use regex::Regex;
use safetensors::{tensor::TensorView, Dtype, SafeTensors};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.safetensors";
pub const LABELS_FILE: &str = "labels.json";

pub const BUNDLE_FILES: [&str; 4] = [CONFIG_FILE, VECTORIZER_FILE, CLASSIFIER_FILE, LABELS_FILE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    #[default]
    Multinomial,
    Ovr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default)]
    pub multi_class: MultiClass,
}

fn default_model_type() -> String {
    "logistic_regression".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Serialized form of a fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    pub lowercase: bool,
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    sublinear_tf: bool,
    norm: Option<Norm>,
    ngram_range: (usize, usize),
    lowercase: bool,
    token_regex: Regex,
}

impl TfidfVectorizer {
    pub fn from_config(config: VectorizerConfig) -> Result<Self> {
        let size = config.vocabulary.len();

        let mut seen = vec![false; size];
        for (term, &index) in &config.vocabulary {
            if index >= size || seen[index] {
                return Err(ResumeInsightError::ModelLoading(format!(
                    "Vocabulary index {} for term '{}' is out of range or duplicated",
                    index, term
                )));
            }
            seen[index] = true;
        }

        // A vectorizer without idf weights behaves as plain term frequency
        let idf = config.idf.unwrap_or_else(|| vec![1.0; size]);
        if idf.len() != size {
            return Err(ResumeInsightError::ModelLoading(format!(
                "idf has {} weights for a vocabulary of {}",
                idf.len(),
                size
            )));
        }

        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ResumeInsightError::ModelLoading(format!(
                "Invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = Regex::new(r"\b\w\w+\b").expect("Invalid token regex");

        Ok(Self {
            vocabulary: config.vocabulary,
            idf,
            sublinear_tf: config.sublinear_tf,
            norm: config.norm,
            ngram_range: config.ngram_range,
            lowercase: config.lowercase,
            token_regex,
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VectorizerConfig = serde_json::from_str(&content).map_err(|e| {
            ResumeInsightError::ModelLoading(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Self::from_config(config)
    }

    fn term_counts(&self, text: &str) -> HashMap<usize, f64> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = self.token_regex.find_iter(&text).map(|m| m.as_str()).collect();

        let mut counts = HashMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let term = window.join(" ");
                if let Some(&index) = self.vocabulary.get(&term) {
                    *counts.entry(index).or_insert(0.0) += 1.0;
                }
            }
        }
        counts
    }
}

impl Vectorizer for TfidfVectorizer {
    fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn vectorize(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0f64; self.vocabulary.len()];

        for (index, count) in self.term_counts(text) {
            let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
            features[index] = tf * self.idf[index];
        }

        let norm = match self.norm {
            Some(Norm::L2) => features.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => features.iter().map(|v| v.abs()).sum::<f64>(),
            None => 0.0,
        };
        if norm > 0.0 {
            features.iter_mut().for_each(|v| *v /= norm);
        }

        features
    }
}

/// Linear model with logistic outputs
pub struct LinearClassifier {
    coef: Array2<f64>,
    intercept: Array1<f64>,
    multi_class: MultiClass,
}

impl LinearClassifier {
    pub fn new(coef: Array2<f64>, intercept: Array1<f64>, multi_class: MultiClass) -> Result<Self> {
        if coef.nrows() != intercept.len() {
            return Err(ResumeInsightError::ModelLoading(format!(
                "coef has {} rows but intercept has {} entries",
                coef.nrows(),
                intercept.len()
            )));
        }
        if coef.nrows() == 0 {
            return Err(ResumeInsightError::ModelLoading("coef has no rows".to_string()));
        }

        Ok(Self {
            coef,
            intercept,
            multi_class,
        })
    }

    pub fn from_safetensors(path: &Path, multi_class: MultiClass) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let tensors = SafeTensors::deserialize(&bytes)?;

        let coef = tensors.tensor("coef")?;
        let [rows, cols]: [usize; 2] = coef.shape().try_into().map_err(|_| {
            ResumeInsightError::ModelLoading(format!("coef must be 2-D, got shape {:?}", coef.shape()))
        })?;
        let coef = Array2::from_shape_vec((rows, cols), decode_f64(&coef)?)
            .map_err(|e| ResumeInsightError::ModelLoading(format!("Failed to build coef matrix: {}", e)))?;

        let intercept = tensors.tensor("intercept")?;
        if intercept.shape().len() != 1 {
            return Err(ResumeInsightError::ModelLoading(format!(
                "intercept must be 1-D, got shape {:?}",
                intercept.shape()
            )));
        }
        let intercept = Array1::from(decode_f64(&intercept)?);

        debug!("Loaded linear classifier [{} x {}]", rows, cols);
        Self::new(coef, intercept, multi_class)
    }

    fn decision_function(&self, features: &[f64]) -> Array1<f64> {
        self.coef.dot(&ArrayView1::from(features)) + &self.intercept
    }
}

impl ProbabilisticClassifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn n_classes(&self) -> usize {
        // A binary logistic model stores a single row for the positive class
        if self.coef.nrows() == 1 {
            2
        } else {
            self.coef.nrows()
        }
    }

    fn predict_probabilities(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features() {
            return Err(ResumeInsightError::Model(format!(
                "Expected {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }

        let scores = self.decision_function(features);

        if scores.len() == 1 {
            let positive = sigmoid(scores[0]);
            return Ok(vec![1.0 - positive, positive]);
        }

        let probabilities = match self.multi_class {
            MultiClass::Multinomial => softmax(&scores.to_vec()),
            MultiClass::Ovr => {
                let raw: Vec<f64> = scores.iter().map(|&s| sigmoid(s)).collect();
                let total: f64 = raw.iter().sum();
                if total > 0.0 {
                    raw.iter().map(|p| p / total).collect()
                } else {
                    vec![1.0 / raw.len() as f64; raw.len()]
                }
            }
        };

        Ok(probabilities)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

fn decode_f64(tensor: &TensorView<'_>) -> Result<Vec<f64>> {
    let raw = tensor.data();
    let values = match tensor.dtype() {
        Dtype::F32 => raw
            .chunks_exact(4)
            .map(|b| f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
            .collect(),
        Dtype::F16 => raw
            .chunks_exact(2)
            .map(|b| f16::from_le_bytes([b[0], b[1]]).to_f64())
            .collect(),
        Dtype::F64 => raw
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
            .collect(),
        other => {
            return Err(ResumeInsightError::ModelLoading(format!(
                "Unsupported tensor dtype: {:?}",
                other
            )))
        }
    };
    Ok(values)
}

/// Role names in class-index order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ResumeInsightError::ModelLoading(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl LabelDecoder for LabelEncoder {
    fn n_labels(&self) -> usize {
        self.classes.len()
    }

    fn decode_label(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

impl ClassificationArtifacts {
    /// Load a complete bundle from `dir`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let missing: Vec<&str> = BUNDLE_FILES
            .iter()
            .copied()
            .filter(|file| !dir.join(file).is_file())
            .collect();
        if !missing.is_empty() {
            return Err(ResumeInsightError::ArtifactsNotFound(format!(
                "{} is missing {}",
                dir.display(),
                missing.join(", ")
            )));
        }

        let config_content = std::fs::read_to_string(dir.join(CONFIG_FILE))?;
        let config: BundleConfig = serde_json::from_str(&config_content).map_err(|e| {
            ResumeInsightError::ModelLoading(format!("Failed to parse {}: {}", CONFIG_FILE, e))
        })?;

        let vectorizer = TfidfVectorizer::from_json_file(&dir.join(VECTORIZER_FILE))?;
        let classifier = LinearClassifier::from_safetensors(&dir.join(CLASSIFIER_FILE), config.multi_class)?;
        let labels = LabelEncoder::from_json_file(&dir.join(LABELS_FILE))?;

        info!(
            "Loaded {} bundle from {} ({} terms, {} labels)",
            config.model_type,
            dir.display(),
            vectorizer.vocabulary_size(),
            labels.n_labels()
        );

        Ok(Self::new(Box::new(vectorizer), Box::new(classifier), Box::new(labels)))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Two-role bundle over the vocabulary java, spring, python
    pub fn write_bundle(dir: &Path, coef: &[f32], rows: usize, cols: usize, intercept: &[f32]) {
        let coef_bytes: Vec<u8> = coef.iter().flat_map(|v| v.to_le_bytes()).collect();
        let intercept_bytes: Vec<u8> = intercept.iter().flat_map(|v| v.to_le_bytes()).collect();
        let tensors = vec![
            ("coef", TensorView::new(Dtype::F32, vec![rows, cols], &coef_bytes).unwrap()),
            ("intercept", TensorView::new(Dtype::F32, vec![rows], &intercept_bytes).unwrap()),
        ];
        let bytes = safetensors::tensor::serialize(tensors, &None).unwrap();
        std::fs::write(dir.join(CLASSIFIER_FILE), bytes).unwrap();

        std::fs::write(dir.join(CONFIG_FILE), r#"{"model_type": "logistic_regression", "multi_class": "multinomial"}"#).unwrap();
        std::fs::write(
            dir.join(VECTORIZER_FILE),
            r#"{"vocabulary": {"java": 0, "spring": 1, "python": 2}, "norm": null}"#,
        )
        .unwrap();
        std::fs::write(dir.join(LABELS_FILE), r#"["Java Developer", "Python Developer"]"#).unwrap();
    }
}
