//! Role classification over externally trained artifacts
//!
//! The vectorizer, classifier and label decoder are injected behind traits so
//! the adapter can run against exported bundles (see [`artifacts`]) or
//! deterministic test doubles alike.

pub mod artifacts;
pub mod store;

use crate::error::{Result, ResumeInsightError};
use crate::processing::normalizer::TextNormalizer;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Maps normalized text to a fixed-length feature vector
pub trait Vectorizer: Send + Sync {
    fn vocabulary_size(&self) -> usize;
    fn vectorize(&self, text: &str) -> Vec<f64>;
}

/// Maps a feature vector to a probability distribution over class indices
pub trait ProbabilisticClassifier: Send + Sync {
    fn n_features(&self) -> usize;
    fn n_classes(&self) -> usize;
    fn predict_probabilities(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// Maps a class index back to its role name
pub trait LabelDecoder: Send + Sync {
    fn n_labels(&self) -> usize;
    fn decode_label(&self, index: usize) -> Option<&str>;
}

/// The three externally produced objects the classifier is built from
pub struct ClassificationArtifacts {
    pub vectorizer: Box<dyn Vectorizer>,
    pub classifier: Box<dyn ProbabilisticClassifier>,
    pub decoder: Box<dyn LabelDecoder>,
}

impl ClassificationArtifacts {
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        classifier: Box<dyn ProbabilisticClassifier>,
        decoder: Box<dyn LabelDecoder>,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            decoder,
        }
    }
}

/// A role with the classifier's confidence as a percentage rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRole {
    pub role: String,
    pub confidence: f64,
}

/// Validated classifier adapter; immutable and shareable once loaded
pub struct RoleClassifier {
    normalizer: TextNormalizer,
    artifacts: ClassificationArtifacts,
}

impl RoleClassifier {
    pub const TOP_K: usize = 3;

    /// Validate the artifact triple. Dimension mismatches are configuration
    /// errors and must stop start-up.
    pub fn load(artifacts: ClassificationArtifacts) -> Result<Self> {
        let vocabulary_size = artifacts.vectorizer.vocabulary_size();
        let n_features = artifacts.classifier.n_features();
        if vocabulary_size != n_features {
            return Err(ResumeInsightError::Configuration(format!(
                "TF-IDF features ({}) != Model expects ({})",
                vocabulary_size, n_features
            )));
        }

        let n_classes = artifacts.classifier.n_classes();
        let n_labels = artifacts.decoder.n_labels();
        if n_classes != n_labels {
            return Err(ResumeInsightError::Configuration(format!(
                "Classifier outputs {} classes but the label decoder knows {} labels",
                n_classes, n_labels
            )));
        }
        if n_classes == 0 {
            return Err(ResumeInsightError::Configuration(
                "Classifier has an empty label space".to_string(),
            ));
        }

        info!(
            "Role classifier ready: {} features, {} roles",
            vocabulary_size, n_classes
        );

        Ok(Self {
            normalizer: TextNormalizer::new(),
            artifacts,
        })
    }

    /// Top roles for the raw resume text, highest confidence first
    pub fn classify(&self, text: &str) -> Result<Vec<RankedRole>> {
        let cleaned = self.normalizer.normalize(text);
        let features = self.artifacts.vectorizer.vectorize(&cleaned);
        if features.len() != self.vocabulary_size() {
            return Err(ResumeInsightError::Model(format!(
                "Vectorizer produced {} features, expected {}",
                features.len(),
                self.vocabulary_size()
            )));
        }

        let probabilities = self.artifacts.classifier.predict_probabilities(&features)?;
        if probabilities.len() != self.n_classes() {
            return Err(ResumeInsightError::Model(format!(
                "Classifier returned {} probabilities, expected {}",
                probabilities.len(),
                self.n_classes()
            )));
        }

        let ranked = top_indices(&probabilities, Self::TOP_K)
            .into_iter()
            .map(|index| {
                let role = self.artifacts.decoder.decode_label(index).ok_or_else(|| {
                    ResumeInsightError::Model(format!("No label for class index {}", index))
                })?;
                Ok(RankedRole {
                    role: role.to_string(),
                    confidence: confidence_percent(probabilities[index]),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(top) = ranked.first() {
            debug!("Top role '{}' at {:.2}%", top.role, top.confidence);
        }

        Ok(ranked)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.artifacts.vectorizer.vocabulary_size()
    }

    pub fn n_classes(&self) -> usize {
        self.artifacts.classifier.n_classes()
    }

    /// All role names in class-index order
    pub fn labels(&self) -> Vec<&str> {
        (0..self.artifacts.decoder.n_labels())
            .filter_map(|i| self.artifacts.decoder.decode_label(i))
            .collect()
    }
}

/// Indices of the `k` largest probabilities, descending. Equal probabilities
/// keep ascending index order; NaN ranks last.
pub fn top_indices(probabilities: &[f64], k: usize) -> Vec<usize> {
    let key = |i: usize| {
        let p = probabilities[i];
        if p.is_nan() {
            f64::NEG_INFINITY
        } else {
            p
        }
    };

    let mut indices: Vec<usize> = (0..probabilities.len()).collect();
    indices.sort_by(|&a, &b| key(b).total_cmp(&key(a)));
    indices.truncate(k);
    indices
}

/// Probability as a percentage rounded to two decimal places
pub fn confidence_percent(probability: f64) -> f64 {
    (probability * 100.0 * 100.0).round() / 100.0
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_top_three_with_tie_break_by_index() {
        let artifacts = fixed_artifacts(8, vec![0.1, 0.5, 0.3, 0.1], &["Zero", "One", "Two", "Three"]);
        let classifier = RoleClassifier::load(artifacts).unwrap();

        let ranked = classifier.classify("anything at all").unwrap();

        assert_eq!(
            ranked,
            vec![
                RankedRole { role: "One".into(), confidence: 50.0 },
                RankedRole { role: "Two".into(), confidence: 30.0 },
                RankedRole { role: "Zero".into(), confidence: 10.0 },
            ]
        );
    }

    #[test]
    fn test_fewer_labels_than_top_k() {
        let artifacts = fixed_artifacts(4, vec![0.25, 0.75], &["HR", "Sales"]);
        let classifier = RoleClassifier::load(artifacts).unwrap();

        let ranked = classifier.classify("").unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].role, "Sales");
        assert_eq!(ranked[1].role, "HR");
    }

    #[test]
    fn test_dimension_mismatch_fails_at_load() {
        let artifacts = ClassificationArtifacts::new(
            Box::new(FixedVectorizer { size: 100 }),
            Box::new(FixedClassifier {
                n_features: 90,
                distribution: vec![1.0],
            }),
            Box::new(Labels(vec!["Only".into()])),
        );

        let err = RoleClassifier::load(artifacts).err().unwrap();
        assert!(matches!(err, ResumeInsightError::Configuration(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_label_count_mismatch_fails_at_load() {
        let artifacts = fixed_artifacts(3, vec![0.5, 0.5], &["A", "B", "C"]);
        assert!(matches!(
            RoleClassifier::load(artifacts),
            Err(ResumeInsightError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_label_space_rejected() {
        let artifacts = fixed_artifacts(3, vec![], &[]);
        assert!(RoleClassifier::load(artifacts).is_err());
    }

    #[test]
    fn test_probability_count_violation_is_model_error() {
        struct Liar;
        impl ProbabilisticClassifier for Liar {
            fn n_features(&self) -> usize {
                2
            }
            fn n_classes(&self) -> usize {
                2
            }
            fn predict_probabilities(&self, _features: &[f64]) -> Result<Vec<f64>> {
                Ok(vec![1.0])
            }
        }

        let artifacts = ClassificationArtifacts::new(
            Box::new(FixedVectorizer { size: 2 }),
            Box::new(Liar),
            Box::new(Labels(vec!["A".into(), "B".into()])),
        );
        let classifier = RoleClassifier::load(artifacts).unwrap();

        assert!(matches!(classifier.classify("x"), Err(ResumeInsightError::Model(_))));
    }

    #[test]
    fn test_top_indices_ordering() {
        assert_eq!(top_indices(&[0.2, 0.2, 0.2, 0.4], 3), vec![3, 0, 1]);
        assert_eq!(top_indices(&[f64::NAN, 0.1, 0.9], 3), vec![2, 1, 0]);
        assert!(top_indices(&[], 3).is_empty());
    }

    #[test]
    fn test_confidence_rounding() {
        assert_eq!(confidence_percent(0.5), 50.0);
        assert_eq!(confidence_percent(0.123456), 12.35);
        assert_eq!(confidence_percent(0.3), 30.0);
        assert_eq!(confidence_percent(1.0), 100.0);
        // digits past single precision still decide the rounding
        assert_eq!(confidence_percent(0.12344999), 12.34);
        assert_eq!(confidence_percent(0.12345001), 12.35);
    }

    #[test]
    fn test_labels_in_index_order() {
        let artifacts = fixed_artifacts(1, vec![0.5, 0.5], &["First", "Second"]);
        let classifier = RoleClassifier::load(artifacts).unwrap();
        assert_eq!(classifier.labels(), vec!["First", "Second"]);
    }
}
