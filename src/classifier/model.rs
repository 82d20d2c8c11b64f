use serde::{Deserialize, Serialize};

use crate::analyzer::metadata::{QueryMetadata, METADATA_FIELDS};
use crate::classifier::risk::RiskLabel;
use crate::classifier::risk_scorer::score_metadata;
use crate::error::Result;

/// Feature names the statistical risk model is trained on.
///
/// Some of these (`estimated_scan_cost`, `estimated_memory_pressure`, ...) are
/// not produced by the analyzer and always resolve to `0.0`.
pub const DEFAULT_MODEL_FEATURES: [&str; 14] = [
    "num_tables",
    "num_joins",
    "num_filters",
    "num_subqueries",
    "query_length",
    "has_groupby",
    "has_orderby",
    "estimated_table_size_max",
    "estimated_scan_cost",
    "estimated_memory_pressure",
    "estimated_shuffle_risk",
    "estimated_skew_risk",
    "select_star",
    "select_star_columns_estimate",
];

/// What a classifier returns for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    /// Predicted tier.
    pub class: RiskLabel,
    /// Probabilities for LOW, MEDIUM, HIGH, if the model provides them.
    pub probabilities: Option<[f64; 3]>,
}

impl ClassifierOutput {
    /// True when the probabilities are finite, non-negative, and sum to 1.
    pub fn has_valid_probabilities(&self) -> bool {
        self.probabilities.map_or(true, |p| {
            p.iter().all(|v| v.is_finite() && *v >= 0.0)
                && (p.iter().sum::<f64>() - 1.0).abs() < 1e-6
        })
    }
}

/// Per-feature contributions to a prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// `(feature, contribution)` pairs in the classifier's feature order.
    pub contributions: Vec<(String, f64)>,
}

/// A risk classifier fed with numeric feature vectors.
///
/// Implementations wrap trained models; the crate ships only
/// [`RuleBasedClassifier`].
pub trait Classifier {
    /// Names of the features, in the order `classify` expects them.
    fn feature_names(&self) -> &[String];

    /// Predict a risk tier.
    fn classify(&self, features: &[f64]) -> Result<ClassifierOutput>;

    /// Explain a prediction.
    ///
    /// `Ok(None)` means this classifier has no explainer; `Err` means the
    /// explainer exists but failed.
    fn explain(&self, _features: &[f64], _class: RiskLabel) -> Result<Option<Explanation>> {
        Ok(None)
    }
}

/// Classifier backed by the deterministic risk scorer.
///
/// Gives one-hot probabilities and explains predictions with the points
/// each scoring rule added.
#[derive(Debug, Clone)]
pub struct RuleBasedClassifier {
    features: Vec<String>,
}

impl RuleBasedClassifier {
    /// Create a classifier reading every metadata field.
    pub fn new() -> Self {
        Self {
            features: METADATA_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }

    fn metadata(&self, features: &[f64]) -> QueryMetadata {
        QueryMetadata::from_feature_vector(&self.features, features)
    }
}

impl Default for RuleBasedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for RuleBasedClassifier {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn classify(&self, features: &[f64]) -> Result<ClassifierOutput> {
        let label = score_metadata(&self.metadata(features)).label;
        Ok(ClassifierOutput {
            class: label,
            probabilities: Some(label.one_hot()),
        })
    }

    fn explain(&self, features: &[f64], _class: RiskLabel) -> Result<Option<Explanation>> {
        let scored = score_metadata(&self.metadata(features));
        let contributions = scored
            .contributions
            .iter()
            .map(|c| (c.feature.to_string(), f64::from(c.points)))
            .collect();
        Ok(Some(Explanation { contributions }))
    }
}
