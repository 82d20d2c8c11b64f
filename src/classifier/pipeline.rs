use serde::Serialize;

use crate::analyzer::metadata::QueryMetadata;
use crate::analyzer::query_analyzer::analyze_query;
use crate::catalog::table_catalog::TableCatalog;
use crate::classifier::model::{Classifier, Explanation};
use crate::classifier::override_guard::{apply_override, forced_decision, OverrideRule};
use crate::classifier::risk::RiskLabel;
use crate::error::Result;

/// Whether an explanation accompanies a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExplanationStatus {
    /// The classifier explained its prediction.
    Available(Explanation),
    /// The classifier has no explainer, or the classifier itself did not run.
    Unavailable,
    /// The explainer ran and failed.
    Failed {
        /// Error message from the explainer.
        message: String,
    },
}

/// Risk prediction for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Final risk tier.
    pub class: RiskLabel,
    /// Probabilities for LOW, MEDIUM, HIGH, when known.
    pub probabilities: Option<[f64; 3]>,
    /// Signals the prediction was based on.
    pub metadata: QueryMetadata,
    /// Explanation of the classifier's raw prediction (computed before overrides).
    pub explanation: ExplanationStatus,
    /// Hard rule that replaced the classifier's output, if any.
    pub overridden_by: Option<OverrideRule>,
}

/// Analyze `sql`, classify it, and apply the override guard.
///
/// When the classifier fails but a hard rule applies, the forced decision is
/// returned instead of the error.
pub fn predict<C: Classifier + ?Sized>(
    sql: &str,
    catalog: &TableCatalog,
    classifier: &C,
) -> Result<Prediction> {
    let metadata = analyze_query(sql, catalog);
    let features = metadata.feature_vector(classifier.feature_names());

    let output = match classifier.classify(&features) {
        Ok(output) => output,
        Err(err) => {
            let Some(forced) = forced_decision(&metadata) else {
                return Err(err);
            };
            tracing::warn!(error = %err, "classifier failed, returning forced decision");
            return Ok(Prediction {
                class: forced.class,
                probabilities: forced.probabilities,
                metadata,
                explanation: ExplanationStatus::Unavailable,
                overridden_by: forced.overridden_by,
            });
        }
    };
    if !output.has_valid_probabilities() {
        tracing::warn!(probabilities = ?output.probabilities, "classifier returned invalid probabilities");
    }

    let explanation = match classifier.explain(&features, output.class) {
        Ok(Some(explanation)) => ExplanationStatus::Available(explanation),
        Ok(None) => ExplanationStatus::Unavailable,
        Err(err) => ExplanationStatus::Failed {
            message: err.to_string(),
        },
    };

    let decision = apply_override(&metadata, output.class, output.probabilities);
    Ok(Prediction {
        class: decision.class,
        probabilities: decision.probabilities,
        metadata,
        explanation,
        overridden_by: decision.overridden_by,
    })
}
