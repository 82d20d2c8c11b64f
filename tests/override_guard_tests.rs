use sqlrisk::classifier::model::{Classifier, ClassifierOutput, Explanation};
use sqlrisk::classifier::override_guard::{apply_override, forced_decision, OverrideRule};
use sqlrisk::classifier::pipeline::{self, ExplanationStatus};
use sqlrisk::classifier::risk::RiskLabel;
use sqlrisk::classifier::risk_scorer::label_from_metadata;
use sqlrisk::{QueryMetadata, SqlRiskError};

mod support;

#[test]
fn cartesian_override_ignores_every_classifier_answer() {
    let meta = support::analyze("SELECT * FROM orders a JOIN products b ON a.id > b.id");
    assert_eq!(meta.cartesian_join, 1);

    for class in RiskLabel::ALL {
        for probabilities in [None, Some([1.0, 0.0, 0.0]), Some([0.2, 0.2, 0.6])] {
            let decision = apply_override(&meta, class, probabilities);
            assert_eq!(decision.class, RiskLabel::High);
            assert_eq!(decision.probabilities, Some([0.0, 0.0, 1.0]));
            assert_eq!(decision.overridden_by, Some(OverrideRule::CartesianJoin));
        }
    }
}

#[test]
fn one_equals_one_anywhere_in_the_span_is_cartesian() {
    let meta = support::analyze(
        "SELECT a.x FROM small_table a JOIN mid_table b ON 1=1 AND a.id = b.id WHERE a.x > 0 \
         GROUP BY a.x",
    );
    assert_eq!(meta.cartesian_join, 1);
    assert!(forced_decision(&meta).is_some());
}

#[test]
fn cartesian_takes_precedence_over_wide_scan() {
    let meta = QueryMetadata {
        cartesian_join: 1,
        select_star: 1,
        estimated_table_size_max: 90_000_000,
        ..QueryMetadata::default()
    };
    let forced = forced_decision(&meta).expect("a rule should apply");
    assert_eq!(forced.overridden_by, Some(OverrideRule::CartesianJoin));
}

#[test]
fn scorer_agrees_with_guard_on_cartesian_joins() {
    let meta = support::analyze("SELECT id FROM orders o JOIN products p ON 1=1");
    let forced = forced_decision(&meta).expect("cartesian rule should apply");
    assert_eq!(label_from_metadata(&meta), forced.class);
}

#[test]
fn wide_scan_override_is_stricter_than_the_scorer() {
    // 3 (over 20M rows) + 3 (SELECT * over 1M rows)
    let meta = support::analyze("SELECT * FROM huge_events");
    assert_eq!(label_from_metadata(&meta), RiskLabel::Medium);

    let forced = forced_decision(&meta).expect("wide scan rule should apply");
    assert_eq!(forced.class, RiskLabel::High);
    assert_eq!(forced.probabilities, Some([0.0, 0.1, 0.9]));
}

#[test]
fn huge_table_without_star_is_left_to_the_classifier() {
    let meta = support::analyze("SELECT event_id FROM huge_events WHERE ts > 0");
    assert_eq!(meta.estimated_table_size_max, 50_000_000);
    assert!(forced_decision(&meta).is_none());
}

struct ExplainerFails;

impl Classifier for ExplainerFails {
    fn feature_names(&self) -> &[String] {
        &[]
    }

    fn classify(&self, _features: &[f64]) -> sqlrisk::Result<ClassifierOutput> {
        Ok(ClassifierOutput {
            class: RiskLabel::Medium,
            probabilities: Some([0.1, 0.8, 0.1]),
        })
    }

    fn explain(
        &self,
        _features: &[f64],
        _class: RiskLabel,
    ) -> sqlrisk::Result<Option<Explanation>> {
        Err(SqlRiskError::Explanation("tree shape mismatch".to_string()))
    }
}

#[test]
fn explanation_failure_is_reported_not_hidden() {
    let prediction = pipeline::predict("SELECT id FROM orders", &support::catalog(), &ExplainerFails)
        .expect("prediction should succeed");
    assert_eq!(prediction.class, RiskLabel::Medium);
    assert_eq!(
        prediction.explanation,
        ExplanationStatus::Failed {
            message: "Explanation failed: tree shape mismatch".to_string()
        }
    );
}

#[test]
fn classifier_without_explainer_reports_unavailable() {
    let classifier = support::FixedClassifier::new(RiskLabel::Low, None);
    let prediction = pipeline::predict("SELECT id FROM small_table", &support::catalog(), &classifier)
        .expect("prediction should succeed");
    assert_eq!(prediction.class, RiskLabel::Low);
    assert_eq!(prediction.probabilities, None);
    assert_eq!(prediction.explanation, ExplanationStatus::Unavailable);
}

#[test]
fn overrides_are_applied_after_explanation() {
    let classifier = sqlrisk::classifier::model::RuleBasedClassifier::new();
    let prediction = pipeline::predict(
        "SELECT * FROM huge_events",
        &support::catalog(),
        &classifier,
    )
    .expect("prediction should succeed");
    assert_eq!(
        prediction.overridden_by,
        Some(OverrideRule::WideScanOfHugeTable)
    );
    let ExplanationStatus::Available(explanation) = prediction.explanation else {
        panic!("rule-based classifier should explain");
    };
    assert!(explanation
        .contributions
        .iter()
        .any(|(feature, points)| feature == "select_star" && *points == 3.0));
}
