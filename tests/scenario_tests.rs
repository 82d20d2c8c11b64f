use sqlrisk::analyze_query;
use sqlrisk::classifier::override_guard::{apply_override, OverrideRule};
use sqlrisk::classifier::pipeline;
use sqlrisk::classifier::risk::RiskLabel;
use sqlrisk::classifier::risk_scorer::score_metadata;

mod support;

#[test]
fn wide_scan_of_filtered_fact_table() {
    let meta = analyze_query(
        "SELECT * FROM big_sales_table WHERE amount > 500",
        &support::sales_catalog(),
    );

    assert_eq!(meta.num_tables, 1);
    assert_eq!(meta.num_joins, 0);
    assert_eq!(meta.num_filters, 1);
    assert_eq!(meta.select_star, 1);
    assert_eq!(meta.estimated_table_size_max, 10_000_000);
    assert_eq!(meta.estimated_join_output, 1_000_000);
    assert_eq!(meta.estimated_output_rows, 1_000_000);
    assert!(
        (meta.estimated_sort_cost - 19_931_568.57).abs() < 0.01,
        "sort cost was {}",
        meta.estimated_sort_cost
    );
    assert_eq!(meta.select_star_columns_estimate, 4);
    assert_eq!(meta.cartesian_join, 0);

    // 2 (10M rows) + 3 (SELECT * over 1M rows)
    let scored = score_metadata(&meta);
    assert_eq!(scored.score, 5);
    assert_eq!(scored.label, RiskLabel::Medium);

    // Below the 20M threshold the guard leaves the classifier alone.
    let decision = apply_override(&meta, RiskLabel::Low, Some([0.6, 0.3, 0.1]));
    assert_eq!(decision.class, RiskLabel::Low);
    assert_eq!(decision.overridden_by, None);
}

#[test]
fn tautological_join_forces_high_regardless_of_classifier() {
    let sql = "SELECT o.order_id FROM orders o \
               JOIN products p ON o.id = p.id \
               JOIN dim_date d ON 1=1";
    let meta = support::analyze(sql);
    assert_eq!(meta.num_joins, 2);
    assert_eq!(meta.cartesian_join, 1);

    let classifier = support::FixedClassifier::new(RiskLabel::Low, Some([1.0, 0.0, 0.0]));
    let prediction =
        pipeline::predict(sql, &support::catalog(), &classifier).expect("prediction should succeed");
    assert_eq!(prediction.class, RiskLabel::High);
    assert_eq!(prediction.probabilities, Some([0.0, 0.0, 1.0]));
    assert_eq!(prediction.overridden_by, Some(OverrideRule::CartesianJoin));

    assert_eq!(score_metadata(&meta).label, RiskLabel::High);
}

#[test]
fn query_without_tables_scores_only_the_size_tier() {
    let meta = support::analyze("SELECT 1 + 1");
    assert_eq!(meta.num_tables, 0);
    assert_eq!(meta.num_joins, 0);
    assert_eq!(meta.num_filters, 0);
    assert_eq!(meta.estimated_table_size_max, 0);
    assert_eq!(meta.estimated_join_output, 0);
    assert_eq!(meta.estimated_output_rows, 0);
    assert_eq!(meta.estimated_sort_cost, 0.0);

    let scored = score_metadata(&meta);
    assert_eq!(scored.score, 1);
    assert_eq!(scored.label, RiskLabel::Low);
}

#[test]
fn select_star_on_huge_table_is_forced_high() {
    let sql = "SELECT * FROM huge_events LIMIT 10";
    let classifier = support::FixedClassifier::new(RiskLabel::Low, Some([0.8, 0.15, 0.05]));
    let prediction =
        pipeline::predict(sql, &support::catalog(), &classifier).expect("prediction should succeed");
    assert_eq!(prediction.metadata.has_limit, 1);
    assert_eq!(prediction.class, RiskLabel::High);
    assert_eq!(prediction.probabilities, Some([0.0, 0.1, 0.9]));
    assert_eq!(
        prediction.overridden_by,
        Some(OverrideRule::WideScanOfHugeTable)
    );
}
