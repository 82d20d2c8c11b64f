use serde::Serialize;

use crate::analyzer::metadata::QueryMetadata;
use crate::classifier::risk::RiskLabel;

/// Upper bound (inclusive) of the smallest table-size tier.
pub const SMALL_TABLE_ROWS: u64 = 1_000_000;
/// Upper bound (inclusive) of the medium table-size tier.
pub const LARGE_TABLE_ROWS: u64 = 20_000_000;
/// Highest score still labelled LOW.
pub const LOW_MAX_SCORE: u32 = 4;
/// Highest score still labelled MEDIUM.
pub const MEDIUM_MAX_SCORE: u32 = 8;

/// A scoring rule that added points to a query's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreContribution {
    /// Metadata field the rule reads.
    pub feature: &'static str,
    /// Points added.
    pub points: u32,
}

/// Outcome of deterministic risk scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskScore {
    /// Accumulated score. Zero when the cartesian short-circuit fired.
    pub score: u32,
    /// Risk tier.
    pub label: RiskLabel,
    /// Rules that contributed, in evaluation order.
    pub contributions: Vec<ScoreContribution>,
    /// Set when a cartesian join forced HIGH without scoring.
    pub short_circuited: bool,
}

/// Map an accumulated score to a tier: `≤4` LOW, `5..=8` MEDIUM, `>8` HIGH.
pub fn label_for_score(score: u32) -> RiskLabel {
    match score {
        0..=LOW_MAX_SCORE => RiskLabel::Low,
        s if s <= MEDIUM_MAX_SCORE => RiskLabel::Medium,
        _ => RiskLabel::High,
    }
}

/// Score a query's metadata.
///
/// A cartesian join short-circuits to HIGH before any points are counted.
pub fn score_metadata(meta: &QueryMetadata) -> RiskScore {
    if meta.cartesian_join == 1 {
        return RiskScore {
            score: 0,
            label: RiskLabel::High,
            contributions: Vec::new(),
            short_circuited: true,
        };
    }

    let mut contributions = Vec::new();
    let mut add = |feature: &'static str, points: u32| {
        if points > 0 {
            contributions.push(ScoreContribution { feature, points });
        }
    };

    let rows = meta.estimated_table_size_max;
    let size_points = if rows <= SMALL_TABLE_ROWS {
        1
    } else if rows <= LARGE_TABLE_ROWS {
        2
    } else {
        3
    };
    add("estimated_table_size_max", size_points);
    add("num_joins", meta.num_joins.saturating_mul(2));
    add("num_subqueries", meta.num_subqueries.saturating_mul(2));
    add("subquery_depth", meta.subquery_depth);
    add("num_aggregates", u32::from(meta.num_aggregates > 0));
    add("has_orderby", u32::from(meta.has_orderby == 1));
    add("has_groupby", u32::from(meta.has_groupby == 1));
    add(
        "select_star",
        if meta.select_star == 1 && rows > SMALL_TABLE_ROWS {
            3
        } else {
            0
        },
    );

    let score = contributions
        .iter()
        .fold(0u32, |acc, c| acc.saturating_add(c.points));
    RiskScore {
        score,
        label: label_for_score(score),
        contributions,
        short_circuited: false,
    }
}

/// Risk tier of a query's metadata, as used for training labels.
pub fn label_from_metadata(meta: &QueryMetadata) -> RiskLabel {
    score_metadata(meta).label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_boundaries_are_inclusive() {
        assert_eq!(label_for_score(0), RiskLabel::Low);
        assert_eq!(label_for_score(4), RiskLabel::Low);
        assert_eq!(label_for_score(5), RiskLabel::Medium);
        assert_eq!(label_for_score(8), RiskLabel::Medium);
        assert_eq!(label_for_score(9), RiskLabel::High);
    }

    #[test]
    fn size_tiers() {
        let at = |rows| {
            score_metadata(&QueryMetadata {
                estimated_table_size_max: rows,
                ..QueryMetadata::default()
            })
            .score
        };
        assert_eq!(at(0), 1);
        assert_eq!(at(1_000_000), 1);
        assert_eq!(at(1_000_001), 2);
        assert_eq!(at(20_000_000), 2);
        assert_eq!(at(20_000_001), 3);
    }

    #[test]
    fn every_rule_contributes() {
        let meta = QueryMetadata {
            estimated_table_size_max: 5_000_000,
            num_joins: 2,
            num_subqueries: 1,
            subquery_depth: 1,
            num_aggregates: 3,
            has_orderby: 1,
            has_groupby: 1,
            select_star: 1,
            ..QueryMetadata::default()
        };
        let scored = score_metadata(&meta);
        // 2 + 4 + 2 + 1 + 1 + 1 + 1 + 3
        assert_eq!(scored.score, 15);
        assert_eq!(scored.label, RiskLabel::High);
        assert_eq!(scored.contributions.len(), 8);
    }

    #[test]
    fn select_star_on_small_table_adds_nothing() {
        let scored = score_metadata(&QueryMetadata {
            estimated_table_size_max: 1_000_000,
            select_star: 1,
            ..QueryMetadata::default()
        });
        assert_eq!(scored.score, 1);
        assert!(scored.contributions.iter().all(|c| c.feature != "select_star"));
    }

    #[test]
    fn cartesian_join_short_circuits_to_high() {
        let scored = score_metadata(&QueryMetadata {
            cartesian_join: 1,
            ..QueryMetadata::default()
        });
        assert_eq!(scored.label, RiskLabel::High);
        assert!(scored.short_circuited);
        assert!(scored.contributions.is_empty());
    }
}
