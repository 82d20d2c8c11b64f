use serde::Serialize;
use std::fmt;

use crate::analyzer::metadata::QueryMetadata;
use crate::classifier::risk::RiskLabel;

/// Table size above which `SELECT *` is forced to HIGH.
pub const HUGE_TABLE_ROWS: u64 = 20_000_000;

/// Probabilities reported when a cartesian join forces HIGH.
pub const CARTESIAN_PROBABILITIES: [f64; 3] = [0.0, 0.0, 1.0];
/// Probabilities reported when a wide scan of a huge table forces HIGH.
pub const WIDE_SCAN_PROBABILITIES: [f64; 3] = [0.0, 0.1, 0.9];

/// Hard rule that replaced the classifier's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideRule {
    /// A join predicate is missing or tautological.
    CartesianJoin,
    /// `SELECT *` over a table above [`HUGE_TABLE_ROWS`].
    WideScanOfHugeTable,
}

impl fmt::Display for OverrideRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideRule::CartesianJoin => write!(f, "cartesian join"),
            OverrideRule::WideScanOfHugeTable => {
                write!(f, "SELECT * on table over {HUGE_TABLE_ROWS} rows")
            }
        }
    }
}

/// Final class and probabilities after the guard has run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuardedDecision {
    /// Risk tier returned to the caller.
    pub class: RiskLabel,
    /// Probabilities for LOW, MEDIUM, HIGH, when known.
    pub probabilities: Option<[f64; 3]>,
    /// Rule that forced the decision, `None` when the classifier's output passed through.
    pub overridden_by: Option<OverrideRule>,
}

/// The forced decision for catastrophic patterns, if any applies.
///
/// Reads only `meta`, so it is usable even when no classifier output exists.
/// Rules are checked in precedence order; the first match wins.
pub fn forced_decision(meta: &QueryMetadata) -> Option<GuardedDecision> {
    let (rule, probabilities) = if meta.cartesian_join == 1 {
        (OverrideRule::CartesianJoin, CARTESIAN_PROBABILITIES)
    } else if meta.estimated_table_size_max > HUGE_TABLE_ROWS && meta.select_star == 1 {
        (OverrideRule::WideScanOfHugeTable, WIDE_SCAN_PROBABILITIES)
    } else {
        return None;
    };
    Some(GuardedDecision {
        class: RiskLabel::High,
        probabilities: Some(probabilities),
        overridden_by: Some(rule),
    })
}

/// Apply the hard rules to a classifier's output.
///
/// Returns the forced decision when a rule matches, otherwise the classifier's
/// class and probabilities unchanged.
pub fn apply_override(
    meta: &QueryMetadata,
    class: RiskLabel,
    probabilities: Option<[f64; 3]>,
) -> GuardedDecision {
    if let Some(forced) = forced_decision(meta) {
        tracing::debug!(rule = ?forced.overridden_by, predicted = %class, "classifier output overridden");
        return forced;
    }
    GuardedDecision {
        class,
        probabilities,
        overridden_by: None,
    }
}
