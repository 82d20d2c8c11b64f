use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete risk tier of a query, ordered by severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLabel {
    /// Cheap query.
    #[default]
    Low,
    /// Noticeable cost; worth a look.
    Medium,
    /// Likely to be expensive or runaway.
    High,
}

impl RiskLabel {
    /// All labels, from least to most severe.
    pub const ALL: [RiskLabel; 3] = [RiskLabel::Low, RiskLabel::Medium, RiskLabel::High];

    /// Class index used by classifiers and the training corpus (0, 1, 2).
    pub fn index(self) -> usize {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::Medium => 1,
            RiskLabel::High => 2,
        }
    }

    /// Label for a class index, `None` outside `0..=2`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Probability vector with all mass on this label.
    pub fn one_hot(self) -> [f64; 3] {
        let mut probabilities = [0.0; 3];
        probabilities[self.index()] = 1.0;
        probabilities
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "LOW"),
            RiskLabel::Medium => write!(f, "MEDIUM"),
            RiskLabel::High => write!(f, "HIGH"),
        }
    }
}

impl std::str::FromStr for RiskLabel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" | "0" => Ok(RiskLabel::Low),
            "MEDIUM" | "1" => Ok(RiskLabel::Medium),
            "HIGH" | "2" => Ok(RiskLabel::High),
            _ => Err(format!("Invalid risk label: {s}")),
        }
    }
}
