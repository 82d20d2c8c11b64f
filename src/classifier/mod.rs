/// The `Classifier` seam, its output types, and the rule-based baseline.
pub mod model;
/// Hard rules that force HIGH for catastrophic query patterns.
pub mod override_guard;
/// Analyze → classify → explain → guard.
pub mod pipeline;
/// The three-level [`risk::RiskLabel`].
pub mod risk;
/// Deterministic weighted scoring of query metadata.
pub mod risk_scorer;
