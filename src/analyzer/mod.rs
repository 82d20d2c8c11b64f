/// Row-count, join-output, and sort-cost estimates from scanned structure.
pub mod cost_estimator;
/// The fixed-schema [`metadata::QueryMetadata`] record and feature-vector helpers.
pub mod metadata;
/// End-to-end analysis of a raw query string.
pub mod query_analyzer;
