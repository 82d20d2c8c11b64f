//! Heuristic SQL structural analysis and cost-risk classification.
//!
//! Raw query text is normalized, scanned with pattern heuristics (no SQL
//! grammar), and combined with a table catalog into a fixed set of cost
//! signals. Those signals feed a deterministic risk scorer and an override
//! guard that can replace a statistical classifier's output.
#![warn(missing_docs)]

/// Query analysis: cost estimation and the fixed-schema metadata record.
pub mod analyzer;
/// Table catalog: row counts and columns used for cost estimation.
pub mod catalog;
/// Risk labels, deterministic scoring, override rules, and the prediction pipeline.
pub mod classifier;
/// Synthetic training corpus generation and CSV export.
pub mod corpus;
/// Crate error type.
pub mod error;
/// Markdown report and output file generation.
pub mod output;
/// Whitespace normalization, name handling, and the lexical feature scanner.
pub mod parser;

pub use analyzer::metadata::QueryMetadata;
pub use analyzer::query_analyzer::analyze_query;
pub use catalog::table_catalog::TableCatalog;
pub use classifier::risk::RiskLabel;
pub use error::{Result, SqlRiskError};
