use std::fmt::Write;

use serde::Serialize;

use crate::classifier::pipeline::Prediction;
use crate::classifier::risk::RiskLabel;

/// A query together with its prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedQuery {
    /// Query text as given.
    pub sql: String,
    /// Prediction for the query.
    pub prediction: Prediction,
}

/// Build a markdown report with a risk summary and one row per query.
pub fn build_report(queries: &[AnalyzedQuery]) -> String {
    let mut report = String::new();

    writeln!(report, "# sqlrisk Query Risk Report").unwrap();
    writeln!(report).unwrap();

    writeln!(report, "## Risk Summary").unwrap();
    writeln!(report).unwrap();
    writeln!(report, "| Risk | Queries |").unwrap();
    writeln!(report, "|------|---------|").unwrap();
    for label in RiskLabel::ALL {
        let count = queries
            .iter()
            .filter(|q| q.prediction.class == label)
            .count();
        writeln!(report, "| {label} | {count} |").unwrap();
    }

    if queries.is_empty() {
        return report;
    }

    writeln!(report).unwrap();
    writeln!(report, "## Queries").unwrap();
    writeln!(report).unwrap();
    writeln!(report, "| # | Query | Risk | Probabilities | Signals | Notes |").unwrap();
    writeln!(report, "|---|-------|------|---------------|---------|-------|").unwrap();

    for (idx, query) in queries.iter().enumerate() {
        let prediction = &query.prediction;
        writeln!(
            report,
            "| {} | `{}` | {} | {} | {} | {} |",
            idx + 1,
            escape_cell(&query.sql),
            prediction.class,
            format_probabilities(prediction.probabilities),
            format_signals(prediction),
            format_notes(prediction)
        )
        .unwrap();
    }

    report
}

fn escape_cell(text: &str) -> String {
    crate::parser::normalize::normalize(text)
        .replace('|', "\\|")
        .replace('`', "'")
}

fn format_probabilities(probabilities: Option<[f64; 3]>) -> String {
    match probabilities {
        Some([low, medium, high]) => format!("{low:.3} / {medium:.3} / {high:.3}"),
        None => "N/A".to_string(),
    }
}

fn format_signals(prediction: &Prediction) -> String {
    let meta = &prediction.metadata;
    format!(
        "tables={}, joins={}, filters={}, max_rows={}, out_rows={}, sort_cost={:.0}",
        meta.num_tables,
        meta.num_joins,
        meta.num_filters,
        meta.estimated_table_size_max,
        meta.estimated_output_rows,
        meta.estimated_sort_cost
    )
}

fn format_notes(prediction: &Prediction) -> String {
    let meta = &prediction.metadata;
    let mut notes = Vec::new();
    if let Some(rule) = prediction.overridden_by {
        notes.push(format!("OVERRIDE: {rule}"));
    }
    if meta.window_functions == 1 {
        notes.push("window functions".to_string());
    }
    if meta.udf_usage == 1 {
        notes.push("UDF".to_string());
    }
    if meta.s3_scan == 1 {
        notes.push("object storage scan".to_string());
    }
    notes.join("; ")
}
