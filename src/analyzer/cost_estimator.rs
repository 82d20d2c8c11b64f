use std::collections::BTreeSet;

use crate::catalog::table_catalog::TableCatalog;

/// Fraction of rows assumed to survive when any filter is present.
pub const FILTER_SELECTIVITY: f64 = 0.1;
/// Fraction of rows assumed to survive each join after the first.
pub const PER_JOIN_SELECTIVITY: f64 = 0.05;
/// Fraction of rows left after a grouped aggregation.
pub const AGGREGATION_REDUCTION: f64 = 0.05;

/// Numeric cost signals derived from the scanned structure and the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostEstimate {
    /// Largest row count among referenced tables.
    pub estimated_table_size_max: u64,
    /// Rows expected after filters and joins.
    pub estimated_join_output: u64,
    /// Rows expected in the result.
    pub estimated_output_rows: u64,
    /// Comparison-sort cost of the result rows.
    pub estimated_sort_cost: f64,
    /// Total column count of referenced tables under `SELECT *`.
    pub select_star_columns_estimate: u64,
}

/// What the estimator needs from the scanner.
#[derive(Debug, Clone, Copy)]
pub struct CostInputs<'a> {
    /// Referenced tables.
    pub tables: &'a BTreeSet<String>,
    /// Number of joins.
    pub num_joins: u32,
    /// Number of filters.
    pub num_filters: u32,
    /// Whether `GROUP BY` is present.
    pub has_groupby: bool,
    /// Number of aggregate calls.
    pub num_aggregates: u32,
    /// Whether `SELECT *` is present.
    pub select_star: bool,
}

/// Combine the scanner output with catalog cardinalities.
pub fn estimate(inputs: &CostInputs<'_>, catalog: &TableCatalog) -> CostEstimate {
    let table_size_max = inputs
        .tables
        .iter()
        .map(|t| catalog.row_count_or_default(t))
        .max()
        .unwrap_or(0);

    let join_output = if inputs.tables.is_empty() {
        0
    } else {
        estimate_join_output(table_size_max, inputs.num_joins, inputs.num_filters)
    };

    // Zero rows stay zero under aggregation.
    let output_rows = if inputs.has_groupby && inputs.num_aggregates > 0 && join_output > 0 {
        aggregated_rows(join_output)
    } else {
        join_output
    };

    let select_star_columns = if inputs.select_star {
        inputs
            .tables
            .iter()
            .map(|t| catalog.column_count(t) as u64)
            .sum()
    } else {
        0
    };

    CostEstimate {
        estimated_table_size_max: table_size_max,
        estimated_join_output: join_output,
        estimated_output_rows: output_rows,
        estimated_sort_cost: sort_cost(output_rows),
        select_star_columns_estimate: select_star_columns,
    }
}

/// `max_size × filter_sel × join_sel^(joins-1)`, truncated and floored at 1.
pub fn estimate_join_output(table_size_max: u64, num_joins: u32, num_filters: u32) -> u64 {
    let filter_selectivity = if num_filters > 0 {
        FILTER_SELECTIVITY
    } else {
        1.0
    };
    let per_join_selectivity = if num_joins > 0 {
        PER_JOIN_SELECTIVITY
    } else {
        1.0
    };
    let exponent = f64::from(num_joins.saturating_sub(1));
    let estimate =
        table_size_max as f64 * filter_selectivity * per_join_selectivity.powf(exponent);
    (estimate as u64).max(1)
}

/// Grouped aggregation collapses the input to 5%, never below one row.
pub fn aggregated_rows(join_output: u64) -> u64 {
    ((join_output as f64 * AGGREGATION_REDUCTION) as u64).max(1)
}

/// `rows × log2(rows)`, zero for one row or fewer.
pub fn sort_cost(rows: u64) -> f64 {
    if rows <= 1 {
        return 0.0;
    }
    let rows = rows as f64;
    rows * rows.log2()
}
