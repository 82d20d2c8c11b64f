use crate::analyzer::cost_estimator::{self, CostInputs};
use crate::analyzer::metadata::QueryMetadata;
use crate::catalog::table_catalog::TableCatalog;
use crate::parser::normalize::normalize;
use crate::parser::scanner;

/// Analyze a raw query: normalize, scan, and estimate costs against `catalog`.
///
/// Accepts anything, including empty and non-SQL text; signals that cannot
/// be recognized are reported as zero.
pub fn analyze_query(sql: &str, catalog: &TableCatalog) -> QueryMetadata {
    let normalized = normalize(sql);
    let features = scanner::scan(&normalized);
    let cost = cost_estimator::estimate(
        &CostInputs {
            tables: &features.tables,
            num_joins: features.num_joins,
            num_filters: features.num_filters,
            has_groupby: features.has_groupby,
            num_aggregates: features.num_aggregates,
            select_star: features.select_star,
        },
        catalog,
    );

    let metadata = QueryMetadata {
        num_tables: u32::try_from(features.tables.len()).unwrap_or(u32::MAX),
        num_joins: features.num_joins,
        num_filters: features.num_filters,
        num_subqueries: features.num_subqueries,
        subquery_depth: features.subquery_depth,
        num_aggregates: features.num_aggregates,
        has_groupby: u8::from(features.has_groupby),
        has_orderby: u8::from(features.has_orderby),
        has_limit: u8::from(features.has_limit),
        select_star: u8::from(features.select_star),
        window_functions: u8::from(features.window_functions),
        udf_usage: u8::from(features.udf_usage),
        s3_scan: u8::from(features.s3_scan),
        cartesian_join: u8::from(features.cartesian_join),
        query_length: features.query_length,
        estimated_table_size_max: cost.estimated_table_size_max,
        estimated_join_output: cost.estimated_join_output,
        estimated_output_rows: cost.estimated_output_rows,
        estimated_sort_cost: cost.estimated_sort_cost,
        select_star_columns_estimate: cost.select_star_columns_estimate,
    };

    tracing::debug!(
        tables = ?features.tables,
        joins = metadata.num_joins,
        cartesian = metadata.cartesian_join,
        max_rows = metadata.estimated_table_size_max,
        "analyzed query"
    );
    metadata
}
