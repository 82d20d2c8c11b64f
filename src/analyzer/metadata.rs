use serde::{Deserialize, Serialize};

/// Field names of [`QueryMetadata`] in their fixed export order.
pub const METADATA_FIELDS: [&str; 20] = [
    "num_tables",
    "num_joins",
    "num_filters",
    "num_subqueries",
    "subquery_depth",
    "num_aggregates",
    "has_groupby",
    "has_orderby",
    "has_limit",
    "select_star",
    "window_functions",
    "udf_usage",
    "s3_scan",
    "cartesian_join",
    "query_length",
    "estimated_table_size_max",
    "estimated_join_output",
    "estimated_output_rows",
    "estimated_sort_cost",
    "select_star_columns_estimate",
];

/// Structural and cost signals extracted from one query.
///
/// Flags are `0`/`1` so the record can be handed to a numeric classifier
/// as-is. Values are never changed after analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryMetadata {
    /// Distinct tables referenced after `FROM`/`JOIN`.
    pub num_tables: u32,
    /// `JOIN` keywords.
    pub num_joins: u32,
    /// Filter count, see the scanner for the formula.
    pub num_filters: u32,
    /// Nested `SELECT`s.
    pub num_subqueries: u32,
    /// Maximum parenthesis nesting.
    pub subquery_depth: u32,
    /// Aggregate function calls.
    pub num_aggregates: u32,
    /// `GROUP BY` present.
    pub has_groupby: u8,
    /// `ORDER BY` present.
    pub has_orderby: u8,
    /// `LIMIT` present.
    pub has_limit: u8,
    /// `SELECT *` present.
    pub select_star: u8,
    /// Window or ranking functions present.
    pub window_functions: u8,
    /// UDF language markers present.
    pub udf_usage: u8,
    /// Object-storage URIs present.
    pub s3_scan: u8,
    /// A join predicate is missing or tautological.
    pub cartesian_join: u8,
    /// Characters in the normalized query.
    pub query_length: u64,
    /// Largest referenced table, in rows.
    pub estimated_table_size_max: u64,
    /// Rows after filters and joins.
    pub estimated_join_output: u64,
    /// Rows in the result.
    pub estimated_output_rows: u64,
    /// `rows × log2(rows)` of the result.
    pub estimated_sort_cost: f64,
    /// Columns scanned by `SELECT *`.
    pub select_star_columns_estimate: u64,
}

impl QueryMetadata {
    /// All fields as `(name, value)` pairs in [`METADATA_FIELDS`] order.
    pub fn fields(&self) -> [(&'static str, f64); 20] {
        let values = [
            f64::from(self.num_tables),
            f64::from(self.num_joins),
            f64::from(self.num_filters),
            f64::from(self.num_subqueries),
            f64::from(self.subquery_depth),
            f64::from(self.num_aggregates),
            f64::from(self.has_groupby),
            f64::from(self.has_orderby),
            f64::from(self.has_limit),
            f64::from(self.select_star),
            f64::from(self.window_functions),
            f64::from(self.udf_usage),
            f64::from(self.s3_scan),
            f64::from(self.cartesian_join),
            self.query_length as f64,
            self.estimated_table_size_max as f64,
            self.estimated_join_output as f64,
            self.estimated_output_rows as f64,
            self.estimated_sort_cost,
            self.select_star_columns_estimate as f64,
        ];
        let mut out = [("", 0.0); 20];
        for (slot, (name, value)) in out.iter_mut().zip(METADATA_FIELDS.into_iter().zip(values)) {
            *slot = (name, value);
        }
        out
    }

    /// Look up a field by name; `None` for names that are not metadata fields.
    pub fn feature(&self, name: &str) -> Option<f64> {
        self.fields()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Values for the requested feature names, `0.0` for unknown names.
    pub fn feature_vector<S: AsRef<str>>(&self, names: &[S]) -> Vec<f64> {
        names
            .iter()
            .map(|name| {
                self.feature(name.as_ref()).unwrap_or_else(|| {
                    tracing::debug!(feature = name.as_ref(), "unknown feature defaults to 0");
                    0.0
                })
            })
            .collect()
    }

    /// Rebuild a record from a feature vector; missing fields default to 0.
    ///
    /// Inverse of [`QueryMetadata::feature_vector`] for the names it covers.
    pub fn from_feature_vector<S: AsRef<str>>(names: &[S], values: &[f64]) -> Self {
        let get = |field: &str| -> f64 {
            names
                .iter()
                .zip(values)
                .find(|(name, _)| name.as_ref() == field)
                .map_or(0.0, |(_, value)| value.max(0.0))
        };
        let flag = |field: &str| u8::from(get(field) > 0.0);
        Self {
            num_tables: get("num_tables") as u32,
            num_joins: get("num_joins") as u32,
            num_filters: get("num_filters") as u32,
            num_subqueries: get("num_subqueries") as u32,
            subquery_depth: get("subquery_depth") as u32,
            num_aggregates: get("num_aggregates") as u32,
            has_groupby: flag("has_groupby"),
            has_orderby: flag("has_orderby"),
            has_limit: flag("has_limit"),
            select_star: flag("select_star"),
            window_functions: flag("window_functions"),
            udf_usage: flag("udf_usage"),
            s3_scan: flag("s3_scan"),
            cartesian_join: flag("cartesian_join"),
            query_length: get("query_length") as u64,
            estimated_table_size_max: get("estimated_table_size_max") as u64,
            estimated_join_output: get("estimated_join_output") as u64,
            estimated_output_rows: get("estimated_output_rows") as u64,
            estimated_sort_cost: get("estimated_sort_cost"),
            select_star_columns_estimate: get("select_star_columns_estimate") as u64,
        }
    }
}
