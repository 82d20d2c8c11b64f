use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::names::table_name_from_token;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("scanner pattern should compile")
}

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bFROM\s+([A-Za-z0-9_.]+)|\bJOIN\s+([A-Za-z0-9_.]+)"));
// The span class excludes j/r/h/g in either case; terminators are consumed
// because none of them can contain the start of another `ON`.
static ON_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)\bON\s+([^JRHG]+?)(?:\bJOIN\b|\bWHERE\b|\bGROUP\b|\bORDER\b|\bHAVING\b|$)")
});
static JOIN_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bJOIN\b"));
static WHERE_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bWHERE\b"));
static AND_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bAND\b"));
static OR_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bOR\b"));
static SELECT_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bSELECT\b"));
static SELECT_STAR_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bSELECT\s+\*"));
static OVER_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bOVER\s*\("));
static RANKING_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bRANK\s*\(|\bROW_NUMBER\s*\(|\bNTILE\s*\("));
static UDF_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bPYTHON\b|\bR\(|\bJAVASCRIPT\b|\bUDF\b"));
static OBJECT_STORE_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)(s3://|gs://|https?://.+/.*\*)"));
static AGGREGATE_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\b(SUM|COUNT|AVG|MIN|MAX)\s*\("));
static GROUP_BY_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bGROUP\s+BY\b"));
static ORDER_BY_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bORDER\s+BY\b"));
static LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bLIMIT\b"));

/// Structural signals recognized in a normalized query by pattern matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalFeatures {
    /// Lowercased, deduplicated table references found after `FROM`/`JOIN`.
    pub tables: BTreeSet<String>,
    /// Number of `JOIN` keywords.
    pub num_joins: u32,
    /// `WHERE` plus boolean connectives beyond the first.
    pub num_filters: u32,
    /// `SELECT` keywords beyond the outermost one.
    pub num_subqueries: u32,
    /// Deepest parenthesis nesting seen.
    pub subquery_depth: u32,
    /// Aggregate function calls.
    pub num_aggregates: u32,
    /// `GROUP BY` is present.
    pub has_groupby: bool,
    /// `ORDER BY` is present.
    pub has_orderby: bool,
    /// `LIMIT` is present.
    pub has_limit: bool,
    /// `SELECT *` is present.
    pub select_star: bool,
    /// `OVER (` or a ranking function call is present.
    pub window_functions: bool,
    /// A user-defined-function language marker is present.
    pub udf_usage: bool,
    /// An object-storage URI is present.
    pub s3_scan: bool,
    /// Some `ON` span is tautological or has no equality.
    pub cartesian_join: bool,
    /// Length of the normalized text in characters.
    pub query_length: u64,
}

/// Scan a normalized query for structural signals.
///
/// Never fails: anything a pattern does not match contributes zero.
pub fn scan(sql: &str) -> LexicalFeatures {
    let (num_subqueries, subquery_depth) = subquery_stats(sql);
    LexicalFeatures {
        tables: find_tables(sql),
        num_joins: count(&JOIN_RE, sql),
        num_filters: count_filters(sql),
        num_subqueries,
        subquery_depth,
        num_aggregates: count(&AGGREGATE_RE, sql),
        has_groupby: GROUP_BY_RE.is_match(sql),
        has_orderby: ORDER_BY_RE.is_match(sql),
        has_limit: LIMIT_RE.is_match(sql),
        select_star: SELECT_STAR_RE.is_match(sql),
        window_functions: OVER_RE.is_match(sql) || RANKING_RE.is_match(sql),
        udf_usage: UDF_RE.is_match(sql),
        s3_scan: OBJECT_STORE_RE.is_match(sql),
        cartesian_join: contains_cartesian_on(sql),
        query_length: sql.chars().count() as u64,
    }
}

fn count(re: &Regex, sql: &str) -> u32 {
    u32::try_from(re.find_iter(sql).count()).unwrap_or(u32::MAX)
}

/// Table references following `FROM` or `JOIN`, schema qualifiers dropped.
pub fn find_tables(sql: &str) -> BTreeSet<String> {
    TABLE_RE
        .captures_iter(sql)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|token| table_name_from_token(token.as_str()))
        .collect()
}

/// `WHERE` counts once; every `AND`/`OR` after the first adds another filter.
pub fn count_filters(sql: &str) -> u32 {
    let where_count = u32::from(WHERE_RE.is_match(sql));
    let connectives = count(&AND_RE, sql) + count(&OR_RE, sql);
    where_count + connectives.saturating_sub(where_count)
}

/// Returns `(subquery_count, max_paren_depth)`.
///
/// Parentheses are counted wherever they appear, string literals included.
pub fn subquery_stats(sql: &str) -> (u32, u32) {
    let mut depth = 0u32;
    let mut max_depth = 0u32;
    for ch in sql.chars() {
        match ch {
            '(' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    let selects = count(&SELECT_RE, sql);
    (selects.saturating_sub(1), max_depth)
}

/// Join predicate spans, from `ON` up to the next clause keyword or end of text.
pub fn on_clause_spans(sql: &str) -> Vec<&str> {
    ON_CLAUSE_RE
        .captures_iter(sql)
        .filter_map(|caps| caps.get(1))
        .map(|span| span.as_str())
        .collect()
}

/// True when any `ON` span is `1=1`-tautological or has no `=` at all.
pub fn contains_cartesian_on(sql: &str) -> bool {
    on_clause_spans(sql)
        .into_iter()
        .any(|span| span.contains("1=1") || !span.contains('='))
}
