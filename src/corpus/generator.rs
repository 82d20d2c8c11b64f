use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::analyzer::metadata::QueryMetadata;
use crate::analyzer::query_analyzer::analyze_query;
use crate::catalog::table_catalog::TableCatalog;
use crate::classifier::risk::RiskLabel;
use crate::classifier::risk_scorer::label_from_metadata;

/// A table the synthetic generator draws from, with the row count used for
/// labelling queries based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorTable {
    /// Table name.
    pub name: &'static str,
    /// Row count used as `estimated_table_size_max` when labelling.
    pub rows: u64,
    /// Column count.
    pub columns: u32,
}

/// Tables used for synthetic queries.
pub const GENERATOR_TABLES: [GeneratorTable; 9] = [
    GeneratorTable { name: "small_table", rows: 10_000, columns: 4 },
    GeneratorTable { name: "mid_table", rows: 200_000, columns: 6 },
    GeneratorTable { name: "big_sales_table", rows: 10_000_000, columns: 8 },
    GeneratorTable { name: "huge_events", rows: 50_000_000, columns: 10 },
    GeneratorTable { name: "user_master", rows: 1_000_000, columns: 5 },
    GeneratorTable { name: "geo_dim", rows: 2_000_000, columns: 4 },
    GeneratorTable { name: "orders", rows: 5_000_000, columns: 6 },
    GeneratorTable { name: "products", rows: 500_000, columns: 6 },
    GeneratorTable { name: "reviews", rows: 3_000_000, columns: 6 },
];

/// Shape of one synthetic query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryShape {
    /// Equality joins on `id`.
    pub num_joins: usize,
    /// Times the query is replaced by `SELECT * FROM (<inner>) sub`.
    pub nested: usize,
    /// Append `GROUP BY`.
    pub groupby: bool,
    /// Append `ORDER BY`.
    pub orderby: bool,
    /// Number of `AND`-joined range predicates.
    pub filters: usize,
    /// Project `*` instead of `t0.id`.
    pub select_star: bool,
}

/// One labelled training example.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusRecord {
    /// Generated query text.
    pub sql: String,
    /// Extracted signals, with the table size taken from the generator table.
    pub metadata: QueryMetadata,
    /// Label from the deterministic risk scorer.
    pub label: RiskLabel,
}

fn random_table<R: Rng + ?Sized>(rng: &mut R) -> &'static GeneratorTable {
    &GENERATOR_TABLES[rng.gen_range(0..GENERATOR_TABLES.len())]
}

fn weighted<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> usize {
    match WeightedIndex::new(weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0,
    }
}

/// Draw a query shape with the corpus' fixed frequencies.
pub fn random_shape<R: Rng + ?Sized>(rng: &mut R) -> QueryShape {
    QueryShape {
        num_joins: weighted(rng, &[0.5, 0.25, 0.2, 0.05]),
        nested: weighted(rng, &[0.85, 0.13, 0.02]),
        groupby: rng.gen_bool(0.3),
        orderby: rng.gen_bool(0.3),
        filters: weighted(rng, &[0.6, 0.3, 0.1]),
        select_star: rng.gen_bool(0.4),
    }
}

/// Build the SQL text for a shape; returns the query and its base table.
///
/// Nesting replaces the whole query built so far, joins included.
pub fn generate_query<R: Rng + ?Sized>(
    rng: &mut R,
    shape: &QueryShape,
) -> (String, &'static GeneratorTable) {
    let base = random_table(rng);
    let projection = if shape.select_star { "*" } else { "t0.id" };
    let mut sql = format!("SELECT {projection} FROM {} t0", base.name);

    for j in 1..=shape.num_joins {
        let joined = random_table(rng);
        sql.push_str(&format!(" JOIN {} t{j} ON t0.id = t{j}.id", joined.name));
    }

    for _ in 0..shape.nested {
        let inner = format!("SELECT id FROM {}", random_table(rng).name);
        sql = format!("SELECT * FROM ({inner}) sub");
    }

    if shape.filters > 0 {
        let predicates: Vec<String> = (0..shape.filters)
            .map(|i| format!("t0.col{i} > {}", rng.gen_range(10..=1000)))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    if shape.groupby {
        sql.push_str(" GROUP BY t0.id");
    }
    if shape.orderby {
        sql.push_str(" ORDER BY t0.id");
    }
    (sql, base)
}

/// Generate `count` labelled queries, reproducibly for a given `seed`.
pub fn generate_corpus(count: usize, seed: u64, catalog: &TableCatalog) -> Vec<CorpusRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let shape = random_shape(&mut rng);
            let (sql, base) = generate_query(&mut rng, &shape);
            let mut metadata = analyze_query(&sql, catalog);
            metadata.estimated_table_size_max = base.rows;
            let label = label_from_metadata(&metadata);
            CorpusRecord {
                sql,
                metadata,
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_shape_builds_a_single_table_select() {
        let mut rng = StdRng::seed_from_u64(7);
        let shape = QueryShape {
            num_joins: 0,
            nested: 0,
            groupby: false,
            orderby: false,
            filters: 0,
            select_star: false,
        };
        let (sql, base) = generate_query(&mut rng, &shape);
        assert_eq!(sql, format!("SELECT t0.id FROM {} t0", base.name));
    }

    #[test]
    fn joins_filters_and_clauses_are_appended_in_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let shape = QueryShape {
            num_joins: 2,
            nested: 0,
            groupby: true,
            orderby: true,
            filters: 2,
            select_star: true,
        };
        let (sql, _) = generate_query(&mut rng, &shape);
        assert!(sql.starts_with("SELECT * FROM "));
        assert!(sql.contains(" t1 ON t0.id = t1.id JOIN "));
        assert!(sql.contains(" t2 ON t0.id = t2.id WHERE t0.col0 > "));
        assert!(sql.contains(" AND t0.col1 > "));
        assert!(sql.ends_with(" GROUP BY t0.id ORDER BY t0.id"));
    }

    #[test]
    fn nesting_replaces_the_outer_query() {
        let mut rng = StdRng::seed_from_u64(3);
        let shape = QueryShape {
            num_joins: 3,
            nested: 1,
            groupby: false,
            orderby: false,
            filters: 0,
            select_star: false,
        };
        let (sql, _) = generate_query(&mut rng, &shape);
        assert!(sql.starts_with("SELECT * FROM (SELECT id FROM "));
        assert!(sql.ends_with(") sub"));
        assert!(!sql.contains("JOIN"));
    }

    #[test]
    fn corpus_is_reproducible_and_labelled_with_generator_sizes() {
        let catalog = TableCatalog::builtin();
        let first = generate_corpus(25, 42, &catalog);
        let second = generate_corpus(25, 42, &catalog);
        assert_eq!(first, second);
        assert_eq!(first.len(), 25);
        for record in &first {
            assert!(GENERATOR_TABLES
                .iter()
                .any(|t| t.rows == record.metadata.estimated_table_size_max));
            assert_eq!(record.label, label_from_metadata(&record.metadata));
        }
    }
}
