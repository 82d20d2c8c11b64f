use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SqlRiskError};
use crate::parser::names::normalize_relation_name;

/// Row count assumed for a table the catalog does not know.
pub const DEFAULT_ROW_COUNT: u64 = 1000;

const BUILTIN_TABLES: &[(&str, u64, &[&str])] = &[
    ("small_table", 100, &["id", "value", "ts"]),
    ("mid_table", 50_000, &["id", "col1", "col2", "ts"]),
    (
        "big_sales_table",
        10_000_000,
        &["id", "user_id", "amount", "transaction_date"],
    ),
    ("huge_events", 50_000_000, &["event_id", "ts", "payload", "user_id"]),
    ("user_master", 1_000_000, &["user_id", "name", "region", "created_at"]),
    ("orders", 7_000_000, &["order_id", "user_id", "price", "order_date"]),
    ("products", 500_000, &["product_id", "name", "category", "price"]),
    ("clickstream", 20_000_000, &["event_id", "user_id", "event_type", "ts"]),
    ("dim_date", 3650, &["date", "is_holiday", "year", "month"]),
    ("small_lookup", 1000, &["id", "val"]),
];

/// Cardinality and schema for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Estimated number of rows.
    #[serde(default)]
    pub row_count: u64,
    /// Column names in declaration order.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl TableEntry {
    /// Build an entry from a row count and column names.
    pub fn new<I, S>(row_count: u64, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            row_count,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Static reference data: table name → estimated cardinality and columns.
///
/// Built once (from JSON or [`TableCatalog::builtin`]) and then shared
/// read-only between analyses. Names are stored and looked up in their
/// normalized form, so `public.Orders` and `orders` are the same table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCatalog {
    tables: HashMap<String, TableEntry>,
}

impl TableCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference tables used when no catalog file is supplied.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (name, rows, columns) in BUILTIN_TABLES {
            catalog.insert(name, TableEntry::new(*rows, columns.iter().copied()));
        }
        catalog
    }

    /// Parse a catalog from a JSON object of `name → {row_count, columns}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.load_from_json(json)?;
        Ok(catalog)
    }

    /// Merge entries from a JSON string; entries already present are replaced.
    pub fn load_from_json(&mut self, json: &str) -> Result<()> {
        let parsed: HashMap<String, TableEntry> =
            serde_json::from_str(json).map_err(SqlRiskError::CatalogJson)?;
        for (name, entry) in parsed {
            self.insert(&name, entry);
        }
        Ok(())
    }

    /// Read and parse a catalog file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SqlRiskError::io(path, e))?;
        Self::from_json(&content)
    }

    /// Add or replace a table entry.
    pub fn insert(&mut self, name: &str, entry: TableEntry) {
        self.tables.insert(normalize_relation_name(name), entry);
    }

    /// Look up a table by (possibly qualified or quoted) name.
    pub fn get(&self, name: &str) -> Option<&TableEntry> {
        self.tables.get(&normalize_relation_name(name))
    }

    /// Row count of a table, or [`DEFAULT_ROW_COUNT`] when unknown.
    pub fn row_count_or_default(&self, name: &str) -> u64 {
        self.get(name).map_or(DEFAULT_ROW_COUNT, |t| t.row_count)
    }

    /// Number of known columns of a table, 0 when unknown.
    pub fn column_count(&self, name: &str) -> usize {
        self.get(name).map_or(0, |t| t.columns.len())
    }

    /// Iterate over `(name, entry)` pairs in no particular order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &TableEntry)> {
        self.tables.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of tables in the catalog.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when the catalog has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
