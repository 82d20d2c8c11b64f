#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sqlrisk::catalog::table_catalog::{TableCatalog, TableEntry};
use sqlrisk::classifier::model::{Classifier, ClassifierOutput, DEFAULT_MODEL_FEATURES};
use sqlrisk::classifier::risk::RiskLabel;
use sqlrisk::{analyze_query, QueryMetadata};

pub(crate) fn catalog() -> TableCatalog {
    TableCatalog::builtin()
}

/// Catalog with a single large fact table, as used in the documented scenarios.
pub(crate) fn sales_catalog() -> TableCatalog {
    let mut catalog = TableCatalog::new();
    catalog.insert(
        "big_sales_table",
        TableEntry::new(10_000_000, ["id", "user_id", "amount", "transaction_date"]),
    );
    catalog
}

pub(crate) fn analyze(sql: &str) -> QueryMetadata {
    analyze_query(sql, &catalog())
}

pub(crate) fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{nanos}"));
    std::fs::create_dir_all(&dir).expect("should create temp dir");
    dir
}

/// Classifier with the default model features that always answers with a fixed output.
pub(crate) struct FixedClassifier {
    pub features: Vec<String>,
    pub output: ClassifierOutput,
}

impl FixedClassifier {
    pub(crate) fn new(class: RiskLabel, probabilities: Option<[f64; 3]>) -> Self {
        Self {
            features: DEFAULT_MODEL_FEATURES.iter().map(ToString::to_string).collect(),
            output: ClassifierOutput {
                class,
                probabilities,
            },
        }
    }
}

impl Classifier for FixedClassifier {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn classify(&self, _features: &[f64]) -> sqlrisk::Result<ClassifierOutput> {
        Ok(self.output)
    }
}
