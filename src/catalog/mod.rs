/// Immutable table-name → row count / column list reference data.
pub mod table_catalog;
