/// Identifier and table-name normalization helpers (schema-qualified names, quoted identifiers).
pub mod names;
/// Whitespace canonicalization of raw query text.
pub mod normalize;
/// Case-insensitive pattern scanning of structural query features.
pub mod scanner;
