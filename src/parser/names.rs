/// Return the identifier without surrounding double quotes.
pub fn unquote_identifier(ident: &str) -> &str {
    ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(ident)
}

/// Normalize an identifier for case-insensitive matching.
///
/// Trims whitespace, removes surrounding double quotes on a single identifier,
/// and lowercases the result.
pub fn normalize_identifier(ident: &str) -> String {
    unquote_identifier(ident.trim()).to_ascii_lowercase()
}

/// Split a potentially schema-qualified name into its dot-separated segments.
///
/// Dots inside quoted identifiers do not split, e.g. `"my.schema"."table.name"`.
pub fn split_qualified_name(name: &str) -> Vec<&str> {
    let mut in_quotes = false;
    let mut start = 0usize;
    let mut parts: Vec<&str> = Vec::new();

    for (idx, ch) in name.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => {
                parts.push(name[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(name[start..].trim());
    parts
}

/// Normalize an object name to its terminal relation identifier.
///
/// Examples:
/// - `"public.orders"` -> `"orders"`
/// - `"\"sales\".\"Orders\""` -> `"orders"`
/// - `"ORDERS"` -> `"orders"`
pub fn normalize_relation_name(name: &str) -> String {
    let parts = split_qualified_name(name.trim());
    let relation = parts.last().copied().unwrap_or_default();
    normalize_identifier(relation)
}

/// Turn a raw token captured after `FROM`/`JOIN` into a table reference.
///
/// Keeps only the last dot-segment, strips trailing punctuation, and folds to
/// lowercase. Returns `None` when nothing usable is left (e.g. `FROM sales.`).
pub fn table_name_from_token(token: &str) -> Option<String> {
    let relation = token.rsplit('.').next().unwrap_or(token);
    let relation = relation.split_whitespace().next()?;
    let relation = relation.trim_end_matches([',', ';', ')']);
    if relation.is_empty() {
        return None;
    }
    Some(relation.to_lowercase())
}
