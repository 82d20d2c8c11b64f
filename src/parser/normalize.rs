/// Collapse every run of whitespace (spaces, tabs, newlines) into a single
/// space and trim the ends.
///
/// Total and idempotent: any input is accepted, and normalizing an already
/// normalized string returns it unchanged.
pub fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
