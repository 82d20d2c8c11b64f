/// Writes the markdown report and JSON predictions to disk.
pub mod formatter;
/// Builds a Markdown risk report from analyzed queries.
pub mod report;
