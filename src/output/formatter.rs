use std::path::{Component, Path};

use crate::error::{Result, SqlRiskError};
use crate::output::report::{self, AnalyzedQuery};

/// Write `<name>_report.md` and `<name>.json` into `output_dir`.
pub fn write_output(output_dir: &Path, name: &str, queries: &[AnalyzedQuery]) -> Result<()> {
    validate_output_name(name)?;

    std::fs::create_dir_all(output_dir).map_err(|e| SqlRiskError::io(output_dir, e))?;

    let report_path = output_dir.join(format!("{name}_report.md"));
    std::fs::write(&report_path, report::build_report(queries))
        .map_err(|e| SqlRiskError::io(&report_path, e))?;

    let json_path = output_dir.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(queries)?;
    std::fs::write(&json_path, json).map_err(|e| SqlRiskError::io(&json_path, e))?;

    tracing::info!(dir = %output_dir.display(), name, "wrote report");
    Ok(())
}

fn validate_output_name(name: &str) -> Result<()> {
    let invalid = |reason| SqlRiskError::InvalidOutputName {
        name: name.to_string(),
        reason,
    };
    if name.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return Err(invalid("absolute paths are not allowed"));
    }
    if candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return Err(invalid("traversal segments are not allowed"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("path separators are not allowed"));
    }
    Ok(())
}
