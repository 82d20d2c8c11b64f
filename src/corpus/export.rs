use std::io::Write;
use std::path::Path;

use crate::analyzer::metadata::METADATA_FIELDS;
use crate::corpus::generator::CorpusRecord;
use crate::error::{Result, SqlRiskError};

/// CSV header: `sql`, every metadata field in order, then `label`.
pub fn corpus_columns() -> Vec<&'static str> {
    std::iter::once("sql")
        .chain(METADATA_FIELDS)
        .chain(std::iter::once("label"))
        .collect()
}

/// Write records as CSV with a header row. Every row has every column.
pub fn write_corpus<W: Write>(writer: W, records: &[CorpusRecord]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(corpus_columns())?;
    for record in records {
        let mut row = Vec::with_capacity(METADATA_FIELDS.len() + 2);
        row.push(record.sql.clone());
        row.extend(
            record
                .metadata
                .fields()
                .iter()
                .map(|(_, value)| value.to_string()),
        );
        row.push(record.label.index().to_string());
        csv.write_record(&row)?;
    }
    csv.flush().map_err(|e| SqlRiskError::Csv(e.into()))?;
    Ok(())
}

/// Write the corpus to `path`, creating or truncating the file.
pub fn write_corpus_file(path: &Path, records: &[CorpusRecord]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| SqlRiskError::io(path, e))?;
    write_corpus(file, records)?;
    tracing::info!(path = %path.display(), rows = records.len(), "wrote training corpus");
    Ok(())
}
