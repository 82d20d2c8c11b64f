use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the fallible edges of the crate.
///
/// Query analysis itself never fails; these cover catalog loading, the
/// external classifier, and writing outputs.
#[derive(Debug, Error)]
pub enum SqlRiskError {
    /// The table catalog JSON could not be parsed.
    #[error("Invalid table catalog JSON: {0}")]
    CatalogJson(#[source] serde_json::Error),

    /// Predictions could not be serialized to JSON.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A file could not be read or written.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The training corpus could not be serialized.
    #[error("Failed to write training corpus: {0}")]
    Csv(#[from] csv::Error),

    /// The external classifier could not produce a prediction.
    #[error("Classifier failed: {0}")]
    Classifier(String),

    /// The classifier's explanation step failed (as opposed to being unavailable).
    #[error("Explanation failed: {0}")]
    Explanation(String),

    /// An output file name would escape the output directory.
    #[error("Invalid output name '{name}': {reason}")]
    InvalidOutputName {
        /// Rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },
}

impl SqlRiskError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T, E = SqlRiskError> = std::result::Result<T, E>;
