//! Error taxonomy for the experience study pipeline
//!
//! Input problems (missing columns, bad enum codes, non-monotone tables) fail
//! fast before any simulation runs. The pipeline itself cannot error: all
//! table lookups are clamped and every loop is bounded by the policy term.

use thiserror::Error;

/// Errors raised while loading or validating study inputs
#[derive(Debug, Error)]
pub enum StudyError {
    /// A required column is missing, ill-typed, or carries an unknown code
    #[error("schema error in {file}: {message}")]
    Schema { file: String, message: String },

    /// An assumption table violates its ordering or rate-range contract
    #[error("invalid {table} table: {message}")]
    Table {
        table: &'static str,
        message: String,
    },

    /// Underlying CSV parse failure, tagged with the offending file
    #[error("failed to read {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StudyError {
    /// Schema violation in a named input file
    pub fn schema(file: impl Into<String>, message: impl Into<String>) -> Self {
        StudyError::Schema {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Table contract violation
    pub fn table(table: &'static str, message: impl Into<String>) -> Self {
        StudyError::Table {
            table,
            message: message.into(),
        }
    }

    /// Wrap a CSV error with the file it came from
    pub fn csv(file: impl Into<String>, source: csv::Error) -> Self {
        StudyError::Csv {
            file: file.into(),
            source,
        }
    }
}
