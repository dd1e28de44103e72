//! Error types for loading spreadsheets and parsing user selections

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single upload attempt.
///
/// Both variants are terminal for the attempt: the caller keeps whatever
/// record set it had before.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read from storage
    #[error("failed to read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a usable spreadsheet
    #[error("failed to process file: {reason}")]
    Decode { reason: String },
}

impl LoadError {
    pub fn decode(reason: impl Into<String>) -> Self {
        LoadError::Decode {
            reason: reason.into(),
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, LoadError::Decode { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month filter '{input}': expected 'all' or a month number 1-12")]
pub struct ParseMonthFilterError {
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid view '{input}': expected overview, procedures or financial")]
pub struct ParseViewError {
    pub input: String,
}
