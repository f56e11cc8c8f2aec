use std::path::PathBuf;
use thiserror::Error;
use crate::models::Gender;

/// Errors that stop a matchmaking run before any pairs are produced
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not enough eligible {side} participants")]
    InsufficientParticipants { side: Gender },

    #[error("Unrecognized gender {gender:?} for {first} {last}")]
    UnrecognizedGender {
        first: String,
        last: String,
        gender: String,
    },

    #[error("Duplicate {gender} registrant: {identity}")]
    DuplicateIdentity { identity: String, gender: Gender },
}

/// Errors from reading or writing the CSV tables
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} is missing required column {column:?}")]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// Errors from a complete file-based run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

impl TableError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        TableError::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn csv(path: &std::path::Path, source: csv::Error) -> Self {
        TableError::Csv { path: path.to_path_buf(), source }
    }
}
