use std::path::PathBuf;

use thiserror::Error;

/// Why a source file could not be turned into a [`Table`](super::model::Table).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("unsupported file extension for {path}")]
    UnsupportedFormat { path: PathBuf },
}

impl LoadError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
