use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a file on disk into an allotment [`Table`](crate::data::model::Table).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0} (expected .csv, .json, .parquet or .pq)")]
    UnsupportedFormat(String),

    #[error("table is missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has type {data_type}, which cannot be read as {expected}")]
    UnsupportedColumnType {
        column: String,
        data_type: String,
        expected: &'static str,
    },

    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no table configured: pass a path, set ALLOTMENT_TABLE, or set table_path in the config")]
    NoTable,
}
