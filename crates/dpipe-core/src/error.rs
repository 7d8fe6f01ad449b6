// crates/dpipe-core/src/error.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("Missing columns: {{{}}}.", join(.missing))]
    MissingColumns { missing: BTreeSet<String> },

    #[error("{actual} columns in data but {provided} names provided.")]
    ColumnCountMismatch { actual: usize, provided: usize },

    #[error("Duplicate column names: {{{}}}.", join(.names))]
    DuplicateColumns { names: BTreeSet<String> },

    #[error("{stage} does not implement `{operation}`; use `apply` instead")]
    Unsupported {
        stage: &'static str,
        operation: &'static str,
    },

    #[error("index has {labels} labels but the table has {rows} rows")]
    IndexLength { labels: usize, rows: usize },

    #[error("expression `{expr}` evaluated to {dtype}, expected a boolean mask")]
    NotAMask { expr: String, dtype: DataType },

    #[error("expression `{expr}` produced {found} values for {expected} rows")]
    EvalLength {
        expr: String,
        expected: usize,
        found: usize,
    },

    #[error("operator `{operator}` in `{expr}` is not supported; combine conditions with AND / OR")]
    UnsupportedOperator { expr: String, operator: char },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, StageError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read pipeline config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pipeline config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn join(names: &BTreeSet<String>) -> String {
    names
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
