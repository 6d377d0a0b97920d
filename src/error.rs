//! Crate error type.
//!
//! Statistic functions report undefined results as `None`; this type covers
//! the operations that can genuinely fail: building frames, looking up
//! columns, constructing samplers, and rendering.

use thiserror::Error;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by frame handling, sampling, and rendering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("frame has no columns")]
    EmptyFrame,

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("column {name} has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("unknown correlation method: {0} (expected pearson, spearman or kendall)")]
    UnknownMethod(String),

    #[error("invalid parameter for {distribution}: {message}")]
    InvalidParameter {
        distribution: &'static str,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} is undefined for this data")]
    Undefined(&'static str),

    #[error("cannot build histogram for {0}: fewer than 2 finite values or zero range")]
    EmptyHistogram(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
