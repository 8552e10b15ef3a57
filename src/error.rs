//! Error types for anaquery

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid bin edge specification
    #[error("invalid binning: {0}")]
    Binning(String),

    /// Array-valued axes of one fill disagree in length
    #[error("{first}- and {second}-arrays do not share the same size ({first_len} vs {second_len})")]
    ShapeMismatch {
        first: &'static str,
        second: &'static str,
        first_len: usize,
        second_len: usize,
    },

    /// Merge called without any partial results
    #[error("cannot merge an empty list of partial results")]
    EmptyMerge,

    /// Histograms with different binning cannot be added
    #[error("cannot add '{other}' to '{this}': binning differs")]
    BinningMismatch { this: String, other: String },

    /// Semantically invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed line in a column file
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
