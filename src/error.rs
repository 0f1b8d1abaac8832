use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input file '{}' not found", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Could not convert value '{value}' on line {line} to an integer")]
    ColumnParse { value: String, line: u64 },

    #[error("Column '{0}' is not present in the header")]
    UnknownColumn(String),

    #[error("Token price must be non-zero")]
    ZeroTokenPrice,

    #[error("Required deposit is too large to represent")]
    ArithmeticOverflow,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
