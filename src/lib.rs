pub mod column;
pub mod deposit;
pub mod error;
pub mod filter;
pub mod format;
pub mod number;

use crate::error::PipelineError;
use csv::{Reader, ReaderBuilder};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reader for the positional tables both stages consume. Headers are handled
/// by the caller and rows may have any number of fields.
pub fn table_reader<R: Read>(rdr: R) -> Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr)
}

pub fn open_table(path: &Path) -> Result<Reader<File>, PipelineError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PipelineError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Io(e),
    })?;

    Ok(table_reader(file))
}
