//! Record sources
//!
//! A [`RecordSource`] turns a file into a stream of [`Row`]s. Opening fails
//! with [`SourceError`]; a row that cannot be read is yielded as an error so
//! the caller can log it and continue with the next one.

mod delimited;
mod row;
mod tumor_types;

pub use delimited::{DelimitedFile, Format, Rows};
pub use row::{Header, RecordError, Row};
pub use tumor_types::TumorTypes;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot read {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Something that yields rows
pub trait RecordSource {
    type Rows: Iterator<Item = SourceResult<Row>> + Send + 'static;

    fn rows(&self) -> SourceResult<Self::Rows>;
}
