//! Delimited text files (COSMIC ships TSV, a few auxiliary tables are CSV)

use super::row::{Header, Row};
use super::{RecordSource, SourceError, SourceResult};
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
}

impl Format {
    /// `.csv` is comma separated, everything else is tab separated.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Format::Csv,
            _ => Format::Tsv,
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            Format::Csv => b',',
            Format::Tsv => b'\t',
        }
    }
}

/// A header-first delimited file on disk
#[derive(Debug, Clone)]
pub struct DelimitedFile {
    path: PathBuf,
    format: Format,
}

impl DelimitedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = Format::from_path(&path);
        Self { path, format }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> Format {
        self.format
    }

    fn format_error(&self, reason: impl ToString) -> SourceError {
        SourceError::Format {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl RecordSource for DelimitedFile {
    type Rows = Rows;

    fn rows(&self) -> SourceResult<Rows> {
        if !self.path.is_file() {
            return Err(SourceError::FileNotFound(self.path.clone()));
        }
        // COSMIC TSV exports contain bare quote characters inside free text,
        // so quoting is only honoured for CSV.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.format.delimiter())
            .quoting(self.format == Format::Csv)
            .flexible(true)
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| self.format_error(e))?;

        let header: HashMap<String, usize> = reader
            .headers()
            .map_err(|e| self.format_error(e))?
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();
        if header.is_empty() {
            return Err(self.format_error("missing header row"));
        }

        Ok(Rows {
            path: self.path.clone(),
            header: Arc::new(header),
            records: reader.into_records(),
        })
    }
}

/// Iterator over the data rows of a [`DelimitedFile`]
pub struct Rows {
    path: PathBuf,
    header: Header,
    records: csv::StringRecordsIntoIter<File>,
}

impl Iterator for Rows {
    type Item = SourceResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(match record {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                let values = record.iter().map(str::to_string).collect();
                Ok(Row::new(line, Arc::clone(&self.header), values))
            }
            Err(e) => Err(SourceError::Format {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        })
    }
}
