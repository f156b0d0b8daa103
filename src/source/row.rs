//! Rows of named string fields and their coercions

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// A source row could not be turned into a typed record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("malformed record at line {line}: column '{column}' {reason}")]
    MalformedRecord {
        line: u64,
        column: String,
        reason: String,
    },
}

/// Column name to position, shared by every row of one file
pub type Header = Arc<HashMap<String, usize>>;

/// One row of a delimited file
#[derive(Debug, Clone)]
pub struct Row {
    line: u64,
    header: Header,
    values: Vec<String>,
}

impl Row {
    pub fn new(line: u64, header: Header, values: Vec<String>) -> Self {
        Self {
            line,
            header,
            values,
        }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs(line: u64, pairs: &[(&str, &str)]) -> Self {
        let header: HashMap<String, usize> = pairs
            .iter()
            .enumerate()
            .map(|(i, (column, _))| (column.to_string(), i))
            .collect();
        let values = pairs.iter().map(|(_, value)| value.to_string()).collect();
        Self::new(line, Arc::new(header), values)
    }

    /// 1-based line number in the source file
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Trimmed value, `None` if the column is absent
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .get(column)
            .and_then(|&i| self.values.get(i))
            .map(|v| v.trim())
    }

    /// Trimmed value, empty if the column is absent
    pub fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    /// Free text with embedded quote characters replaced by spaces
    pub fn remark(&self, column: &str) -> String {
        self.text(column).replace(['"', '\''], " ")
    }

    fn malformed(&self, column: &str, reason: impl Into<String>) -> RecordError {
        RecordError::MalformedRecord {
            line: self.line,
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    /// Non-blank value or `MalformedRecord`
    pub fn required_str(&self, column: &str) -> Result<String, RecordError> {
        match self.get(column) {
            None => Err(self.malformed(column, "is missing")),
            Some("") => Err(self.malformed(column, "is blank")),
            Some(value) => Ok(value.to_string()),
        }
    }

    /// Integer value or `MalformedRecord`
    pub fn required_int(&self, column: &str) -> Result<i64, RecordError> {
        let value = self.required_str(column)?;
        value
            .parse::<i64>()
            .map_err(|_| self.malformed(column, format!("is not an integer: '{}'", value)))
    }

    /// Integer value, 0 when absent or not numeric
    pub fn int_or_zero(&self, column: &str) -> i64 {
        self.get(column)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0)
    }

    /// Floating point value, 0.0 when absent or not numeric
    pub fn float_or_zero(&self, column: &str) -> f64 {
        self.get(column)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|f| f.is_finite())
            .unwrap_or(0.0)
    }

    /// `y`/`Y` is true, anything else false
    pub fn yes_no(&self, column: &str) -> bool {
        self.get(column).is_some_and(|v| v.eq_ignore_ascii_case("y"))
    }

    /// True when the column holds any non-blank value
    pub fn present(&self, column: &str) -> bool {
        self.get(column).is_some_and(|v| !v.is_empty())
    }

    /// Split on `delimiter`, trimming items and dropping blanks.
    pub fn list(&self, column: &str, delimiter: char) -> Vec<String> {
        split_list(&self.text(column), delimiter)
    }
}

fn split_list(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
