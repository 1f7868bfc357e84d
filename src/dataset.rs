//! Tabular input loading
//!
//! A thin, header-aware view over a CSV file, shared by the training
//! orchestrator and the batch prediction path. Rows stay as raw strings;
//! typed parsing happens at record construction.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// A parsed tabular file: header row plus raw string rows.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a CSV file from disk.
    pub fn read_path(path: &Path) -> Result<Self> {
        let reader = Self::reader_builder()
            .from_path(path)
            .with_context(|| format!("failed to open CSV at {}", path.display()))?;
        Self::from_csv_reader(reader)
    }

    /// Read CSV content from any reader (e.g. an HTTP request body).
    pub fn read_from<R: Read>(input: R) -> Result<Self> {
        Self::from_csv_reader(Self::reader_builder().from_reader(input))
    }

    /// Flexible mode: a ragged row is kept as-is and surfaces later as a
    /// per-row missing-field error, never as a whole-file parse failure.
    fn reader_builder() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.flexible(true);
        builder
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers: Vec<String> = reader
            .headers()
            .context("failed to read CSV headers")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("failed to read CSV row")?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Which of `required` are absent from the header.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| self.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect()
    }

    /// Raw cell value by column name for one row.
    pub fn value<'a>(&self, row: &'a [String], column: &str) -> Option<&'a str> {
        self.column_index(column).and_then(|idx| row.get(idx)).map(String::as_str)
    }
}
