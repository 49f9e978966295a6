//! # Raw Delimited Exports
//!
//! [`RawTable`] is the untyped structure every loader starts from: the header
//! row plus string records, exactly as the institution exported them.
//! Only delimited text is read here; gzip-compressed files are decoded
//! transparently.

mod error;

#[cfg(test)]
mod tests;

pub use error::RawError;

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Header given to a leading row-name column the header line does not name
pub const UNNAMED_INDEX: &str = "index";

/// Parsing options for delimited text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFormat {
    /// Field delimiter; inferred from the file extension when `None`
    pub delimiter: Option<u8>,
    /// Lines starting with this byte are skipped (MAF `#version` headers)
    pub comment: Option<u8>,
}

impl RawFormat {
    /// Tab separated
    pub fn tsv() -> Self {
        Self {
            delimiter: Some(b'\t'),
            comment: None,
        }
    }

    /// Skip lines starting with `byte`
    pub fn with_comment(mut self, byte: u8) -> Self {
        self.comment = Some(byte);
        self
    }
}

/// Header plus string records of one raw file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    source: String,
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a file, inferring the delimiter from its extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RawError> {
        Self::from_path_with(path, RawFormat::default())
    }

    /// Read a file with explicit options.
    ///
    /// `.csv` (optionally `.csv.gz`) is comma separated, everything else tab
    /// separated. A trailing `.gz` is decoded with `flate2`.
    pub fn from_path_with<P: AsRef<Path>>(path: P, format: RawFormat) -> Result<Self, RawError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let file = File::open(path).map_err(|error| RawError::Io {
            source_name: source.clone(),
            error,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let compressed = name.ends_with(".gz");
        let stem = name.trim_end_matches(".gz");
        let format = RawFormat {
            delimiter: format
                .delimiter
                .or(Some(if stem.ends_with(".csv") { b',' } else { b'\t' })),
            ..format
        };

        let reader = BufReader::new(file);
        if compressed {
            Self::from_reader_with(GzDecoder::new(reader), format, &source)
        } else {
            Self::from_reader_with(reader, format, &source)
        }
    }

    /// Parse delimited text from any reader.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8, source: &str) -> Result<Self, RawError> {
        Self::from_reader_with(
            reader,
            RawFormat {
                delimiter: Some(delimiter),
                comment: None,
            },
            source,
        )
    }

    fn from_reader_with<R: Read>(reader: R, format: RawFormat, source: &str) -> Result<Self, RawError> {
        let csv_error = |error: csv::Error| RawError::Csv {
            source_name: source.to_string(),
            error,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter.unwrap_or(b'\t'))
            .comment(format.comment)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let mut headers: Vec<String> = csv_reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records: Vec<Vec<String>> = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(csv_error)?;
            // R-style exports leave the row-name column out of the header
            if records.is_empty() && record.len() == headers.len() + 1 {
                headers.insert(0, UNNAMED_INDEX.to_string());
            }
            if record.len() > headers.len() {
                return Err(RawError::RecordTooLong {
                    source_name: source.to_string(),
                    line: record.position().map_or(0, |p| p.line()),
                    fields: record.len(),
                    expected: headers.len(),
                });
            }
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::from_records(source, headers, records))
    }

    /// Build from in-memory records; short rows are padded with empty strings.
    pub fn from_records(source: impl Into<String>, headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let records = records
            .into_iter()
            .map(|mut r| {
                if r.len() < width {
                    r.resize(width, String::new());
                }
                r
            })
            .collect();
        Self {
            source: source.into(),
            headers,
            records,
        }
    }

    /// File name (or label) the table was read from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data records
    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// Number of data records
    pub fn n_rows(&self) -> usize {
        self.records.len()
    }

    /// Position of a header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a header that must exist
    pub fn require_column(&self, name: &str) -> Result<usize, RawError> {
        self.column_index(name).ok_or_else(|| RawError::MissingColumn {
            column: name.to_string(),
            source_name: self.source.clone(),
        })
    }

    /// Every value of a column
    pub fn column(&self, name: &str) -> Result<Vec<&str>, RawError> {
        let col = self.require_column(name)?;
        Ok(self.records.iter().map(|r| r[col].as_str()).collect())
    }

    /// One cell, trimmed
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.records
            .get(row)
            .and_then(|r| r.get(col))
            .map(|v| v.trim())
            .unwrap_or("")
    }

    /// Keep records satisfying the predicate; returns how many were removed.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&[String]) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|r| keep(r));
        before - self.records.len()
    }

    /// Copy restricted to the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<RawTable, RawError> {
        let positions = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<Vec<_>, _>>()?;
        let records = self
            .records
            .iter()
            .map(|r| positions.iter().map(|&i| r[i].clone()).collect())
            .collect();
        Ok(RawTable {
            source: self.source.clone(),
            headers: names.iter().map(|n| n.to_string()).collect(),
            records,
        })
    }
}
