/// Errors raised while reading raw delimited exports
#[derive(Debug, thiserror::Error)]
pub enum RawError {
    /// I/O error opening or decompressing a file
    #[error("Failed to read '{source_name}': {error}")]
    Io {
        /// File the error came from
        source_name: String,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// CSV/TSV parsing error
    #[error("CSV parsing error in '{source_name}': {error}")]
    Csv {
        /// File the error came from
        source_name: String,
        /// Underlying error
        #[source]
        error: csv::Error,
    },

    /// An expected column is absent
    #[error("Missing required column '{column}' in '{source_name}'")]
    MissingColumn {
        /// Column name
        column: String,
        /// File the table came from
        source_name: String,
    },

    /// A record has more fields than the header names
    #[error("Line {line} of '{source_name}' has {fields} fields, header has {expected}")]
    RecordTooLong {
        /// File the table came from
        source_name: String,
        /// Line number in the file
        line: u64,
        /// Fields in the record
        fields: usize,
        /// Fields in the header
        expected: usize,
    },
}
