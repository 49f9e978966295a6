/// Errors raised while building or combining tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Row count does not match the index length, or a row has the wrong width
    #[error("Shape mismatch in table '{table}': {detail}")]
    ShapeMismatch {
        /// Table name
        table: String,
        /// What did not line up
        detail: String,
    },

    /// Two columns share a key
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// Table name
        table: String,
        /// Offending column key
        column: String,
    },

    /// Two rows share a sample identifier in a table that needs a unique index
    #[error("Duplicate sample identifier '{sample}' in table '{table}'")]
    DuplicateIndex {
        /// Table name
        table: String,
        /// Offending identifier
        sample: String,
    },

    /// Name does not correspond to any known data type
    #[error("Unknown data type: {0}")]
    UnknownDataType(String),

    /// Column lookup failed
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound {
        /// Table name
        table: String,
        /// Requested column name
        column: String,
    },

    /// CSV writer error
    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    /// I/O error while writing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
