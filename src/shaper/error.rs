use crate::identifier::IdentifierError;
use crate::raw::RawError;
use crate::table::TableError;

/// Errors raised while shaping a raw export into a canonical table
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// Raw structure problem (missing column)
    #[error(transparent)]
    Raw(#[from] RawError),

    /// A sample label could not be normalized
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Table construction failed
    #[error(transparent)]
    Table(#[from] TableError),

    /// A measurement is not a number
    #[error("Non-numeric value '{value}' for sample '{sample}', feature '{feature}' in '{source_name}'")]
    NonNumeric {
        /// File the value came from
        source_name: String,
        /// Raw sample label
        sample: String,
        /// Column key of the feature
        feature: String,
        /// Offending text
        value: String,
    },

    /// Two feature rows produced the same column key
    #[error("Duplicate feature '{column}' in '{source_name}'")]
    DuplicateColumn {
        /// File the rows came from
        source_name: String,
        /// Offending key
        column: String,
    },

    /// The configured reference-intensity row is absent
    #[error("Reference row '{row}' not found in '{source_name}'")]
    MissingReference {
        /// File that should contain it
        source_name: String,
        /// Expected label
        row: String,
    },

    /// Two samples normalized to the same identifier
    #[error("Duplicate sample '{sample}' after normalization in '{source_name}'")]
    DuplicateSample {
        /// File the samples came from
        source_name: String,
        /// Normalized identifier
        sample: String,
    },

    /// A drop or replicate pattern is not a valid regex
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern text
        pattern: String,
        /// Regex compilation error
        source: regex::Error,
    },
}
