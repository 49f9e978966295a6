use std::path::PathBuf;

use crate::genekey::GeneKeyError;
use crate::harmonize::HarmonizeError;
use crate::identifier::IdentifierError;
use crate::join::JoinError;
use crate::raw::RawError;
use crate::shaper::ShapeError;
use crate::table::{DataType, TableError};

/// Errors raised by dataset construction, file resolution and queries
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The resolver has no files defined for a key
    #[error("No files defined for '{key}' in source '{source_name}'")]
    UndefinedDataType {
        /// Data type or helper key
        key: String,
        /// Source name
        source_name: String,
    },

    /// A defined file is not present locally
    #[error("Data file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Requested version is not declared by the source
    #[error("Invalid version '{requested}'. Valid versions: {}", .valid.join(", "))]
    InvalidVersion {
        /// Requested version
        requested: String,
        /// Declared versions
        valid: Vec<String>,
    },

    /// Requested table was never loaded (or the name is unknown)
    #[error("Table '{name}' is not available for this dataset. Available tables: {}", .available.join(", "))]
    TableNotAvailable {
        /// Requested name
        name: String,
        /// Names of the loaded tables
        available: Vec<String>,
    },

    /// Source name not recognized
    #[error("Unknown source '{0}'")]
    UnknownSource(String),

    /// The source has no data for a cancer type
    #[error("Source '{source_name}' has no data for cancer type '{cancer_type}'")]
    UnsupportedCancer {
        /// Source name
        source_name: String,
        /// Requested cancer type
        cancer_type: String,
    },

    /// A dataset of another cancer type was added to a cohort
    #[error("Cannot add {found} dataset to {expected} cohort")]
    CohortMismatch {
        /// Cohort cancer type
        expected: String,
        /// Dataset cancer type
        found: String,
    },

    /// Identifier rule from configuration is invalid
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Join failed
    #[error(transparent)]
    Join(#[from] JoinError),

    /// Harmonization failed
    #[error(transparent)]
    Harmonize(#[from] HarmonizeError),
}

/// Errors raised while loading one table; fatal to that table only
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File resolution failed
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Raw file could not be read
    #[error(transparent)]
    Raw(#[from] RawError),

    /// Raw table could not be shaped
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Gene key mapping could not be built
    #[error(transparent)]
    GeneKey(#[from] GeneKeyError),

    /// Table construction or concatenation failed
    #[error(transparent)]
    Table(#[from] TableError),

    /// Identifier normalization failed
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// One aliquot maps to two patients
    #[error("Aliquot '{aliquot}' maps to both '{first}' and '{second}'")]
    AmbiguousAliquot {
        /// Aliquot label
        aliquot: String,
        /// Patient seen first
        first: String,
        /// Conflicting patient
        second: String,
    },

    /// None of the resolved files matches an expected part
    #[error("No {data_type} file matching '{part}'")]
    MissingPart {
        /// Table being loaded
        data_type: DataType,
        /// Expected file name fragment
        part: String,
    },
}
