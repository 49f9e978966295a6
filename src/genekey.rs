//! Database accession to gene symbol mapping.
//!
//! Built once per dataset from a helper file and shared by every loader that
//! needs gene symbols. Rows whose accession has no symbol are dropped from the
//! shaped tables.

use std::collections::HashMap;

use crate::raw::{RawError, RawTable};

/// Errors raised while building a gene key table
#[derive(Debug, thiserror::Error)]
pub enum GeneKeyError {
    /// The mapping file lacks a required column
    #[error(transparent)]
    Raw(#[from] RawError),

    /// One accession maps to two different symbols
    #[error("Database_ID '{database_id}' maps to both '{first}' and '{second}'")]
    AmbiguousSymbol {
        /// Accession
        database_id: String,
        /// Symbol seen first
        first: String,
        /// Conflicting symbol
        second: String,
    },
}

/// One-to-one Database_ID -> gene symbol table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneKeyTable {
    symbols: HashMap<String, String>,
}

impl GeneKeyTable {
    /// Extract `(id_column, symbol_column)` from a raw mapping file.
    ///
    /// Rows with an empty id or symbol are skipped and exact duplicate pairs
    /// collapse to one entry.
    pub fn build(raw: &RawTable, id_column: &str, symbol_column: &str) -> Result<Self, GeneKeyError> {
        let id_col = raw.require_column(id_column)?;
        let symbol_col = raw.require_column(symbol_column)?;
        let pairs = (0..raw.n_rows()).map(|row| (raw.value(row, id_col), raw.value(row, symbol_col)));
        Self::from_pairs(pairs)
    }

    /// Build from `(database_id, symbol)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, GeneKeyError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut symbols: HashMap<String, String> = HashMap::new();
        for (id, symbol) in pairs {
            let (id, symbol) = (id.as_ref().trim(), symbol.as_ref().trim());
            if id.is_empty() || symbol.is_empty() {
                continue;
            }
            match symbols.get(id) {
                Some(existing) if existing == symbol => {}
                Some(existing) => {
                    return Err(GeneKeyError::AmbiguousSymbol {
                        database_id: id.to_string(),
                        first: existing.clone(),
                        second: symbol.to_string(),
                    })
                }
                None => {
                    symbols.insert(id.to_string(), symbol.to_string());
                }
            }
        }
        Ok(Self { symbols })
    }

    /// Gene symbol for an accession
    pub fn map(&self, database_id: &str) -> Option<&str> {
        self.symbols.get(database_id).map(String::as_str)
    }

    /// Number of accessions
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when the table is empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
