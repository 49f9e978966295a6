use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite column identifier for a molecular feature.
///
/// Derived ordering is lexicographic on the full tuple in field order, so a
/// table of `Gene` keys sorts by `(name, database_id)` and a table of `Site`
/// keys by `(name, site, peptide, database_id)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum ColumnKey {
    /// Single name (miRNA, clinical attributes, mutation record fields)
    Flat {
        /// Column name
        name: String,
    },
    /// Gene or protein level feature
    Gene {
        /// Human-readable gene symbol
        name: String,
        /// Database accession disambiguating same-named features
        database_id: String,
    },
    /// Phosphosite level feature
    Site {
        /// Gene symbol
        name: String,
        /// Residue-level site label (e.g. `S15`)
        site: String,
        /// Peptide sequence
        peptide: String,
        /// Database accession
        database_id: String,
    },
}

impl ColumnKey {
    /// Flat key
    pub fn flat(name: impl Into<String>) -> Self {
        ColumnKey::Flat { name: name.into() }
    }

    /// Gene level key
    pub fn gene(name: impl Into<String>, database_id: impl Into<String>) -> Self {
        ColumnKey::Gene {
            name: name.into(),
            database_id: database_id.into(),
        }
    }

    /// Site level key
    pub fn site(
        name: impl Into<String>,
        site: impl Into<String>,
        peptide: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        ColumnKey::Site {
            name: name.into(),
            site: site.into(),
            peptide: peptide.into(),
            database_id: database_id.into(),
        }
    }

    /// Gene symbol or column name
    pub fn name(&self) -> &str {
        match self {
            ColumnKey::Flat { name } | ColumnKey::Gene { name, .. } | ColumnKey::Site { name, .. } => {
                name
            }
        }
    }

    /// Database accession, absent for flat keys
    pub fn database_id(&self) -> Option<&str> {
        match self {
            ColumnKey::Flat { .. } => None,
            ColumnKey::Gene { database_id, .. } | ColumnKey::Site { database_id, .. } => {
                Some(database_id)
            }
        }
    }

    /// Copy of this key with `_<suffix>` appended to the name.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let mut key = self.clone();
        match &mut key {
            ColumnKey::Flat { name } | ColumnKey::Gene { name, .. } | ColumnKey::Site { name, .. } => {
                name.push('_');
                name.push_str(suffix);
            }
        }
        key
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Flat { name } => f.write_str(name),
            ColumnKey::Gene { name, database_id } => write!(f, "{}|{}", name, database_id),
            ColumnKey::Site {
                name,
                site,
                peptide,
                database_id,
            } => write!(f, "{}|{}|{}|{}", name, site, peptide, database_id),
        }
    }
}
