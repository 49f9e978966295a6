use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TableError;

/// Role a table plays in joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Molecular measurements eligible for omics joins
    Omics,
    /// Patient level descriptive or annotation tables
    Metadata,
    /// Long-format somatic mutation records
    Mutation,
    /// Other per-sample tables (CNV, miRNA, purity and deconvolution scores)
    Auxiliary,
    /// Output of a join
    Joined,
}

impl TableKind {
    /// Whether the row index of this kind must be unique
    pub fn requires_unique_index(self) -> bool {
        !matches!(self, TableKind::Mutation)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableKind::Omics => "omics",
            TableKind::Metadata => "metadata",
            TableKind::Mutation => "mutation",
            TableKind::Auxiliary => "auxiliary",
            TableKind::Joined => "joined",
        };
        f.write_str(s)
    }
}

/// Closed set of data type tags a dataset can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Protein abundance
    Proteomics,
    /// Phosphosite abundance
    Phosphoproteomics,
    /// RNA expression
    Transcriptomics,
    /// Clinical annotations
    Clinical,
    /// Derived molecular annotations (purity, immune scores, subtypes)
    DerivedMolecular,
    /// Somatic mutation calls
    SomaticMutation,
    /// Copy number
    #[serde(rename = "CNV")]
    Cnv,
    /// miRNA expression
    #[serde(rename = "miRNA")]
    Mirna,
    /// Tumor purity estimates
    TumorPurity,
    /// xCell cell type enrichment scores
    Xcell,
    /// CIBERSORT immune cell fractions
    Cibersort,
}

impl DataType {
    /// Every data type, in registry order
    pub const ALL: [DataType; 11] = [
        DataType::Proteomics,
        DataType::Phosphoproteomics,
        DataType::Transcriptomics,
        DataType::Clinical,
        DataType::DerivedMolecular,
        DataType::SomaticMutation,
        DataType::Cnv,
        DataType::Mirna,
        DataType::TumorPurity,
        DataType::Xcell,
        DataType::Cibersort,
    ];

    /// Canonical table name
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Proteomics => "proteomics",
            DataType::Phosphoproteomics => "phosphoproteomics",
            DataType::Transcriptomics => "transcriptomics",
            DataType::Clinical => "clinical",
            DataType::DerivedMolecular => "derived_molecular",
            DataType::SomaticMutation => "somatic_mutation",
            DataType::Cnv => "CNV",
            DataType::Mirna => "miRNA",
            DataType::TumorPurity => "tumor_purity",
            DataType::Xcell => "xcell",
            DataType::Cibersort => "cibersort",
        }
    }

    /// Join role of tables of this type
    pub fn kind(self) -> TableKind {
        match self {
            DataType::Proteomics | DataType::Phosphoproteomics | DataType::Transcriptomics => {
                TableKind::Omics
            }
            DataType::Clinical | DataType::DerivedMolecular => TableKind::Metadata,
            DataType::SomaticMutation => TableKind::Mutation,
            DataType::Cnv
            | DataType::Mirna
            | DataType::TumorPurity
            | DataType::Xcell
            | DataType::Cibersort => TableKind::Auxiliary,
        }
    }

    /// All data types of the given kind
    pub fn of_kind(kind: TableKind) -> Vec<DataType> {
        Self::ALL.into_iter().filter(|t| t.kind() == kind).collect()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TableError::UnknownDataType(s.to_string()))
    }
}
