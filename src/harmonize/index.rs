use serde::Serialize;
use std::collections::BTreeSet;

use crate::identifier::{sample_status, SampleStatus};
use crate::table::{Cell, ColumnKey, DataType, Table, TableError, TableKind};

/// Name of the derived tumor/normal column of reindexed metadata tables
pub const SAMPLE_STATUS_COLUMN: &str = "Sample_Tumor_Normal";

/// Errors raised during harmonization
#[derive(Debug, thiserror::Error)]
pub enum HarmonizeError {
    /// Only metadata tables can be reindexed against the master index
    #[error("Table '{0}' is not a metadata table")]
    NotMetadata(String),

    /// Table rebuild failed
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Ordered, duplicate-free union of sample identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasterIndex {
    ids: Vec<String>,
}

impl MasterIndex {
    /// Build from any identifiers: deduplicates and applies tumor-first ordering.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        let mut ids: Vec<String> = unique.into_iter().collect();
        sort_tumor_first(&mut ids);
        Self { ids }
    }

    /// Identifiers in order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether a sample is present; binary search over the tumor-first order.
    pub fn contains(&self, id: &str) -> bool {
        let key = (sample_status(id), id);
        self.ids
            .binary_search_by(|s| (sample_status(s), s.as_str()).cmp(&key))
            .is_ok()
    }

    /// Number of tumor and normal samples
    pub fn counts(&self) -> (usize, usize) {
        let normal = self
            .ids
            .iter()
            .filter(|id| sample_status(id) == SampleStatus::Normal)
            .count();
        (self.ids.len() - normal, normal)
    }

    /// Identifiers paired with their status
    pub fn iter_status(&self) -> impl Iterator<Item = (&str, SampleStatus)> {
        self.ids.iter().map(|id| (id.as_str(), sample_status(id)))
    }
}

/// Stable sort: tumors before normals, each group by identifier.
pub fn sort_tumor_first(ids: &mut [String]) {
    ids.sort_by(|a, b| (sample_status(a), a).cmp(&(sample_status(b), b)));
}

/// Reorder a table's rows tumor first.
///
/// The sort is stable, so repeated identifiers in mutation tables keep
/// their record order.
pub fn sort_rows_tumor_first(table: &mut Table) {
    table.sort_rows_by_key(|id| (sample_status(id), id.to_string()));
}

/// Union of the row identifiers of every table whose data type is not excluded.
pub fn unionize<'a, I>(tables: I, exclude: &[DataType]) -> MasterIndex
where
    I: IntoIterator<Item = &'a Table>,
{
    let ids = tables
        .into_iter()
        .filter(|t| t.data_type().map_or(true, |dt| !exclude.contains(&dt)))
        .flat_map(|t| t.index().iter().cloned());
    MasterIndex::from_ids(ids)
}

/// Reindex a metadata table against the master index.
///
/// New rows are missing everywhere except the first column,
/// `Sample_Tumor_Normal`, which is always derived from the identifier.
pub fn reindex_metadata(master: &MasterIndex, metadata: &Table) -> Result<Table, HarmonizeError> {
    if metadata.kind() != TableKind::Metadata {
        return Err(HarmonizeError::NotMetadata(metadata.name().to_string()));
    }
    let mut table = metadata.reindex(master.ids())?;
    let status = master
        .ids()
        .iter()
        .map(|id| Cell::from(sample_status(id).as_str()))
        .collect();
    table.insert_column(0, ColumnKey::flat(SAMPLE_STATUS_COLUMN), status)?;
    Ok(table)
}
