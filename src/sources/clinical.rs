use log::warn;
use std::collections::HashSet;

use crate::dataset::{LoadContext, LoadError, SourceLoader};
use crate::raw::RawTable;
use crate::shaper::TableShaper;
use crate::table::{DataType, Table, INDEX_NAME};

/// Sample-major clinical export, optionally split into `clinical` and
/// `derived_molecular` by a list of derived columns.
#[derive(Debug, Clone)]
pub struct MetadataLoader {
    file_key: String,
    id_column: String,
    derived_columns: Vec<String>,
}

impl Default for MetadataLoader {
    fn default() -> Self {
        Self {
            file_key: DataType::Clinical.as_str().to_string(),
            id_column: INDEX_NAME.to_string(),
            derived_columns: Vec::new(),
        }
    }
}

impl MetadataLoader {
    /// Loader reading the `clinical` key with identifiers in `id_column`
    pub fn new(id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            ..Self::default()
        }
    }

    /// Read a different resolver key
    pub fn with_file_key(mut self, key: impl Into<String>) -> Self {
        self.file_key = key.into();
        self
    }

    /// Columns that go to `derived_molecular`
    pub fn with_derived_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derived_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    fn split(&self, raw: &RawTable) -> (Vec<String>, Vec<String>) {
        let derived: HashSet<&str> = self.derived_columns.iter().map(String::as_str).collect();
        for missing in self.derived_columns.iter().filter(|c| raw.column_index(c).is_none()) {
            warn!("{} has no derived column '{}'", raw.source(), missing);
        }
        raw.headers()
            .iter()
            .filter(|h| **h != self.id_column)
            .cloned()
            .partition(|h| !derived.contains(h.as_str()))
    }

    fn shape_part(&self, data_type: DataType, raw: &RawTable, columns: &[String], ctx: &LoadContext<'_>) -> Result<Table, LoadError> {
        let mut names = vec![self.id_column.as_str()];
        names.extend(columns.iter().map(String::as_str));
        let part = raw.select(&names)?;
        Ok(TableShaper::new(data_type, ctx.rules()).shape_records(&part, &self.id_column)?)
    }
}

impl SourceLoader for MetadataLoader {
    fn data_type(&self) -> DataType {
        DataType::Clinical
    }

    fn file_key(&self) -> String {
        self.file_key.clone()
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let mut clinical = Vec::new();
        let mut derived = Vec::new();
        for part in &raw {
            let (clinical_cols, derived_cols) = self.split(part);
            clinical.push(self.shape_part(DataType::Clinical, part, &clinical_cols, ctx)?);
            if !derived_cols.is_empty() {
                derived.push(self.shape_part(DataType::DerivedMolecular, part, &derived_cols, ctx)?);
            }
        }
        let mut tables = Vec::with_capacity(2);
        tables.extend(stack(clinical)?);
        tables.extend(stack(derived)?);
        Ok(tables)
    }
}

/// Concatenate parts in file order, keeping the column order of the first.
fn stack(parts: Vec<Table>) -> Result<Option<Table>, LoadError> {
    let mut parts = parts.into_iter();
    let Some(first) = parts.next() else {
        return Ok(None);
    };
    Ok(Some(parts.try_fold(first, Table::concat_rows)?))
}
