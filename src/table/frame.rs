use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;

use super::{Cell, ColumnKey, ColumnSelection, DataType, SelectedColumn, TableError, TableKind};

/// Header of the row identifier column in exported tables
pub const INDEX_NAME: &str = "Patient_ID";

/// Two-dimensional table: rows keyed by sample identifier, columns by [`ColumnKey`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    kind: TableKind,
    index: Vec<String>,
    columns: Vec<ColumnKey>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, checking shape and key uniqueness.
    pub fn new(
        name: impl Into<String>,
        kind: TableKind,
        index: Vec<String>,
        columns: Vec<ColumnKey>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, TableError> {
        let table = Self {
            name: name.into(),
            kind,
            index,
            columns,
            rows,
        };
        table.validate()?;
        Ok(table)
    }

    /// Build a table named and tagged after a data type.
    pub fn for_type(
        data_type: DataType,
        index: Vec<String>,
        columns: Vec<ColumnKey>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, TableError> {
        Self::new(data_type.as_str(), data_type.kind(), index, columns, rows)
    }

    /// Table with columns but no rows
    pub fn empty(name: impl Into<String>, kind: TableKind, columns: Vec<ColumnKey>) -> Result<Self, TableError> {
        Self::new(name, kind, Vec::new(), columns, Vec::new())
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.rows.len() != self.index.len() {
            return Err(TableError::ShapeMismatch {
                table: self.name.clone(),
                detail: format!("{} rows for {} index entries", self.rows.len(), self.index.len()),
            });
        }
        if let Some((i, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != self.columns.len())
        {
            return Err(TableError::ShapeMismatch {
                table: self.name.clone(),
                detail: format!(
                    "row '{}' has {} values for {} columns",
                    self.index[i],
                    row.len(),
                    self.columns.len()
                ),
            });
        }

        let mut seen = HashSet::with_capacity(self.columns.len());
        for key in &self.columns {
            if !seen.insert(key) {
                return Err(TableError::DuplicateColumn {
                    table: self.name.clone(),
                    column: key.to_string(),
                });
            }
        }

        if self.kind.requires_unique_index() {
            if let Some(dup) = first_duplicate(&self.index) {
                return Err(TableError::DuplicateIndex {
                    table: self.name.clone(),
                    sample: dup.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Table name (data type name for registered tables)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Join role
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Data type matching the table name, if any
    pub fn data_type(&self) -> Option<DataType> {
        self.name.parse().ok()
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of columns
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row identifiers in order
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Column keys in order
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Row-major values
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Position of the first row with this identifier
    pub fn position(&self, sample: &str) -> Option<usize> {
        self.index.iter().position(|s| s == sample)
    }

    /// Position of a column
    pub fn column_position(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|k| k == key)
    }

    /// Position of the first column whose key name is `name`
    pub fn require_column_named(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|k| k.name() == name)
            .ok_or_else(|| TableError::ColumnNotFound {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Values of the first row with this identifier
    pub fn row(&self, sample: &str) -> Option<&[Cell]> {
        self.position(sample).map(|i| self.rows[i].as_slice())
    }

    /// Single value lookup
    pub fn get(&self, sample: &str, key: &ColumnKey) -> Option<&Cell> {
        let col = self.column_position(key)?;
        self.row(sample).map(|r| &r[col])
    }

    /// All values of one column, in row order
    pub fn column(&self, key: &ColumnKey) -> Option<Vec<&Cell>> {
        let col = self.column_position(key)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Map from identifier to first row position
    pub(crate) fn position_map(&self) -> HashMap<&str, usize> {
        let mut map = HashMap::with_capacity(self.index.len());
        for (i, id) in self.index.iter().enumerate() {
            map.entry(id.as_str()).or_insert(i);
        }
        map
    }

    /// Resolve a selection to column positions, in request order.
    pub fn resolve(&self, selection: &ColumnSelection) -> Vec<SelectedColumn> {
        match selection {
            ColumnSelection::All => (0..self.columns.len()).map(SelectedColumn::Existing).collect(),
            ColumnSelection::Names(names) => {
                let mut out = Vec::new();
                let mut taken = HashSet::new();
                let mut imputed = HashSet::new();
                for name in names {
                    let before = out.len();
                    for (i, key) in self.columns.iter().enumerate() {
                        if key.name() == name && taken.insert(i) {
                            out.push(SelectedColumn::Existing(i));
                        }
                    }
                    if out.len() == before
                        && !self.columns.iter().any(|k| k.name() == name)
                        && imputed.insert(name.as_str())
                    {
                        out.push(SelectedColumn::Imputed(name.clone()));
                    }
                }
                out
            }
        }
    }

    /// Copy of the selected columns; imputed names become all-missing flat columns.
    pub fn select(&self, selection: &ColumnSelection) -> Result<Table, TableError> {
        let picked = self.resolve(selection);
        let columns = picked
            .iter()
            .map(|c| match c {
                SelectedColumn::Existing(i) => self.columns[*i].clone(),
                SelectedColumn::Imputed(name) => ColumnKey::flat(name.clone()),
            })
            .collect();
        let all_rows: Vec<usize> = (0..self.rows.len()).collect();
        let rows = self.gather(&all_rows, &picked);
        Table::new(self.name.clone(), self.kind, self.index.clone(), columns, rows)
    }

    /// Values of the given rows restricted to the picked columns.
    pub(crate) fn gather(&self, row_positions: &[usize], picked: &[SelectedColumn]) -> Vec<Vec<Cell>> {
        row_positions
            .iter()
            .map(|&r| {
                picked
                    .iter()
                    .map(|c| match c {
                        SelectedColumn::Existing(i) => self.rows[r][*i].clone(),
                        SelectedColumn::Imputed(_) => Cell::Missing,
                    })
                    .collect()
            })
            .collect()
    }

    /// Sort columns lexicographically by full key.
    pub fn sort_columns(&mut self) {
        let mut order: Vec<usize> = (0..self.columns.len()).collect();
        order.sort_by(|&a, &b| self.columns[a].cmp(&self.columns[b]));
        self.columns = order.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = order.iter().map(|&i| std::mem::take(&mut row[i])).collect();
        }
    }

    /// Stable sort of rows by a key computed from the identifier.
    pub fn sort_rows_by_key<K, F>(&mut self, mut f: F)
    where
        K: Ord,
        F: FnMut(&str) -> K,
    {
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_cached_key(|&i| f(&self.index[i]));
        self.apply_row_order(&order);
    }

    fn apply_row_order(&mut self, order: &[usize]) {
        let mut rows: Vec<Option<Vec<Cell>>> = std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        self.index = order.iter().map(|&i| self.index[i].clone()).collect();
        self.rows = order.iter().filter_map(|&i| rows[i].take()).collect();
    }

    /// Keep rows whose identifier satisfies the predicate; returns the number removed.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.index.len();
        let order: Vec<usize> = (0..before).filter(|&i| keep(&self.index[i])).collect();
        self.apply_row_order(&order);
        before - self.index.len()
    }

    /// Rewrite every row identifier, then recheck index uniqueness.
    pub fn map_index<F, E>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&str) -> Result<String, E>,
        E: From<TableError>,
    {
        let mut mapped = Vec::with_capacity(self.index.len());
        for id in &self.index {
            mapped.push(f(id)?);
        }
        self.index = mapped;
        self.validate()?;
        Ok(())
    }

    /// Rows in the order of `new_index`; identifiers absent from this table get missing values.
    pub fn reindex(&self, new_index: &[String]) -> Result<Table, TableError> {
        let positions = self.position_map();
        let rows = new_index
            .iter()
            .map(|id| match positions.get(id.as_str()) {
                Some(&i) => self.rows[i].clone(),
                None => vec![Cell::Missing; self.columns.len()],
            })
            .collect();
        Table::new(
            self.name.clone(),
            self.kind,
            new_index.to_vec(),
            self.columns.clone(),
            rows,
        )
    }

    /// Insert a column at `position`, replacing any existing column with the same key.
    pub fn insert_column(&mut self, position: usize, key: ColumnKey, values: Vec<Cell>) -> Result<(), TableError> {
        if values.len() != self.index.len() {
            return Err(TableError::ShapeMismatch {
                table: self.name.clone(),
                detail: format!("{} values for column '{}' over {} rows", values.len(), key, self.index.len()),
            });
        }
        if let Some(existing) = self.column_position(&key) {
            self.columns.remove(existing);
            for row in &mut self.rows {
                row.remove(existing);
            }
        }
        let position = position.min(self.columns.len());
        self.columns.insert(position, key);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(position, value);
        }
        Ok(())
    }

    /// Append the rows of `other`. Columns are unioned (left order, then new
    /// right columns); absent cells are missing.
    pub fn concat_rows(mut self, other: Table) -> Result<Table, TableError> {
        let mut positions: HashMap<ColumnKey, usize> =
            self.columns.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();
        let mut other_map = Vec::with_capacity(other.columns.len());
        for key in other.columns {
            let next = positions.len();
            let pos = *positions.entry(key.clone()).or_insert_with(|| {
                self.columns.push(key);
                next
            });
            other_map.push(pos);
        }

        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, Cell::Missing);
        }
        for (id, row) in other.index.into_iter().zip(other.rows) {
            let mut full = vec![Cell::Missing; width];
            for (value, &pos) in row.into_iter().zip(&other_map) {
                full[pos] = value;
            }
            self.index.push(id);
            self.rows.push(full);
        }
        self.validate()?;
        Ok(self)
    }

    /// Rename the table
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Consume the table into `(index, columns, rows)`
    pub fn into_parts(self) -> (Vec<String>, Vec<ColumnKey>, Vec<Vec<Cell>>) {
        (self.index, self.columns, self.rows)
    }

    /// Write as TSV with a `Patient_ID` first column; keys print as `name|id`.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut out = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(INDEX_NAME.to_string());
        header.extend(self.columns.iter().map(ToString::to_string));
        out.write_record(&header)?;

        for (id, row) in self.index.iter().zip(&self.rows) {
            let mut record = Vec::with_capacity(row.len() + 1);
            record.push(id.clone());
            record.extend(row.iter().map(ToString::to_string));
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn first_duplicate(ids: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().map(String::as_str).find(|id| !seen.insert(*id))
}
