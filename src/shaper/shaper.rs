use log::debug;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use super::ShapeError;
use crate::identifier::RuleSet;
use crate::raw::RawTable;
use crate::table::{Cell, ColumnKey, DataType, Table, TableError};

/// Builds canonical sample-major tables from raw exports.
///
/// Raw omics exports are feature-major: one row per gene, protein or site,
/// one column per sample. The shaper keys each feature row, parses its
/// values, sorts the features, transposes, applies reference-intensity and
/// QC handling, averages replicates and finally normalizes sample labels.
///
/// # Example
///
/// ```
/// use omicsjoin::identifier::RuleSet;
/// use omicsjoin::raw::RawTable;
/// use omicsjoin::shaper::TableShaper;
/// use omicsjoin::table::{ColumnKey, DataType};
///
/// let raw = RawTable::from_reader(
///     "gene\tP1_T\tP1_A\nTP53\t1.0\t2.0\n".as_bytes(),
///     b'\t',
///     "inline",
/// )
/// .unwrap();
/// let rules = RuleSet::new("demo")
///     .with_replace("_T$", "")
///     .unwrap()
///     .with_replace("_A$", ".N")
///     .unwrap();
/// let table = TableShaper::new(DataType::Transcriptomics, &rules)
///     .id_columns(["gene"])
///     .shape(&raw, |raw, row| Ok(Some(ColumnKey::flat(raw.value(row, 0)))))
///     .unwrap();
/// assert_eq!(table.index(), ["P1", "P1.N"]);
/// ```
#[derive(Debug, Clone)]
pub struct TableShaper<'r> {
    data_type: DataType,
    rules: &'r RuleSet,
    id_columns: HashSet<String>,
    reference_row: Option<String>,
    drop_samples: HashSet<String>,
    drop_pattern: Option<Regex>,
    replicate_pattern: Option<Regex>,
}

impl<'r> TableShaper<'r> {
    /// Shaper for one data type using the given identifier rules.
    pub fn new(data_type: DataType, rules: &'r RuleSet) -> Self {
        Self {
            data_type,
            rules,
            id_columns: HashSet::new(),
            reference_row: None,
            drop_samples: HashSet::new(),
            drop_pattern: None,
            replicate_pattern: None,
        }
    }

    /// Headers that describe features rather than samples
    pub fn id_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Subtract this sample (e.g. `ReferenceIntensity`) from all others, then drop it.
    pub fn reference_intensity(mut self, row: impl Into<String>) -> Self {
        self.reference_row = Some(row.into());
        self
    }

    /// Drop these raw sample labels (QC and pooled-reference channels)
    pub fn drop_samples<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_samples.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Drop raw sample labels matching a regex
    pub fn drop_samples_matching(mut self, pattern: &str) -> Result<Self, ShapeError> {
        self.drop_pattern = Some(compile(pattern)?);
        Ok(self)
    }

    /// Merge samples whose labels agree once `pattern` is removed
    pub fn average_replicates(mut self, pattern: &str) -> Result<Self, ShapeError> {
        self.replicate_pattern = Some(compile(pattern)?);
        Ok(self)
    }

    /// Shape a feature-major raw table.
    ///
    /// `key_fn` builds the column key for a raw row, or returns `None` to
    /// drop it (unmapped accessions, rows without a site).
    pub fn shape<F>(&self, raw: &RawTable, mut key_fn: F) -> Result<Table, ShapeError>
    where
        F: FnMut(&RawTable, usize) -> Result<Option<ColumnKey>, ShapeError>,
    {
        let sample_cols: Vec<usize> = raw
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, h)| !self.id_columns.contains(h.as_str()))
            .map(|(i, _)| i)
            .collect();

        let mut features: Vec<(ColumnKey, Vec<Cell>)> = Vec::with_capacity(raw.n_rows());
        let mut dropped = 0usize;
        for row in 0..raw.n_rows() {
            let Some(key) = key_fn(raw, row)? else {
                dropped += 1;
                continue;
            };
            let mut values = Vec::with_capacity(sample_cols.len());
            for &col in &sample_cols {
                let text = raw.value(row, col);
                match Cell::parse(text) {
                    Cell::Text(_) => {
                        return Err(ShapeError::NonNumeric {
                            source_name: raw.source().to_string(),
                            sample: raw.headers()[col].clone(),
                            feature: key.to_string(),
                            value: text.to_string(),
                        })
                    }
                    cell => values.push(cell),
                }
            }
            features.push((key, values));
        }
        if dropped > 0 {
            debug!(
                "{}: dropped {} of {} feature rows without a key",
                raw.source(),
                dropped,
                raw.n_rows()
            );
        }

        features.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(pair) = features.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ShapeError::DuplicateColumn {
                source_name: raw.source().to_string(),
                column: pair[0].0.to_string(),
            });
        }

        let mut labels: Vec<String> = sample_cols.iter().map(|&c| raw.headers()[c].clone()).collect();
        let mut rows: Vec<Vec<Cell>> = (0..sample_cols.len())
            .map(|s| features.iter().map(|(_, v)| v[s].clone()).collect())
            .collect();
        let columns: Vec<ColumnKey> = features.into_iter().map(|(k, _)| k).collect();

        if let Some(reference) = &self.reference_row {
            subtract_reference(raw.source(), reference, &mut labels, &mut rows)?;
        }

        let before = labels.len();
        retain_labels(&mut labels, &mut rows, |label| !self.is_dropped(label));
        if labels.len() < before {
            debug!("{}: dropped {} QC samples", raw.source(), before - labels.len());
        }

        if let Some(pattern) = &self.replicate_pattern {
            (labels, rows) = average_replicates(pattern, labels, rows);
        }

        self.finish(raw.source(), labels, columns, rows)
    }

    /// Shape a sample-major raw table (one row per sample or record).
    ///
    /// Every header except `id_column` becomes a flat column; values keep
    /// their text when not numeric.
    pub fn shape_records(&self, raw: &RawTable, id_column: &str) -> Result<Table, ShapeError> {
        let id_col = raw.require_column(id_column)?;
        let value_cols: Vec<usize> = (0..raw.headers().len()).filter(|&c| c != id_col).collect();
        let columns = value_cols
            .iter()
            .map(|&c| ColumnKey::flat(raw.headers()[c].clone()))
            .collect();

        let mut labels = Vec::with_capacity(raw.n_rows());
        let mut rows = Vec::with_capacity(raw.n_rows());
        for row in 0..raw.n_rows() {
            let label = raw.value(row, id_col);
            if label.is_empty() || self.is_dropped(label) {
                continue;
            }
            labels.push(label.to_string());
            rows.push(value_cols.iter().map(|&c| Cell::parse(raw.value(row, c))).collect());
        }

        self.finish(raw.source(), labels, columns, rows)
    }

    fn is_dropped(&self, label: &str) -> bool {
        self.drop_samples.contains(label)
            || self
                .drop_pattern
                .as_ref()
                .map_or(false, |p| p.is_match(label))
    }

    fn finish(
        &self,
        source: &str,
        labels: Vec<String>,
        columns: Vec<ColumnKey>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Table, ShapeError> {
        let index = self.rules.normalize_all(&labels)?;

        if self.data_type.kind().requires_unique_index() {
            let mut seen = HashSet::with_capacity(index.len());
            if let Some(dup) = index.iter().find(|id| !seen.insert(id.as_str())) {
                return Err(ShapeError::DuplicateSample {
                    source_name: source.to_string(),
                    sample: dup.clone(),
                });
            }
        }

        let table = Table::for_type(self.data_type, index, columns, rows)?;
        debug!(
            "{}: shaped {} as {} samples x {} features",
            source,
            self.data_type,
            table.n_rows(),
            table.n_cols()
        );
        Ok(table)
    }
}

/// Concatenate independently shaped parts of one assay (tumor and normal files).
///
/// Columns are unioned and re-sorted; a sample present in two parts is a
/// [`TableError::DuplicateIndex`].
pub fn concat_disjoint(parts: Vec<Table>) -> Result<Option<Table>, TableError> {
    let mut parts = parts.into_iter();
    let Some(first) = parts.next() else {
        return Ok(None);
    };
    let mut combined = parts.try_fold(first, Table::concat_rows)?;
    combined.sort_columns();
    Ok(Some(combined))
}

fn compile(pattern: &str) -> Result<Regex, ShapeError> {
    Regex::new(pattern).map_err(|source| ShapeError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn subtract_reference(
    source: &str,
    reference: &str,
    labels: &mut Vec<String>,
    rows: &mut Vec<Vec<Cell>>,
) -> Result<(), ShapeError> {
    let pos = labels
        .iter()
        .position(|l| l == reference)
        .ok_or_else(|| ShapeError::MissingReference {
            source_name: source.to_string(),
            row: reference.to_string(),
        })?;
    labels.remove(pos);
    let reference_values = rows.remove(pos);

    for row in rows.iter_mut() {
        for (cell, reference) in row.iter_mut().zip(&reference_values) {
            *cell = match (cell.as_f64(), reference.as_f64()) {
                (Some(v), Some(r)) => Cell::Number(v - r),
                _ => Cell::Missing,
            };
        }
    }
    Ok(())
}

fn retain_labels<F>(labels: &mut Vec<String>, rows: &mut Vec<Vec<Cell>>, mut keep: F)
where
    F: FnMut(&str) -> bool,
{
    let flags: Vec<bool> = labels.iter().map(|l| keep(l)).collect();
    let mut flag = flags.iter();
    labels.retain(|_| flag.next().copied().unwrap_or(false));
    let mut flag = flags.iter();
    rows.retain(|_| flag.next().copied().unwrap_or(false));
}

/// Merge replicate samples: each cell is the mean of the non-missing values.
fn average_replicates(
    pattern: &Regex,
    labels: Vec<String>,
    rows: Vec<Vec<Cell>>,
) -> (Vec<String>, Vec<Vec<Cell>>) {
    let mut groups: Vec<(String, Vec<Vec<Cell>>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (label, row) in labels.into_iter().zip(rows) {
        let stripped = pattern.replace_all(&label, "").into_owned();
        match positions.get(&stripped) {
            Some(&g) => groups[g].1.push(row),
            None => {
                positions.insert(stripped.clone(), groups.len());
                groups.push((stripped, vec![row]));
            }
        }
    }

    let mut merged_labels = Vec::with_capacity(groups.len());
    let mut merged_rows = Vec::with_capacity(groups.len());
    for (label, replicates) in groups {
        if replicates.len() > 1 {
            debug!("averaging {} replicates of {}", replicates.len(), label);
        }
        let width = replicates.first().map_or(0, Vec::len);
        let row = (0..width)
            .map(|c| {
                let values: Vec<f64> = replicates.iter().filter_map(|r| r[c].as_f64()).collect();
                if values.is_empty() {
                    Cell::Missing
                } else {
                    Cell::Number(values.iter().sum::<f64>() / values.len() as f64)
                }
            })
            .collect();
        merged_labels.push(label);
        merged_rows.push(row);
    }
    (merged_labels, merged_rows)
}
