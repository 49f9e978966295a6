use log::{error, warn};

use super::JoinError;
use crate::table::{ColumnKey, ColumnSelection, DataType, SelectedColumn, Table, TableKind};

/// Columns picked from one side of a join, with their output keys
pub(crate) struct Picked {
    pub keys: Vec<ColumnKey>,
    pub columns: Vec<SelectedColumn>,
}

/// Resolve a selection. With a suffix, columns are renamed `<name>_<suffix>`;
/// requested names with no match become all-missing columns.
pub(crate) fn pick(table: &Table, selection: &ColumnSelection, suffix: Option<&str>) -> Picked {
    let columns = table.resolve(selection);
    let keys = columns
        .iter()
        .map(|c| {
            let key = match c {
                SelectedColumn::Existing(i) => table.columns()[*i].clone(),
                SelectedColumn::Imputed(name) => {
                    warn!(
                        "{} has no column named '{}'; filling with missing values",
                        table.name(),
                        name
                    );
                    ColumnKey::flat(name.clone())
                }
            };
            match suffix {
                Some(suffix) => key.with_suffix(suffix),
                None => key,
            }
        })
        .collect();
    Picked { keys, columns }
}

/// Check that every table has the expected kind; all offenders are reported together.
pub(crate) fn check_kind(tables: &[&Table], role: TableKind) -> Result<(), JoinError> {
    let offending: Vec<String> = tables
        .iter()
        .filter(|t| t.kind() != role)
        .map(|t| t.name().to_string())
        .collect();
    if offending.is_empty() {
        return Ok(());
    }
    let err = JoinError::InvalidTableKind {
        tables: offending,
        role,
        valid: DataType::of_kind(role)
            .into_iter()
            .map(|t| t.as_str().to_string())
            .collect(),
    };
    error!("{}", err);
    Err(err)
}

/// Inner join on sample identifier, rows in left order.
fn inner_join(left: &Table, lp: Picked, right: &Table, rp: Picked) -> Result<Table, JoinError> {
    let right_rows = right.position_map();
    let (left_pos, right_pos): (Vec<usize>, Vec<usize>) = left
        .index()
        .iter()
        .enumerate()
        .filter_map(|(i, id)| right_rows.get(id.as_str()).map(|&j| (i, j)))
        .unzip();

    let index = left_pos.iter().map(|&i| left.index()[i].clone()).collect();
    let rows = left
        .gather(&left_pos, &lp.columns)
        .into_iter()
        .zip(right.gather(&right_pos, &rp.columns))
        .map(|(mut l, r)| {
            l.extend(r);
            l
        })
        .collect();

    let mut keys = lp.keys;
    keys.extend(rp.keys);
    let name = format!("{}_{}", left.name(), right.name());
    Ok(Table::new(name, TableKind::Joined, index, keys, rows)?)
}

/// Join columns of two omics tables on their shared samples.
///
/// Both tables must be proteomics, phosphoproteomics or transcriptomics.
/// Result columns are the left selection then the right selection, each
/// renamed `<name>_<table>`. Joining a table with itself suffixes the right
/// side `<name>_<table>_2`.
pub fn join_omics_to_omics(
    left: &Table,
    right: &Table,
    left_cols: &ColumnSelection,
    right_cols: &ColumnSelection,
) -> Result<Table, JoinError> {
    check_kind(&[left, right], TableKind::Omics)?;
    let right_suffix = if left.name() == right.name() {
        format!("{}_2", right.name())
    } else {
        right.name().to_string()
    };
    let lp = pick(left, left_cols, Some(left.name()));
    let rp = pick(right, right_cols, Some(&right_suffix));
    inner_join(left, lp, right, rp)
}

/// Join metadata columns (clinical, derived_molecular) to omics columns.
pub fn join_metadata_to_omics(
    metadata: &Table,
    omics: &Table,
    metadata_cols: &ColumnSelection,
    omics_cols: &ColumnSelection,
) -> Result<Table, JoinError> {
    check_kind(&[metadata], TableKind::Metadata)?;
    check_kind(&[omics], TableKind::Omics)?;
    let lp = pick(metadata, metadata_cols, None);
    let rp = pick(omics, omics_cols, Some(omics.name()));
    inner_join(metadata, lp, omics, rp)
}
