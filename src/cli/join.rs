use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use omicsjoin::table::{ColumnSelection, Table};

use super::{load_dataset, OutputArgs};

fn genes(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

fn finish(table: Table, output: &OutputArgs) -> Result<()> {
    info!("{}: {} samples x {} columns", table.name(), table.n_rows(), table.n_cols());
    output.write(&table)
}

/// Join two omics tables
pub fn run_omics(
    config: &Path,
    left: &str,
    right: &str,
    left_genes: Option<&str>,
    right_genes: Option<&str>,
    output: &OutputArgs,
) -> Result<()> {
    let (dataset, _) = load_dataset(config)?;
    let table = dataset
        .join_omics_to_omics(
            left,
            right,
            &ColumnSelection::from_arg(left_genes),
            &ColumnSelection::from_arg(right_genes),
        )
        .with_context(|| format!("Failed to join {} and {}", left, right))?;
    finish(table, output)
}

/// Join metadata columns to an omics table
pub fn run_metadata(
    config: &Path,
    metadata: &str,
    omics: &str,
    metadata_cols: Option<&str>,
    omics_genes: Option<&str>,
    output: &OutputArgs,
) -> Result<()> {
    let (dataset, _) = load_dataset(config)?;
    let table = dataset
        .join_metadata_to_omics(
            metadata,
            omics,
            &ColumnSelection::from_arg(metadata_cols),
            &ColumnSelection::from_arg(omics_genes),
        )
        .with_context(|| format!("Failed to join {} and {}", metadata, omics))?;
    finish(table, output)
}

/// Append mutation summaries to an omics table
pub fn run_mutations(
    config: &Path,
    omics: &str,
    mutation_genes: &str,
    omics_genes: Option<&str>,
    multiple: bool,
    show_location: bool,
    output: &OutputArgs,
) -> Result<()> {
    let (dataset, _) = load_dataset(config)?;
    let table = dataset
        .join_mutations_to_omics(
            omics,
            &genes(mutation_genes),
            &ColumnSelection::from_arg(omics_genes),
            multiple,
            show_location,
        )
        .with_context(|| format!("Failed to join mutations and {}", omics))?;
    finish(table, output)
}

/// Append mutation summaries to metadata columns
pub fn run_metadata_mutations(
    config: &Path,
    metadata: &str,
    mutation_genes: &str,
    metadata_cols: Option<&str>,
    multiple: bool,
    show_location: bool,
    output: &OutputArgs,
) -> Result<()> {
    let (dataset, _) = load_dataset(config)?;
    let table = dataset
        .join_metadata_to_mutations(
            metadata,
            &ColumnSelection::from_arg(metadata_cols),
            &genes(mutation_genes),
            multiple,
            show_location,
        )
        .with_context(|| format!("Failed to join {} and mutations", metadata))?;
    finish(table, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genes_argument() {
        assert_eq!(genes("TP53, EGFR,,"), ["TP53", "EGFR"]);
        assert!(genes("").is_empty());
    }
}
