use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::engine::{check_kind, pick};
use super::JoinError;
use crate::identifier::{sample_status, SampleStatus};
use crate::table::{Cell, ColumnKey, ColumnSelection, Table, TableKind};

/// Gene symbol column of mutation tables
pub const GENE_COLUMN: &str = "Gene";
/// Mutation type column of mutation tables
pub const MUTATION_COLUMN: &str = "Mutation";
/// Protein change column of mutation tables
pub const LOCATION_COLUMN: &str = "Location";
/// Tumor/normal column added by mutation joins
pub const SAMPLE_STATUS_COLUMN: &str = "Sample_Status";
/// Location reported for samples without a mutation
pub const NO_MUTATION: &str = "No_mutation";

const SINGLE_MUTATION: &str = "Single_mutation";
const MULTIPLE_MUTATION: &str = "Multiple_mutation";

/// Priority class of a mutation type; higher classes win when collapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MutationClass {
    /// Silent, synonymous and anything unclassified
    Other,
    /// Missense and in-frame changes
    Missense,
    /// Frameshift, nonsense, nonstop and splice site changes
    Truncation,
}

impl MutationClass {
    /// Classify a mutation label (MAF or ANNOVAR vocabulary).
    pub fn classify(label: &str) -> Self {
        match label {
            "Frame_Shift_Del" | "Frame_Shift_Ins" | "Nonsense_Mutation" | "Nonstop_Mutation"
            | "Splice_Site" | "frameshift deletion" | "frameshift insertion"
            | "frameshift substitution" | "stopgain" | "stoploss" => MutationClass::Truncation,
            "Missense_Mutation" | "In_Frame_Del" | "In_Frame_Ins" | "nonsynonymous SNV"
            | "nonframeshift deletion" | "nonframeshift insertion"
            | "nonframeshift substitution" => MutationClass::Missense,
            _ => MutationClass::Other,
        }
    }
}

/// How samples without a qualifying mutation are labeled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WildtypeConvention {
    /// `Wildtype` for every sample
    #[default]
    Plain,
    /// `Wildtype_Tumor` / `Wildtype_Normal` by identifier suffix
    TumorNormal,
}

impl WildtypeConvention {
    /// Label for a sample without a mutation
    pub fn label(self, sample: &str) -> &'static str {
        match (self, sample_status(sample)) {
            (WildtypeConvention::Plain, _) => "Wildtype",
            (WildtypeConvention::TumorNormal, SampleStatus::Tumor) => "Wildtype_Tumor",
            (WildtypeConvention::TumorNormal, SampleStatus::Normal) => "Wildtype_Normal",
        }
    }
}

/// Options of the mutation joins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationJoinOptions {
    /// Keep every record per (sample, gene), comma-joined
    pub multiple_mutations: bool,
    /// Include `<gene>_Location` columns
    pub show_location: bool,
    /// Labeling of samples without a mutation
    pub wildtype: WildtypeConvention,
}

impl Default for MutationJoinOptions {
    fn default() -> Self {
        Self {
            multiple_mutations: false,
            show_location: true,
            wildtype: WildtypeConvention::Plain,
        }
    }
}

struct Record<'a> {
    mutation: &'a str,
    location: &'a str,
}

/// Per-gene mutation columns for the given samples, then `Sample_Status`.
fn summarize(
    mutations: &Table,
    genes: &[String],
    samples: &[String],
    options: &MutationJoinOptions,
) -> Result<(Vec<ColumnKey>, Vec<Vec<Cell>>), JoinError> {
    let mut wanted: Vec<&str> = Vec::new();
    for gene in genes {
        if !wanted.contains(&gene.as_str()) {
            wanted.push(gene);
        }
    }
    if wanted.is_empty() {
        return Err(JoinError::NoMutationGenes);
    }

    let gene_col = mutations.require_column_named(GENE_COLUMN)?;
    let mutation_col = mutations.require_column_named(MUTATION_COLUMN)?;
    let location_col = mutations.require_column_named(LOCATION_COLUMN)?;

    let mut records: HashMap<(&str, &str), Vec<Record>> = HashMap::new();
    let mut seen_genes: HashSet<&str> = HashSet::new();
    for (sample, row) in mutations.index().iter().zip(mutations.rows()) {
        let Some(gene) = row[gene_col].as_str() else {
            continue;
        };
        if !wanted.contains(&gene) {
            continue;
        }
        seen_genes.insert(gene);
        records.entry((sample.as_str(), gene)).or_default().push(Record {
            mutation: row[mutation_col].as_str().unwrap_or(""),
            location: row[location_col].as_str().unwrap_or(""),
        });
    }

    let mut keys = Vec::new();
    let mut columns: Vec<Vec<Cell>> = Vec::new();
    for gene in &wanted {
        if !seen_genes.contains(gene) {
            warn!(
                "{} has no mutations for {}; every sample is labeled wildtype",
                mutations.name(),
                gene
            );
        }

        let mut mutation_values = Vec::with_capacity(samples.len());
        let mut location_values = Vec::with_capacity(samples.len());
        let mut status_values = Vec::with_capacity(samples.len());
        for sample in samples {
            match records.get(&(sample.as_str(), *gene)) {
                Some(found) => {
                    let (mutation, location) = if options.multiple_mutations {
                        (
                            found.iter().map(|r| r.mutation).collect::<Vec<_>>().join(","),
                            found.iter().map(|r| r.location).collect::<Vec<_>>().join(","),
                        )
                    } else {
                        let best = highest_priority(found);
                        (best.mutation.to_string(), best.location.to_string())
                    };
                    let status = if found.len() > 1 {
                        MULTIPLE_MUTATION
                    } else {
                        SINGLE_MUTATION
                    };
                    mutation_values.push(Cell::from(mutation));
                    location_values.push(Cell::from(location));
                    status_values.push(Cell::from(status));
                }
                None => {
                    let label = options.wildtype.label(sample);
                    mutation_values.push(Cell::from(label));
                    location_values.push(Cell::from(NO_MUTATION));
                    status_values.push(Cell::from(label));
                }
            }
        }

        keys.push(ColumnKey::flat(format!("{}_Mutation", gene)));
        columns.push(mutation_values);
        if options.show_location {
            keys.push(ColumnKey::flat(format!("{}_Location", gene)));
            columns.push(location_values);
        }
        keys.push(ColumnKey::flat(format!("{}_Mutation_Status", gene)));
        columns.push(status_values);
    }

    keys.push(ColumnKey::flat(SAMPLE_STATUS_COLUMN));
    columns.push(
        samples
            .iter()
            .map(|s| Cell::from(sample_status(s).as_str()))
            .collect(),
    );

    let rows = (0..samples.len())
        .map(|i| columns.iter().map(|c| c[i].clone()).collect())
        .collect();
    Ok((keys, rows))
}

/// First record of the highest class.
fn highest_priority<'r, 'a>(records: &'r [Record<'a>]) -> &'r Record<'a> {
    let mut best = &records[0];
    for record in &records[1..] {
        if MutationClass::classify(record.mutation) > MutationClass::classify(best.mutation) {
            best = record;
        }
    }
    best
}

/// Append mutation summaries for `mutation_genes` to omics columns.
///
/// Every omics sample appears in the result; samples without a record for
/// a gene get the dataset's wildtype label and a `No_mutation` location.
pub fn join_mutations_to_omics(
    mutations: &Table,
    omics: &Table,
    mutation_genes: &[String],
    omics_cols: &ColumnSelection,
    options: &MutationJoinOptions,
) -> Result<Table, JoinError> {
    check_kind(&[mutations], TableKind::Mutation)?;
    check_kind(&[omics], TableKind::Omics)?;

    let (mut keys, mut rows) = summarize(mutations, mutation_genes, omics.index(), options)?;
    let picked = pick(omics, omics_cols, Some(omics.name()));
    let all_rows: Vec<usize> = (0..omics.n_rows()).collect();
    for (row, extra) in rows.iter_mut().zip(omics.gather(&all_rows, &picked.columns)) {
        row.extend(extra);
    }
    keys.extend(picked.keys);

    let name = format!("{}_{}", mutations.name(), omics.name());
    Ok(Table::new(name, TableKind::Joined, omics.index().to_vec(), keys, rows)?)
}

/// Append mutation summaries for `mutation_genes` to metadata columns.
pub fn join_metadata_to_mutations(
    metadata: &Table,
    mutations: &Table,
    metadata_cols: &ColumnSelection,
    mutation_genes: &[String],
    options: &MutationJoinOptions,
) -> Result<Table, JoinError> {
    check_kind(&[metadata], TableKind::Metadata)?;
    check_kind(&[mutations], TableKind::Mutation)?;

    let picked = pick(metadata, metadata_cols, None);
    let all_rows: Vec<usize> = (0..metadata.n_rows()).collect();
    let (summary_keys, summary_rows) = summarize(mutations, mutation_genes, metadata.index(), options)?;

    let rows = metadata
        .gather(&all_rows, &picked.columns)
        .into_iter()
        .zip(summary_rows)
        .map(|(mut row, extra)| {
            row.extend(extra);
            row
        })
        .collect();
    let mut keys = picked.keys;
    keys.extend(summary_keys);

    let name = format!("{}_{}", metadata.name(), mutations.name());
    Ok(Table::new(name, TableKind::Joined, metadata.index().to_vec(), keys, rows)?)
}
