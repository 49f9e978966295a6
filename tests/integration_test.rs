//! Integration tests for omicsjoin
//!
//! These tests drive a dataset from files on disk through harmonization and joins.

use flate2::write::GzEncoder;
use flate2::Compression;
use omicsjoin::dataset::DatasetError;
use omicsjoin::harmonize::SAMPLE_STATUS_COLUMN;
use omicsjoin::join::{
    join_mutations_to_omics, join_omics_to_omics, JoinError, MutationJoinOptions, GENE_COLUMN,
    LOCATION_COLUMN, MUTATION_COLUMN, SAMPLE_STATUS_COLUMN as JOIN_STATUS_COLUMN,
};
use omicsjoin::sources::Source;
use omicsjoin::table::{Cell, ColumnKey, ColumnSelection, DataType, Table};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_gz(dir: &Path, name: &str, content: &str) {
    let file = File::create(dir.join(name)).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Tumor and normal columns of one BCM file end up on a single sorted index
#[test]
fn test_bcm_dataset_from_manifest() {
    let dir = tempdir().unwrap();
    let d = dir.path();
    write_gz(
        d,
        "gencode.v34.basic.annotation-mapping.txt.gz",
        "gene\tgene_name\nENSG1\tTP53\nENSG2\tEGFR\n",
    );
    write_gz(
        d,
        "BRCA-gene_rsem_removed_circRNA_tumor_normal_UQ_log2(x+1)_BCM.txt.gz",
        "gene\tP1_T\tP1_A\tP2_T\nENSG1\t1.5\t0.5\t2.5\nENSG2\t3\t4\t5\n",
    );

    let mut dataset = Source::Bcm.dataset("brca", "latest", d).unwrap();
    assert_eq!(dataset.version(), "1.0");
    let report = dataset.load();

    assert_eq!(report.loaded.len(), 1);
    assert!(!report.is_complete());
    assert!(report
        .failures
        .iter()
        .any(|f| f.data_type == DataType::Proteomics));
    assert_eq!(report.master_index_len, 3);

    let rna = dataset.get_table("transcriptomics").unwrap();
    assert_eq!(rna.index(), ["P1", "P2", "P1.N"]);
    assert_eq!(
        rna.get("P1.N", &ColumnKey::gene("TP53", "ENSG1")),
        Some(&Cell::Number(0.5))
    );
    assert_eq!(dataset.master_index().ids(), ["P1", "P2", "P1.N"]);
    assert_eq!(dataset.master_index().counts(), (2, 1));

    let err = dataset.get_table("proteomics").unwrap_err();
    assert!(matches!(err, DatasetError::TableNotAvailable { .. }));
    assert!(err.to_string().contains("transcriptomics"));
}

/// A reference file that is not there fails only the tables that need it
#[test]
fn test_missing_mapping_fails_dependent_tables() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("unrelated.tsv"), "a\tb\n").unwrap();

    let mut dataset = Source::Bcm.dataset("luad", "1.0", dir.path()).unwrap();
    let report = dataset.load();
    assert!(report.loaded.is_empty());
    assert_eq!(report.failures.len(), 5);
    assert!(dataset.master_index().is_empty());
}

fn mutations() -> Table {
    let record = |mutation: &str, location: &str| {
        vec![Cell::from("TP53"), Cell::from(mutation), Cell::from(location)]
    };
    Table::for_type(
        DataType::SomaticMutation,
        ids(&["S1", "S1"]),
        vec![
            ColumnKey::flat(GENE_COLUMN),
            ColumnKey::flat(MUTATION_COLUMN),
            ColumnKey::flat(LOCATION_COLUMN),
        ],
        vec![
            record("Missense_Mutation", "p.R175H"),
            record("Frame_Shift_Del", "p.G245fs"),
        ],
    )
    .unwrap()
}

fn proteomics() -> Table {
    Table::for_type(
        DataType::Proteomics,
        ids(&["S1", "S2"]),
        vec![ColumnKey::gene("TP53", "NP_1")],
        vec![vec![1.0.into()], vec![2.0.into()]],
    )
    .unwrap()
}

/// Truncating calls outrank missense; multiple mode keeps both
#[test]
fn test_mutation_priority_and_multiple() {
    let genes = vec!["TP53".to_string()];
    let single = join_mutations_to_omics(
        &mutations(),
        &proteomics(),
        &genes,
        &ColumnSelection::All,
        &MutationJoinOptions::default(),
    )
    .unwrap();
    let mutation = ColumnKey::flat("TP53_Mutation");
    assert_eq!(single.get("S1", &mutation), Some(&Cell::from("Frame_Shift_Del")));
    assert_eq!(single.get("S2", &mutation), Some(&Cell::from("Wildtype")));
    assert_eq!(
        single.get("S1", &ColumnKey::flat(JOIN_STATUS_COLUMN)),
        Some(&Cell::from("Tumor"))
    );

    let options = MutationJoinOptions {
        multiple_mutations: true,
        ..Default::default()
    };
    let multiple = join_mutations_to_omics(
        &mutations(),
        &proteomics(),
        &genes,
        &ColumnSelection::All,
        &options,
    )
    .unwrap();
    assert_eq!(
        multiple.get("S1", &mutation),
        Some(&Cell::from("Missense_Mutation,Frame_Shift_Del"))
    );
}

/// Omics joins keep the shared samples and refuse non-omics inputs
#[test]
fn test_omics_join_contract() {
    let rna = Table::for_type(
        DataType::Transcriptomics,
        ids(&["S2", "S3"]),
        vec![ColumnKey::gene("TP53", "ENSG1"), ColumnKey::gene("EGFR", "ENSG2")],
        vec![vec![5.0.into(), 6.0.into()], vec![7.0.into(), 8.0.into()]],
    )
    .unwrap();

    let joined =
        join_omics_to_omics(&proteomics(), &rna, &ColumnSelection::All, &"TP53".into()).unwrap();
    assert_eq!(joined.index(), ["S2"]);
    assert_eq!(joined.n_cols(), 2);
    assert_eq!(
        joined.get("S2", &ColumnKey::gene("TP53_transcriptomics", "ENSG1")),
        Some(&Cell::Number(5.0))
    );

    let err = join_omics_to_omics(&proteomics(), &mutations(), &ColumnSelection::All, &ColumnSelection::All)
        .unwrap_err();
    assert!(matches!(err, JoinError::InvalidTableKind { .. }));
    assert!(err.to_string().contains("somatic_mutation"));
}

/// The metadata status column is always filled from the identifier
#[test]
fn test_reindexed_metadata_status() {
    use omicsjoin::harmonize::{reindex_metadata, MasterIndex};

    let clinical = Table::for_type(
        DataType::Clinical,
        ids(&["P1"]),
        vec![ColumnKey::flat("Age")],
        vec![vec![61.0.into()]],
    )
    .unwrap();
    let master = MasterIndex::from_ids(["P2.N", "P1", "P2"]);
    let reindexed = reindex_metadata(&master, &clinical).unwrap();

    assert_eq!(reindexed.index(), ["P1", "P2", "P2.N"]);
    let status = ColumnKey::flat(SAMPLE_STATUS_COLUMN);
    assert_eq!(reindexed.get("P2.N", &status), Some(&Cell::from("Normal")));
    assert_eq!(reindexed.get("P2", &ColumnKey::flat("Age")), Some(&Cell::Missing));
}
