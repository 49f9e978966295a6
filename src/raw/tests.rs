use super::*;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

const PROTEOMICS_TSV: &str = "gene\tP1_T\tP1_A\nENSG1\t1.5\t2.5\nENSG2\tNA\n";

#[test]
fn test_from_reader_pads_short_rows() {
    let raw = RawTable::from_reader(PROTEOMICS_TSV.as_bytes(), b'\t', "inline").unwrap();
    assert_eq!(raw.headers(), &["gene", "P1_T", "P1_A"]);
    assert_eq!(raw.n_rows(), 2);
    assert_eq!(raw.value(1, 2), "");
    assert_eq!(raw.value(9, 9), "");
    assert_eq!(raw.column("P1_T").unwrap(), vec!["1.5", "NA"]);
}

#[test]
fn test_unnamed_row_name_column() {
    let raw = RawTable::from_reader("P1_T\tP2_T\nENSG1\t1.0\t2.0\n".as_bytes(), b'\t', "rna.tsv").unwrap();
    assert_eq!(raw.headers(), &[UNNAMED_INDEX, "P1_T", "P2_T"]);
    assert_eq!(raw.column("P2_T").unwrap(), vec!["2.0"]);
}

#[test]
fn test_overlong_record_rejected() {
    let input = "gene\tP1_T\tP2_T\nENSG1\t1\t2\nENSG2\t3\t4\t5\n";
    let err = RawTable::from_reader(input.as_bytes(), b'\t', "rna.tsv").unwrap_err();
    match err {
        RawError::RecordTooLong { line, fields, expected, .. } => {
            assert_eq!((line, fields, expected), (3, 4, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_column_names_source() {
    let raw = RawTable::from_reader(PROTEOMICS_TSV.as_bytes(), b'\t', "prot.tsv").unwrap();
    let err = raw.require_column("gene_name").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required column 'gene_name' in 'prot.tsv'"
    );
}

#[test]
fn test_select_and_retain() {
    let mut raw = RawTable::from_reader(PROTEOMICS_TSV.as_bytes(), b'\t', "inline").unwrap();
    let picked = raw.select(&["P1_A", "gene"]).unwrap();
    assert_eq!(picked.headers(), &["P1_A", "gene"]);
    assert_eq!(picked.value(0, 1), "ENSG1");

    let removed = raw.retain_rows(|r| r[0] != "ENSG2");
    assert_eq!(removed, 1);
    assert_eq!(raw.n_rows(), 1);
}

#[test]
fn test_from_path_infers_delimiter_and_gzip() {
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("clinical.csv");
    std::fs::write(&csv_path, "Patient_ID,Age\nC3L-1,60\n").unwrap();
    let raw = RawTable::from_path(&csv_path).unwrap();
    assert_eq!(raw.headers(), &["Patient_ID", "Age"]);

    let gz_path = dir.path().join("proteomics.tsv.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(PROTEOMICS_TSV.as_bytes()).unwrap();
    std::fs::write(&gz_path, encoder.finish().unwrap()).unwrap();
    let raw = RawTable::from_path(&gz_path).unwrap();
    assert_eq!(raw.n_rows(), 2);
    assert_eq!(raw.value(0, 1), "1.5");
}

#[test]
fn test_comment_lines_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("somatic.maf");
    std::fs::write(&path, "#version 2.4\nHugo_Symbol\tTumor_Sample_Barcode\nTP53\tS1_T\n").unwrap();
    let raw = RawTable::from_path_with(&path, RawFormat::tsv().with_comment(b'#')).unwrap();
    assert_eq!(raw.headers(), &["Hugo_Symbol", "Tumor_Sample_Barcode"]);
    assert_eq!(raw.n_rows(), 1);
}

#[test]
fn test_missing_file() {
    let err = RawTable::from_path("/nonexistent/file.tsv").unwrap_err();
    assert!(matches!(err, RawError::Io { .. }));
}
