use super::*;
use crate::table::{Cell, ColumnKey, ColumnSelection, DataType};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn write_gz(dir: &Path, name: &str, content: &str) {
    let file = fs::File::create(dir.join(name)).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn resolver(source: Source, dir: &Path, entries: &[(&str, &str)]) -> Box<LocalResolver> {
    let mut files: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, name) in entries {
        files.entry(key.to_string()).or_default().push(name.to_string());
    }
    Box::new(LocalResolver::new(source.as_str(), dir, files))
}

#[test]
fn test_source_names() {
    assert_eq!("UMich".parse::<Source>().unwrap(), Source::Umich);
    assert!(matches!("pnnl".parse::<Source>(), Err(DatasetError::UnknownSource(_))));
    assert_eq!(Source::Washu.wildtype(), WildtypeConvention::TumorNormal);
    assert_eq!(Source::Bcm.wildtype(), WildtypeConvention::Plain);
}

#[test]
fn test_unsupported_cancer() {
    let err = Source::Umich.manifest("brca").unwrap_err();
    assert_eq!(err.to_string(), "Source 'umich' has no data for cancer type 'brca'");
    assert!(Source::Bcm.manifest("BRCA").is_ok());
}

#[test]
fn test_dataset_from_manifest_checks_version() {
    let err = Source::Bcm.dataset("brca", "9.9", "/nonexistent").unwrap_err();
    assert!(matches!(err, DatasetError::InvalidVersion { .. }));

    let dataset = Source::Umich.dataset("ov", "latest", "/nonexistent").unwrap();
    assert_eq!(dataset.version(), "1.1");
    assert_eq!(
        dataset.loader_types(),
        vec![DataType::Proteomics, DataType::Phosphoproteomics]
    );
}

#[test]
fn test_bcm_gene_level_tables() {
    let dir = TempDir::new().unwrap();
    let d = dir.path();
    write(d, "mapping.tsv", "gene\tgene_name\nENSG1\tTP53\nENSG2\tEGFR\n");
    write(d, "rna.tsv", "gene\tP1_T\tP1_A\tP2_T\nENSG1\t1\t2\t3\nENSG2\t4\t5\t6\nENSG3\t7\t8\t9\n");
    write(d, "prot_Tumor.tsv", "idx\tP1_T\tP2_T\nENSG1\t0.1\t0.2\n");
    write(d, "prot_Normal.tsv", "idx\tP1\nENSG1\t0.3\n");
    write(d, "phospho.tsv", "idx\tP1_T\nENSP1|ENSG1|S15|PEPK\t1.5\nENSP1|ENSG1||PEPK\t2\n");

    let resolver = resolver(
        Source::Bcm,
        d,
        &[
            ("mapping", "mapping.tsv"),
            ("transcriptomics", "rna.tsv"),
            ("proteomics", "prot_Tumor.tsv"),
            ("proteomics", "prot_Normal.tsv"),
            ("phosphoproteomics", "phospho.tsv"),
        ],
    );
    let mut dataset = Source::Bcm.dataset_with("brca", "1.0", resolver).unwrap();
    let report = dataset.load();

    assert_eq!(report.loaded.len(), 3);
    let failed: Vec<DataType> = report.failures.iter().map(|f| f.data_type).collect();
    assert_eq!(failed, vec![DataType::Cnv, DataType::Mirna]);

    let rna = dataset.get_table("transcriptomics").unwrap();
    assert_eq!(rna.index(), ["P1", "P2", "P1.N"]);
    assert_eq!(rna.columns(), [ColumnKey::gene("EGFR", "ENSG2"), ColumnKey::gene("TP53", "ENSG1")]);

    let prot = dataset.get_table("proteomics").unwrap();
    assert_eq!(prot.index(), ["P1", "P2", "P1.N"]);
    assert_eq!(prot.get("P1.N", &ColumnKey::gene("TP53", "ENSG1")), Some(&Cell::Number(0.3)));

    let phospho = dataset.get_table("phosphoproteomics").unwrap();
    assert_eq!(phospho.columns(), [ColumnKey::site("TP53", "S15", "PEPK", "ENSP1")]);

    assert_eq!(dataset.master_index().ids(), ["P1", "P2", "P1.N"]);
}

#[test]
fn test_bcm_r_style_header() {
    let dir = TempDir::new().unwrap();
    let d = dir.path();
    write(d, "mapping.tsv", "gene\tgene_name\nENSG1\tTP53\n");
    write(d, "rna.tsv", "P1_T\tP1_A\tP2_T\nENSG1\t1\t2\t3\n");

    let resolver = resolver(
        Source::Bcm,
        d,
        &[("mapping", "mapping.tsv"), ("transcriptomics", "rna.tsv")],
    );
    let mut dataset = Source::Bcm.dataset_with("brca", "1.0", resolver).unwrap();
    dataset.load();

    let rna = dataset.get_table("transcriptomics").unwrap();
    assert_eq!(rna.index(), ["P1", "P2", "P1.N"]);
    let tp53 = ColumnKey::gene("TP53", "ENSG1");
    assert_eq!(rna.get("P1", &tp53), Some(&Cell::Number(1.0)));
    assert_eq!(rna.get("P1.N", &tp53), Some(&Cell::Number(2.0)));
    assert_eq!(rna.get("P2", &tp53), Some(&Cell::Number(3.0)));
}

#[test]
fn test_umich_reference_intensity_and_aliquots() {
    let dir = TempDir::new().unwrap();
    let d = dir.path();
    write(
        d,
        "prot.tsv",
        "Index\tMaxPepProb\tNumberPSM\tGene\tReferenceIntensity\tCPT1\tCPT2\tQC1\tRefInt_pool01\n\
         ENSP1|ENST1|ENSG1|H1|H2|TP53-201|TP53\t0.9\t3\tTP53\t10\t12\t9\t10\t10\n",
    );
    write(
        d,
        "site.tsv",
        "Index\tGene\tPeptide\tMaxPepProb\tReferenceIntensity\tCPT1\tCPT2\n\
         ENSP1|ENST1|ENSG1|H1|H2|TP53-201|TP53|1_15_15_1_1_S15\tTP53\tPEPA\t1\t5\t6\t7\n\
         ENSP1|ENST1|ENSG1|H1|H2|TP53-201|TP53|1_15_20_2_1_S15\tTP53\tPEPA\t1\t5\t8\t8\n\
         ENSP1|ENST1|ENSG1|H1|H2|TP53-201|TP53|1_20_30_2_1_S20\tTP53\tPEPB\t1\t5\t4\t4\n",
    );
    write(d, "aliquots.tsv", "aliquot_ID\tpatient_ID\nCPT1\tC3L-00001-T\nCPT2\tC3L-00001-N\n");

    let resolver = resolver(
        Source::Umich,
        d,
        &[
            ("proteomics", "prot.tsv"),
            ("phosphoproteomics", "site.tsv"),
            ("aliquots", "aliquots.tsv"),
        ],
    );
    let mut dataset = Source::Umich.dataset_with("ccrcc", "1.0", resolver).unwrap();
    let report = dataset.load();
    assert!(report.is_complete(), "{:?}", report.failures);

    let prot = dataset.get_table("proteomics").unwrap();
    assert_eq!(prot.index(), ["C3L-00001", "C3L-00001.N"]);
    let tp53 = ColumnKey::gene("TP53", "ENSP1");
    assert_eq!(prot.get("C3L-00001", &tp53), Some(&Cell::Number(2.0)));
    assert_eq!(prot.get("C3L-00001.N", &tp53), Some(&Cell::Number(-1.0)));

    let phospho = dataset.get_table("phosphoproteomics").unwrap();
    assert_eq!(
        phospho.columns(),
        [
            ColumnKey::site("TP53", "S15", "PEPA", "ENSP1"),
            ColumnKey::site("TP53", "S20", "PEPB", "ENSP1"),
        ]
    );
    assert_eq!(
        phospho.get("C3L-00001", &ColumnKey::site("TP53", "S15", "PEPA", "ENSP1")),
        Some(&Cell::Number(1.0))
    );
}

#[test]
fn test_umich_without_aliquot_map() {
    let dir = TempDir::new().unwrap();
    let d = dir.path();
    write(
        d,
        "prot.tsv",
        "Index\tMaxPepProb\tNumberPSM\tGene\tReferenceIntensity\tC3N-00002-T\tJHU QC\n\
         ENSP1|ENST1|ENSG1|H1|H2|TP53-201|TP53\t0.9\t3\tTP53\t10\t11\t10\n",
    );
    let resolver = resolver(Source::Umich, d, &[("proteomics", "prot.tsv")]);
    let mut dataset = Source::Umich.dataset_with("ov", "1.0", resolver).unwrap();
    dataset.load();

    let prot = dataset.get_table("proteomics").unwrap();
    assert_eq!(prot.index(), ["C3N-00002"]);
}

#[test]
fn test_washu_tables_and_mutation_join() {
    let dir = TempDir::new().unwrap();
    let d = dir.path();
    write(d, "X_tumor_RNA.tsv", "gene_name\tgene_id\tC3L-00001-T\tC3L-00002-T\nTP53\tENSG1\t1\t2\n");
    write(d, "X_NAT_RNA.tsv", "gene_name\tgene_id\tC3L-00001-A\nTP53\tENSG1\t3\n");
    write_gz(
        d,
        "calls.maf.gz",
        "#version 2.4\n\
         Hugo_Symbol\tTumor_Sample_Barcode\tVariant_Classification\tHGVSp_Short\n\
         TP53\tC3L-00001_T\tMissense_Mutation\tp.R175H\n\
         TP53\tC3L-00001_T\tFrame_Shift_Del\tp.P72fs\n",
    );
    write(
        d,
        "purity.tsv",
        "Sample_ID\tESTIMATE_TumorPurity\nC3L-00001-T\t0.81\nC3N-09999-T\tNA\n",
    );
    write(d, "xcell.txt", "C3L-00001-T\tC3L-00001-A\nB-cells\t0.1\t0.2\n");
    write(d, "cibersort.txt", "Mixture\tB cells naive\tP-value\nC3L-00002-T\t0.05\t0\n");
    write(
        d,
        "mirna.tsv",
        "Name\tID\tAlias\tDerives_from\tC3L-00001.T.1\tC3L-00001.T.2\tC3L-00001.A\n\
         miR-1\tMIMAT1\tx\ty\t1\t3\t5\n",
    );

    let resolver = resolver(
        Source::Washu,
        d,
        &[
            ("transcriptomics", "X_tumor_RNA.tsv"),
            ("transcriptomics", "X_NAT_RNA.tsv"),
            ("somatic_mutation", "calls.maf.gz"),
            ("miRNA", "mirna.tsv"),
            ("tumor_purity", "purity.tsv"),
            ("xcell", "xcell.txt"),
            ("cibersort", "cibersort.txt"),
        ],
    );
    let mut dataset = Source::Washu.dataset_with("hnscc", "1.0", resolver).unwrap();
    let report = dataset.load();
    assert!(report.is_complete(), "{:?}", report.failures);

    let rna = dataset.get_table("transcriptomics").unwrap();
    assert_eq!(rna.index(), ["C3L-00001", "C3L-00002", "C3L-00001.N"]);

    let purity = dataset.get_table("tumor_purity").unwrap();
    assert_eq!(purity.index(), ["C3L-00001", "C3N-09999"]);
    let estimate = ColumnKey::flat("ESTIMATE_TumorPurity");
    assert_eq!(purity.get("C3N-09999", &estimate), Some(&Cell::Missing));
    assert!(!dataset.master_index().contains("C3N-09999"));

    let xcell = dataset.get_table("xcell").unwrap();
    assert_eq!(xcell.index(), ["C3L-00001", "C3L-00001.N"]);
    assert_eq!(xcell.get("C3L-00001.N", &ColumnKey::flat("B-cells")), Some(&Cell::Number(0.2)));

    let cibersort = dataset.get_table("cibersort").unwrap();
    assert_eq!(cibersort.get("C3L-00002", &ColumnKey::flat("B cells naive")), Some(&Cell::Number(0.05)));

    let mirna = dataset.get_table("miRNA").unwrap();
    let key = ColumnKey::gene("miR-1", "MIMAT1");
    assert_eq!(mirna.get("C3L-00001", &key), Some(&Cell::Number(2.0)));
    assert_eq!(mirna.get("C3L-00001.N", &key), Some(&Cell::Number(5.0)));

    let mutations = dataset.get_table("somatic_mutation").unwrap();
    assert_eq!(mutations.index(), ["C3L-00001", "C3L-00001"]);

    let joined = dataset
        .join_mutations_to_omics(
            "transcriptomics",
            &["TP53".to_string()],
            &ColumnSelection::from("TP53"),
            false,
            true,
        )
        .unwrap();
    let mutation = ColumnKey::flat("TP53_Mutation");
    assert_eq!(joined.get("C3L-00001", &mutation), Some(&Cell::from("Frame_Shift_Del")));
    assert_eq!(joined.get("C3L-00002", &mutation), Some(&Cell::from("Wildtype_Tumor")));
    assert_eq!(joined.get("C3L-00001.N", &mutation), Some(&Cell::from("Wildtype_Normal")));
    assert_eq!(
        joined.get("C3L-00001", &ColumnKey::flat("TP53_Mutation_Status")),
        Some(&Cell::from("Multiple_mutation"))
    );
}

#[test]
fn test_metadata_loader_splits_columns() {
    let dir = TempDir::new().unwrap();
    let d = dir.path();
    write(d, "clinical.csv", "case_id,Age,ImmuneScore,Stage\nC3L-00001,60,0.5,II\nC3L-00002,70,0.1,I\n");

    let resolver = resolver(Source::Bcm, d, &[("clinical", "clinical.csv")]);
    let mut dataset = Dataset::new("bcm", "brca", "1.0", resolver).with_loader(Box::new(
        MetadataLoader::new("case_id").with_derived_columns(["ImmuneScore", "Purity"]),
    ));
    let report = dataset.load();
    assert!(report.is_complete(), "{:?}", report.failures);

    let clinical = dataset.get_table("clinical").unwrap();
    assert_eq!(
        clinical.columns(),
        [
            ColumnKey::flat(crate::harmonize::SAMPLE_STATUS_COLUMN),
            ColumnKey::flat("Age"),
            ColumnKey::flat("Stage"),
        ]
    );
    let derived = dataset.get_table("derived_molecular").unwrap();
    assert_eq!(derived.get("C3L-00001", &ColumnKey::flat("ImmuneScore")), Some(&Cell::Number(0.5)));
}

mod properties {
    use super::*;
    use crate::identifier::is_canonical;
    use proptest::prelude::*;

    /// Tumor and normal suffixes each source documents
    fn suffixes(source: Source) -> [&'static str; 2] {
        match source {
            Source::Bcm => ["_T", "_A"],
            Source::Umich => ["-T", "-N"],
            Source::Washu => ["-T", "-A"],
        }
    }

    proptest! {
        /// Every shipped rule set maps its own labels onto the canonical grammar, idempotently
        #[test]
        fn test_source_rules_idempotent(
            source in prop::sample::select(Source::ALL.to_vec()),
            core in "[A-Z0-9]{1,4}-[0-9]{5}",
            normal in any::<bool>(),
        ) {
            let rules = source.rules().unwrap();
            let [tumor, normal_suffix] = suffixes(source);
            let raw = format!("{}{}", core, if normal { normal_suffix } else { tumor });
            let once = rules.normalize(&raw).unwrap();
            prop_assert!(is_canonical(&once));
            prop_assert_eq!(once.ends_with(".N"), normal);
            prop_assert_eq!(rules.normalize(&once).unwrap(), once);
        }
    }
}
