//! RNA-Seq, somatic mutation, miRNA, tumor purity and immune deconvolution
//! exports. Tumor and normal RNA arrive as separate files; mutation calls are
//! MAF records.

use log::debug;
use std::path::Path;

use crate::dataset::{find_part, LoadContext, LoadError, Manifest, SourceLoader};
use crate::identifier::{IdentifierError, Rule, RuleSet};
use crate::join::{GENE_COLUMN, LOCATION_COLUMN, MUTATION_COLUMN};
use crate::raw::{RawError, RawFormat, RawTable};
use crate::shaper::{concat_disjoint, TableShaper};
use crate::table::{ColumnKey, DataType, Table, INDEX_NAME};

/// Cancer types with WashU data
pub const CANCER_TYPES: &[&str] = &[
    "brca", "ccrcc", "coad", "gbm", "hnscc", "lscc", "luad", "ov", "pdac", "ucec",
];

/// Pan-cancer ESTIMATE tumor purity file, shared by every cancer type
pub const TUMOR_PURITY_FILE: &str = "CPTAC_pancan_RNA_tumor_purity_ESTIMATE_WashU.tsv.gz";

/// Sample column of the tumor purity file
const PURITY_SAMPLE_COLUMN: &str = "Sample_ID";

/// MAF column holding the sample label
pub const MAF_SAMPLE_COLUMN: &str = "Tumor_Sample_Barcode";

/// MAF columns kept, with their canonical names
const MAF_COLUMNS: [(&str, &str); 3] = [
    ("Hugo_Symbol", GENE_COLUMN),
    ("Variant_Classification", MUTATION_COLUMN),
    ("HGVSp_Short", LOCATION_COLUMN),
];

/// Files per version
pub fn manifest(cancer: &str) -> Manifest {
    let upper = cancer.to_ascii_uppercase();
    let tumor = format!("{}_tumor_RNA-Seq_Expr_WashU_FPKM.tsv.gz", upper);
    let normal = format!("{}_NAT_RNA-Seq_Expr_WashU_FPKM.tsv.gz", upper);
    let maf = format!("{}_discovery.dnp.annotated.exonic.maf.gz", upper);
    let mirna = format!("{}_mature_miRNA_combined.tsv", upper);
    let xcell = format!("{}_xCell.txt", upper);
    let cibersort = format!("CIBERSORT.Output_Abs_{}.txt", upper);
    Manifest::new().with_version(
        "1.0",
        &[
            ("transcriptomics", &[tumor.as_str(), normal.as_str()]),
            ("somatic_mutation", &[maf.as_str()]),
            ("miRNA", &[mirna.as_str()]),
            ("tumor_purity", &[TUMOR_PURITY_FILE]),
            ("xcell", &[xcell.as_str()]),
            ("cibersort", &[cibersort.as_str()]),
        ],
    )
}

/// `-T` suffix dropped, `-A` suffix marks a normal
pub fn rules() -> Result<RuleSet, IdentifierError> {
    RuleSet::from_pairs("washu", &[("-T$", ""), ("-A$", ".N")])
}

/// One loader per data type
pub fn loaders() -> Vec<Box<dyn SourceLoader>> {
    vec![
        Box::new(TranscriptomicsLoader),
        Box::new(MutationLoader),
        Box::new(MirnaLoader),
        Box::new(TumorPurityLoader),
        Box::new(XcellLoader),
        Box::new(CibersortLoader),
    ]
}

/// Data types kept out of the master index by default.
///
/// The purity file covers every CPTAC cancer, so its samples would swamp the
/// index of a single-cancer dataset.
pub fn excluded_from_index() -> Vec<DataType> {
    vec![DataType::TumorPurity]
}

/// Tumor file plus NAT (normal adjacent tissue) file
struct TranscriptomicsLoader;

impl SourceLoader for TranscriptomicsLoader {
    fn data_type(&self) -> DataType {
        DataType::Transcriptomics
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let mut normal_rules = ctx.rules().clone();
        normal_rules.push(Rule::MarkNormal);

        let tumor = find_part(&raw, DataType::Transcriptomics, "tumor")?;
        let mut parts = vec![shape_expression(tumor, ctx.rules())?];
        if let Ok(normal) = find_part(&raw, DataType::Transcriptomics, "NAT") {
            parts.push(shape_expression(normal, &normal_rules)?);
        }
        Ok(concat_disjoint(parts)?.into_iter().collect())
    }
}

fn shape_expression(raw: &RawTable, rules: &RuleSet) -> Result<Table, LoadError> {
    let name_col = raw.require_column("gene_name")?;
    let id_col = raw.require_column("gene_id")?;
    let table = TableShaper::new(DataType::Transcriptomics, rules)
        .id_columns(["gene_name", "gene_id"])
        .shape(raw, |raw, row| {
            let (name, id) = (raw.value(row, name_col), raw.value(row, id_col));
            Ok((!name.is_empty() && !id.is_empty()).then(|| ColumnKey::gene(name, id)))
        })?;
    Ok(table)
}

/// MAF somatic mutation calls, one row per record
struct MutationLoader;

impl SourceLoader for MutationLoader {
    fn data_type(&self) -> DataType {
        DataType::SomaticMutation
    }

    fn parse(&self, path: &Path) -> Result<RawTable, LoadError> {
        Ok(RawTable::from_path_with(path, RawFormat::tsv().with_comment(b'#'))?)
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let rules = ctx.rules().clone().with_replace("_T$", "")?;
        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            let records = maf_records(part)?;
            tables.push(
                TableShaper::new(DataType::SomaticMutation, &rules).shape_records(&records, INDEX_NAME)?,
            );
        }
        Ok(tables)
    }
}

/// Keep the sample, gene, classification and protein change columns under canonical names.
fn maf_records(raw: &RawTable) -> Result<RawTable, LoadError> {
    let mut names = vec![MAF_SAMPLE_COLUMN];
    names.extend(MAF_COLUMNS.iter().map(|(from, _)| *from));
    let selected = raw.select(&names)?;

    let mut headers = vec![INDEX_NAME.to_string()];
    headers.extend(MAF_COLUMNS.iter().map(|(_, to)| to.to_string()));
    Ok(RawTable::from_records(
        selected.source().to_string(),
        headers,
        selected.records().to_vec(),
    ))
}

/// Mature miRNA; technical replicates end in `.1`, `.2`, ...
struct MirnaLoader;

const MIRNA_ID_COLUMNS: [&str; 4] = ["Name", "ID", "Alias", "Derives_from"];

impl SourceLoader for MirnaLoader {
    fn data_type(&self) -> DataType {
        DataType::Mirna
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let rules = ctx
            .rules()
            .clone()
            .with_replace(r"\.T$", "")?
            .with_replace(r"\.A$", ".N")?;
        let shaper = TableShaper::new(DataType::Mirna, &rules)
            .id_columns(MIRNA_ID_COLUMNS)
            .average_replicates(r"\.\d$")?;

        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            let name = part.require_column("Name")?;
            let id = part.require_column("ID")?;
            tables.push(shaper.shape(part, |raw, row| {
                Ok(Some(ColumnKey::gene(raw.value(row, name), raw.value(row, id))))
            })?);
        }
        Ok(tables)
    }
}

/// ESTIMATE scores, one row per tumor sample
struct TumorPurityLoader;

impl SourceLoader for TumorPurityLoader {
    fn data_type(&self) -> DataType {
        DataType::TumorPurity
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let shaper = TableShaper::new(DataType::TumorPurity, ctx.rules());
        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            tables.push(shaper.shape_records(part, PURITY_SAMPLE_COLUMN)?);
        }
        Ok(tables)
    }
}

/// xCell enrichment: cell types as rows, samples as columns
struct XcellLoader;

impl SourceLoader for XcellLoader {
    fn data_type(&self) -> DataType {
        DataType::Xcell
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            let id_column = first_header(part)?;
            let shaper = TableShaper::new(DataType::Xcell, ctx.rules()).id_columns([id_column]);
            tables.push(shaper.shape(part, |raw, row| {
                let cell_type = raw.value(row, 0);
                Ok((!cell_type.is_empty()).then(|| ColumnKey::flat(cell_type)))
            })?);
        }
        Ok(tables)
    }
}

/// CIBERSORT absolute mode output, one row per sample
struct CibersortLoader;

impl SourceLoader for CibersortLoader {
    fn data_type(&self) -> DataType {
        DataType::Cibersort
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let shaper = TableShaper::new(DataType::Cibersort, ctx.rules());
        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            let id_column = first_header(part)?;
            debug!("{}: samples in column '{}'", part.source(), id_column);
            tables.push(shaper.shape_records(part, &id_column)?);
        }
        Ok(tables)
    }
}

/// Row-name column of a matrix export
fn first_header(raw: &RawTable) -> Result<String, LoadError> {
    raw.headers().first().cloned().ok_or_else(|| {
        LoadError::Raw(RawError::MissingColumn {
            column: "row names".to_string(),
            source_name: raw.source().to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maf_records_rename() {
        let raw = RawTable::from_records(
            "calls.maf",
            ["Hugo_Symbol", "Tumor_Sample_Barcode", "Variant_Classification", "HGVSp_Short", "Extra"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![["TP53", "C3L-00001_T", "Missense_Mutation", "p.R175H", "x"]
                .iter()
                .map(|s| s.to_string())
                .collect()],
        );
        let records = maf_records(&raw).unwrap();
        assert_eq!(records.headers(), ["Patient_ID", "Gene", "Mutation", "Location"]);
        assert_eq!(records.records()[0], ["C3L-00001_T", "TP53", "Missense_Mutation", "p.R175H"]);
    }

    #[test]
    fn test_maf_missing_column() {
        let raw = RawTable::from_records("calls.maf", vec!["Hugo_Symbol".to_string()], Vec::new());
        let err = maf_records(&raw).unwrap_err();
        assert!(err.to_string().contains("Tumor_Sample_Barcode"));
    }
}
