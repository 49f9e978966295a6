//! Gene-level tables keyed by Ensembl accession and mapped through a
//! GENCODE gene key. Sample labels end in `_T` (tumor) or `_A` (normal).

use crate::dataset::{find_part, LoadContext, LoadError, Manifest, SourceLoader};
use crate::genekey::GeneKeyTable;
use crate::identifier::{IdentifierError, Rule, RuleSet};
use crate::raw::RawTable;
use crate::shaper::{concat_disjoint, TableShaper};
use crate::table::{ColumnKey, DataType, Table};

/// Cancer types with BCM data
pub const CANCER_TYPES: &[&str] = &["brca", "coad", "hnscc", "lscc", "luad"];

const ID_COLUMN: &str = "idx";

/// Files per version
pub fn manifest(cancer: &str) -> Manifest {
    let upper = cancer.to_ascii_uppercase();
    let transcriptomics = format!("{}-gene_rsem_removed_circRNA_tumor_normal_UQ_log2(x+1)_BCM.txt.gz", upper);
    let prot_tumor = format!(
        "{}_proteomics_gene_abundance_log2_reference_intensity_normalized_Tumor.txt.gz",
        upper
    );
    let prot_normal = format!(
        "{}_proteomics_gene_abundance_log2_reference_intensity_normalized_Normal.txt.gz",
        upper
    );
    let phospho = format!(
        "{}_phospho_site_abundance_log2_reference_intensity_normalized_Tumor.txt.gz",
        upper
    );
    let cnv = format!("{}_WGS_gene_level_CNV_BCM.txt.gz", upper);
    let mirna = format!("{}-miRNA_mature_tumor_normal_log2(x+1)_BCM.txt.gz", upper);
    Manifest::new().with_version(
        "1.0",
        &[
            (super::MAPPING_KEY, &["gencode.v34.basic.annotation-mapping.txt.gz"]),
            ("transcriptomics", &[transcriptomics.as_str()]),
            ("proteomics", &[prot_tumor.as_str(), prot_normal.as_str()]),
            ("phosphoproteomics", &[phospho.as_str()]),
            ("CNV", &[cnv.as_str()]),
            ("miRNA", &[mirna.as_str()]),
        ],
    )
}

/// `_T` suffix dropped, `_A` suffix marks a normal
pub fn rules() -> Result<RuleSet, IdentifierError> {
    RuleSet::from_pairs("bcm", &[("_T$", ""), ("_A$", ".N")])
}

/// One loader per data type
pub fn loaders() -> Vec<Box<dyn SourceLoader>> {
    vec![
        Box::new(GeneLevelLoader(DataType::Transcriptomics)),
        Box::new(ProteomicsLoader),
        Box::new(PhosphoLoader),
        Box::new(GeneLevelLoader(DataType::Cnv)),
        Box::new(MirnaLoader),
    ]
}

fn gene_key<'c>(ctx: &'c mut LoadContext<'_>) -> Result<&'c GeneKeyTable, LoadError> {
    super::gene_key(ctx, "bcm", "gene", "gene_name")
}

/// Shape a file whose first column holds Database_IDs into `(Name, Database_ID)` columns.
fn shape_gene_level(
    data_type: DataType,
    raw: &RawTable,
    rules: &RuleSet,
    key: &GeneKeyTable,
) -> Result<Table, LoadError> {
    let id_column = raw.headers().first().cloned().unwrap_or_default();
    let table = TableShaper::new(data_type, rules)
        .id_columns([id_column])
        .shape(raw, |raw, row| {
            let id = raw.value(row, 0);
            Ok(key.map(id).map(|name| ColumnKey::gene(name, id)))
        })?;
    Ok(table)
}

/// Transcriptomics and CNV: one file, gene-level
struct GeneLevelLoader(DataType);

impl SourceLoader for GeneLevelLoader {
    fn data_type(&self) -> DataType {
        self.0
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let rules = ctx.rules();
        let key = gene_key(ctx)?;
        raw.iter()
            .map(|part| shape_gene_level(self.0, part, rules, key))
            .collect()
    }
}

/// Tumor and normal proteomics files; the normal file carries bare patient labels.
struct ProteomicsLoader;

impl SourceLoader for ProteomicsLoader {
    fn data_type(&self) -> DataType {
        DataType::Proteomics
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let rules = ctx.rules();
        let mut normal_rules = rules.clone();
        normal_rules.push(Rule::MarkNormal);
        let key = gene_key(ctx)?;

        let tumor = find_part(&raw, DataType::Proteomics, "Tumor")?;
        let mut parts = vec![shape_gene_level(DataType::Proteomics, tumor, rules, key)?];
        if let Ok(normal) = find_part(&raw, DataType::Proteomics, "Normal") {
            parts.push(shape_gene_level(DataType::Proteomics, normal, &normal_rules, key)?);
        }
        Ok(concat_disjoint(parts)?.into_iter().collect())
    }
}

/// Site-level phosphoproteomics: `idx` is `Database_ID|Gene_Key|Site|Peptide`
struct PhosphoLoader;

impl SourceLoader for PhosphoLoader {
    fn data_type(&self) -> DataType {
        DataType::Phosphoproteomics
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let rules = ctx.rules();
        let key = gene_key(ctx)?;
        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            let idx = part.require_column(ID_COLUMN)?;
            let table = TableShaper::new(DataType::Phosphoproteomics, rules)
                .id_columns([ID_COLUMN])
                .shape(part, |raw, row| Ok(site_key(raw.value(row, idx), key)))?;
            tables.push(table);
        }
        Ok(tables)
    }
}

fn site_key(idx: &str, key: &GeneKeyTable) -> Option<ColumnKey> {
    let mut fields = idx.split('|');
    let database_id = fields.next()?;
    let name = key.map(fields.next()?)?;
    let site = fields.next().filter(|s| !s.is_empty())?;
    let peptide = fields.next().unwrap_or_default();
    Some(ColumnKey::site(name, site, peptide, database_id))
}

/// Mature miRNA, flat keys
struct MirnaLoader;

impl SourceLoader for MirnaLoader {
    fn data_type(&self) -> DataType {
        DataType::Mirna
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            let id = part.require_column(ID_COLUMN)?;
            let table = TableShaper::new(DataType::Mirna, ctx.rules())
                .id_columns([ID_COLUMN])
                .shape(part, |raw, row| Ok(Some(ColumnKey::flat(raw.value(row, id)))))?;
            tables.push(table);
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_key_maps_gene_key_field() {
        let key = GeneKeyTable::from_pairs([("ENSG1", "TP53")]).unwrap();
        assert_eq!(
            site_key("ENSP9|ENSG1|S15|PEPTIDE", &key),
            Some(ColumnKey::site("TP53", "S15", "PEPTIDE", "ENSP9"))
        );
        assert_eq!(site_key("ENSP9|ENSG2|S15|PEPTIDE", &key), None);
        assert_eq!(site_key("ENSP9|ENSG1||PEPTIDE", &key), None);
    }

    #[test]
    fn test_manifest_lists_tumor_and_normal_proteomics() {
        let manifest = manifest("luad");
        let files = manifest.files("1.0").unwrap();
        assert_eq!(files["proteomics"].len(), 2);
        assert!(files["proteomics"][0].starts_with("LUAD_proteomics"));
    }
}
