//! Reference-intensity TMT exports. Every value is a log2 intensity that is
//! turned into a ratio by subtracting the `ReferenceIntensity` channel;
//! pooled-reference and QC channels are dropped. Some cancers label
//! channels by aliquot and need an aliquot-to-patient map.

use log::debug;
use regex::Regex;
use std::collections::HashMap;

use crate::dataset::{build_lookup, DatasetError, LoadContext, LoadError, Manifest, SourceLoader};
use crate::identifier::{IdentifierError, Rule, RuleSet};
use crate::raw::RawTable;
use crate::shaper::{unlocalized_duplicates, LocalizedSite, TableShaper};
use crate::table::{ColumnKey, DataType, Table};

/// Cancer types with UMich data
pub const CANCER_TYPES: &[&str] = &["ccrcc", "ov", "ucec"];

/// Resolver key of the aliquot-to-patient helper file
pub const ALIQUOT_KEY: &str = "aliquots";

/// Channel every other channel is divided by (subtracted from, in log space)
pub const REFERENCE_CHANNEL: &str = "ReferenceIntensity";

const PROTEIN_REPORT: &str = "Report_abundance_groupby=protein_protNorm=MD_gu=2.tsv";
const SITE_REPORT: &str = "Report_abundance_groupby=multi-site_protNorm=MD_gu=2.tsv";
const INDEX_COLUMN: &str = "Index";
const PEPTIDE_COLUMN: &str = "Peptide";

/// Files per version
pub fn manifest(cancer: &str) -> Manifest {
    let reports: [(&str, &[&str]); 2] = [("proteomics", &[PROTEIN_REPORT]), ("phosphoproteomics", &[SITE_REPORT])];
    match cancer {
        "ov" => {
            let mapping: (&str, &[&str]) = (ALIQUOT_KEY, &["OV_sample_TMT_annotation_UMich_GENCODE34_0315.csv"]);
            Manifest::new()
                .with_version("1.0", &reports)
                .with_version("1.1", &[reports[0], reports[1], mapping])
        }
        _ => {
            let mapping: (&str, &[&str]) = (ALIQUOT_KEY, &["aliquot_to_patient_ID.tsv"]);
            Manifest::new().with_version("1.0", &[reports[0], reports[1], mapping])
        }
    }
}

/// `-T` suffix dropped, `-N` suffix marks a normal
pub fn rules() -> Result<RuleSet, IdentifierError> {
    RuleSet::from_pairs("umich", &[("-T$", ""), ("-N$", ".N")])
}

/// Proteomics and phosphoproteomics loaders configured for one cancer type
pub fn loaders(cancer: &str) -> Result<Vec<Box<dyn SourceLoader>>, DatasetError> {
    let channels = Channels::for_cancer(cancer)?;
    Ok(vec![
        Box::new(ProteomicsLoader(channels.clone())),
        Box::new(PhosphoLoader(channels)),
    ])
}

/// Per-cancer channel handling shared by both loaders
#[derive(Debug, Clone)]
struct Channels {
    qc_labels: Vec<String>,
    qc_pattern: Option<&'static str>,
    aliquot_columns: (&'static str, &'static str),
    aliquot_exclude: Option<Regex>,
}

impl Channels {
    fn for_cancer(cancer: &str) -> Result<Self, DatasetError> {
        let numbered = |prefix: &str, n: usize, width: usize| -> Vec<String> {
            (1..=n).map(|i| format!("{}{:0width$}", prefix, i, width = width)).collect()
        };
        let channels = match cancer {
            "ccrcc" => Channels {
                qc_labels: [numbered("NCI7-", 5, 1), numbered("QC", 8, 1), numbered("RefInt_pool", 23, 2)].concat(),
                qc_pattern: None,
                aliquot_columns: ("aliquot_ID", "patient_ID"),
                aliquot_exclude: None,
            },
            "ucec" => Channels {
                qc_labels: [numbered("NX", 18, 1), numbered("RefInt_pool", 17, 2)].concat(),
                qc_pattern: None,
                aliquot_columns: ("aliquot_ID", "patient_ID"),
                aliquot_exclude: None,
            },
            _ => Channels {
                qc_labels: Vec::new(),
                qc_pattern: Some("JHU"),
                aliquot_columns: ("specimen", "sample"),
                aliquot_exclude: Some(compile("JHU")?),
            },
        };
        Ok(channels)
    }

    /// Dataset rules, headed by the aliquot map when the version ships one.
    fn rules(&self, ctx: &mut LoadContext<'_>) -> Result<RuleSet, LoadError> {
        let mut rules = ctx.rules().clone();
        match ctx.resolve(ALIQUOT_KEY) {
            Ok(_) => {}
            Err(DatasetError::UndefinedDataType { .. }) => {
                debug!("No aliquot map for umich {} {}", ctx.cancer_type(), ctx.version());
                return Ok(rules);
            }
            Err(e) => return Err(e.into()),
        }
        let (from, to) = self.aliquot_columns;
        let exclude = self.aliquot_exclude.as_ref();
        let map = ctx.lookup(ALIQUOT_KEY, |resolver| {
            let mut merged = HashMap::new();
            for path in resolver.resolve(ALIQUOT_KEY)? {
                let raw = RawTable::from_path(&path)?;
                merged.extend(build_lookup(&raw, from, to, exclude)?);
            }
            Ok(merged)
        })?;
        rules.prepend(Rule::Lookup(map.clone()));
        Ok(rules)
    }

    fn shaper<'r>(&self, data_type: DataType, rules: &'r RuleSet, id_columns: &[&str]) -> Result<TableShaper<'r>, LoadError> {
        let shaper = TableShaper::new(data_type, rules)
            .id_columns(id_columns.iter().copied())
            .reference_intensity(REFERENCE_CHANNEL)
            .drop_samples(self.qc_labels.iter().cloned());
        match self.qc_pattern {
            Some(pattern) => Ok(shaper.drop_samples_matching(pattern)?),
            None => Ok(shaper),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, IdentifierError> {
    Regex::new(pattern).map_err(|source| IdentifierError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Protein-level report: `Index` field 0 is the Database_ID, field 6 the gene symbol
struct ProteomicsLoader(Channels);

impl SourceLoader for ProteomicsLoader {
    fn data_type(&self) -> DataType {
        DataType::Proteomics
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let rules = self.0.rules(ctx)?;
        let shaper = self
            .0
            .shaper(DataType::Proteomics, &rules, &[INDEX_COLUMN, "MaxPepProb", "NumberPSM", "Gene"])?;
        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            let index = part.require_column(INDEX_COLUMN)?;
            tables.push(shaper.shape(part, |raw, row| Ok(protein_key(raw.value(row, index))))?);
        }
        Ok(tables)
    }
}

fn protein_key(index: &str) -> Option<ColumnKey> {
    let fields: Vec<&str> = index.split('|').collect();
    match (fields.first(), fields.get(6)) {
        (Some(db), Some(name)) if !db.is_empty() && !name.is_empty() => Some(ColumnKey::gene(*name, *db)),
        _ => None,
    }
}

/// Multi-site report: `Index` is
/// `Database_ID|Transcript_ID|Gene_ID|Havana_gene|Havana_transcript|Transcript|Name|Site`
/// and its `Site` field is `num_start_end_detected_localized_site`.
struct PhosphoLoader(Channels);

impl SourceLoader for PhosphoLoader {
    fn data_type(&self) -> DataType {
        DataType::Phosphoproteomics
    }

    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
        let rules = self.0.rules(ctx)?;
        let shaper = self.0.shaper(
            DataType::Phosphoproteomics,
            &rules,
            &[INDEX_COLUMN, "Gene", PEPTIDE_COLUMN, "MaxPepProb"],
        )?;
        let mut tables = Vec::with_capacity(raw.len());
        for part in &raw {
            let index = part.require_column(INDEX_COLUMN)?;
            let peptide = part.require_column(PEPTIDE_COLUMN)?;
            let sites: Vec<Option<LocalizedSite>> = (0..part.n_rows())
                .map(|row| parse_site(part.value(row, index), part.value(row, peptide)))
                .collect();
            let dropped = unlocalized_duplicates(&sites);
            if !dropped.is_empty() {
                debug!("{}: dropped {} partially localized duplicate sites", part.source(), dropped.len());
            }
            tables.push(shaper.shape(part, |_, row| {
                if dropped.contains(&row) {
                    return Ok(None);
                }
                Ok(sites.get(row).and_then(|s| s.as_ref()).map(|s| s.key.clone()))
            })?);
        }
        Ok(tables)
    }
}

fn parse_site(index: &str, peptide: &str) -> Option<LocalizedSite> {
    let fields: Vec<&str> = index.split('|').collect();
    if fields.len() < 8 {
        return None;
    }
    let parts: Vec<&str> = fields[7].split('_').collect();
    if parts.len() < 6 || parts[5].is_empty() {
        return None;
    }
    Some(LocalizedSite {
        key: ColumnKey::site(fields[6], parts[5], peptide, fields[0]),
        detected: parts[3].to_string(),
        localized: parts[4].to_string(),
    })
}
