//! TOML configuration describing one dataset.
//!
//! ```toml
//! # omicsjoin.toml
//! [dataset]
//! source = "washu"
//! cancer_type = "hnscc"
//! data_dir = "/data/washu_hnscc"
//! version = "latest"
//! exclude_from_index = ["tumor_purity"]
//! wildtype = "tumor-normal"
//!
//! [files]
//! transcriptomics = ["HNSCC_tumor.tsv.gz", "HNSCC_NAT.tsv.gz"]
//!
//! [clinical]
//! file = "clinical.tsv"
//! id_column = "Patient_ID"
//! derived_columns = ["StromalScore", "ImmuneScore"]
//!
//! [[rules]]
//! pattern = "_T$"
//! replacement = ""
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use omicsjoin::dataset::{Dataset, LATEST};
use omicsjoin::identifier::Rule;
use omicsjoin::join::WildtypeConvention;
use omicsjoin::sources::{MetadataLoader, Source};
use omicsjoin::table::{DataType, INDEX_NAME};

/// Root configuration structure for omicsjoin.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Which dataset to load.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Per-key file name overrides, replacing the source manifest entries.
    #[serde(default)]
    pub files: BTreeMap<String, Vec<String>>,

    /// Optional clinical export.
    pub clinical: Option<ClinicalConfig>,

    /// Extra identifier rules applied after the source rules.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// The `[dataset]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Source name (bcm, umich, washu).
    pub source: String,

    /// Cancer type, e.g. `hnscc`.
    pub cancer_type: String,

    /// Directory holding the data files.
    pub data_dir: PathBuf,

    /// Data version or `latest`.
    pub version: String,

    /// Data types kept out of the master index.
    pub exclude_from_index: Vec<String>,

    /// Wildtype labeling override.
    pub wildtype: Option<WildtypeConvention>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            cancer_type: String::new(),
            data_dir: PathBuf::from("."),
            version: LATEST.to_string(),
            exclude_from_index: Vec::new(),
            wildtype: None,
        }
    }
}

/// The `[clinical]` section.
#[derive(Debug, Deserialize)]
pub struct ClinicalConfig {
    /// File name relative to `data_dir`.
    pub file: String,

    /// Column holding sample identifiers.
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Columns split off into `derived_molecular`.
    #[serde(default)]
    pub derived_columns: Vec<String>,
}

fn default_id_column() -> String {
    INDEX_NAME.to_string()
}

/// One `[[rules]]` entry.
#[derive(Debug, Deserialize)]
pub struct RuleConfig {
    /// Regex matched against the sample label.
    pub pattern: String,

    /// Replacement text.
    #[serde(default)]
    pub replacement: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Build the (unloaded) dataset this configuration describes.
    pub fn build(&self) -> Result<Dataset> {
        let section = &self.dataset;
        let source: Source = section
            .source
            .parse()
            .context("Invalid source in [dataset] section")?;
        let (mut resolver, version) = source
            .resolver(&section.cancer_type, &section.version, section.data_dir.clone())
            .with_context(|| format!("Cannot resolve files for {} {}", source, section.cancer_type))?;

        for (key, names) in &self.files {
            resolver = resolver.with_files(key.clone(), names.clone());
        }
        if let Some(clinical) = &self.clinical {
            resolver = resolver.with_files(DataType::Clinical.as_str(), vec![clinical.file.clone()]);
        }

        let mut dataset = source.dataset_with(&section.cancer_type, &version, Box::new(resolver))?;

        if !self.rules.is_empty() {
            let mut rules = dataset.rules().clone();
            for rule in &self.rules {
                rules.push(
                    Rule::replace(&rule.pattern, rule.replacement.clone())
                        .with_context(|| format!("Invalid identifier rule '{}'", rule.pattern))?,
                );
            }
            dataset = dataset.with_rules(rules);
        }

        if let Some(clinical) = &self.clinical {
            dataset = dataset.with_loader(Box::new(
                MetadataLoader::new(clinical.id_column.clone())
                    .with_derived_columns(clinical.derived_columns.iter().cloned()),
            ));
        }

        let mut exclude = dataset.excluded().to_vec();
        for name in &section.exclude_from_index {
            let data_type = name
                .parse::<DataType>()
                .context("Invalid exclude_from_index entry")?;
            if !exclude.contains(&data_type) {
                exclude.push(data_type);
            }
        }
        dataset = dataset.with_excluded(exclude);

        if let Some(wildtype) = section.wildtype {
            dataset = dataset.with_wildtype(wildtype);
        }
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [dataset]
            source = "washu"
            cancer_type = "hnscc"
            data_dir = "/data/washu"
            exclude_from_index = ["tumor_purity"]
            wildtype = "tumor-normal"

            [files]
            transcriptomics = ["a.tsv", "b.tsv"]

            [clinical]
            file = "clinical.tsv"
            derived_columns = ["ImmuneScore"]

            [[rules]]
            pattern = "_T$"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.dataset.source, "washu");
        assert_eq!(config.dataset.version, "latest");
        assert_eq!(config.dataset.wildtype, Some(WildtypeConvention::TumorNormal));
        assert_eq!(config.files["transcriptomics"], ["a.tsv", "b.tsv"]);
        let clinical = config.clinical.as_ref().unwrap();
        assert_eq!(clinical.id_column, "Patient_ID");
        assert_eq!(config.rules[0].replacement, "");
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.dataset.version, LATEST);
        assert!(config.clinical.is_none());
        assert!(config.build().is_err());
    }

    #[test]
    fn test_build_applies_overrides() {
        let toml = r#"
            [dataset]
            source = "washu"
            cancer_type = "HNSCC"
            wildtype = "plain"
            exclude_from_index = ["miRNA"]

            [clinical]
            file = "clinical.tsv"
            id_column = "case_id"

            [[rules]]
            pattern = "^X"
            replacement = "C3L"
        "#;

        let dataset = Config::from_str(toml).unwrap().build().unwrap();
        assert_eq!(dataset.source(), "washu");
        assert_eq!(dataset.cancer_type(), "hnscc");
        assert_eq!(dataset.wildtype(), WildtypeConvention::Plain);
        assert_eq!(dataset.rules().len(), 3);
        assert!(dataset.loader_types().contains(&DataType::Clinical));
        assert_eq!(dataset.excluded(), [DataType::TumorPurity, DataType::Mirna]);
    }

    #[test]
    fn test_unknown_source() {
        let config = Config::from_str("[dataset]\nsource = \"pnnl\"\ncancer_type = \"brca\"\n").unwrap();
        let err = config.build().unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown source 'pnnl'"));
    }

    #[test]
    fn test_bad_exclude() {
        let config =
            Config::from_str("[dataset]\nsource = \"bcm\"\ncancer_type = \"brca\"\nexclude_from_index = [\"x\"]\n")
                .unwrap();
        assert!(config.build().is_err());
    }
}
