use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{DatasetError, FileResolver, LoadError};
use crate::genekey::GeneKeyTable;
use crate::identifier::RuleSet;
use crate::raw::RawTable;
use crate::table::{DataType, Table};

/// One loader per data type of a source
///
/// [`Dataset::load`](super::Dataset::load) drives the stages: the resolver
/// finds the files for [`file_key`](SourceLoader::file_key), each file is
/// [`parse`](SourceLoader::parse)d, and [`shape`](SourceLoader::shape) turns
/// the raw tables into canonical tables that the dataset registers.
pub trait SourceLoader {
    /// Data type this loader produces
    fn data_type(&self) -> DataType;

    /// Resolver key of the input files
    fn file_key(&self) -> String {
        self.data_type().as_str().to_string()
    }

    /// Parse one input file.
    fn parse(&self, path: &Path) -> Result<RawTable, LoadError> {
        Ok(RawTable::from_path(path)?)
    }

    /// Shape the parsed files into canonical tables (usually exactly one).
    fn shape(&self, raw: Vec<RawTable>, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError>;
}

/// State shared by the loaders of one dataset during a load
pub struct LoadContext<'a> {
    resolver: &'a dyn FileResolver,
    rules: &'a RuleSet,
    cancer_type: &'a str,
    version: &'a str,
    gene_key: Option<GeneKeyTable>,
    lookups: HashMap<String, HashMap<String, String>>,
}

impl<'a> LoadContext<'a> {
    /// Context over a resolver and the dataset's identifier rules
    pub fn new(resolver: &'a dyn FileResolver, rules: &'a RuleSet, cancer_type: &'a str, version: &'a str) -> Self {
        Self {
            resolver,
            rules,
            cancer_type,
            version,
            gene_key: None,
            lookups: HashMap::new(),
        }
    }

    /// Reuse a gene key built by an earlier load
    pub fn with_gene_key(mut self, gene_key: Option<GeneKeyTable>) -> Self {
        self.gene_key = gene_key;
        self
    }

    /// Paths for a key
    pub fn resolve(&self, key: &str) -> Result<Vec<PathBuf>, DatasetError> {
        self.resolver.resolve(key)
    }

    /// Identifier rules of the dataset
    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Cancer type of the dataset
    pub fn cancer_type(&self) -> &'a str {
        self.cancer_type
    }

    /// Resolved data version
    pub fn version(&self) -> &'a str {
        self.version
    }

    /// Gene key table, built by `build` on first use and cached afterwards.
    pub fn gene_key<F>(&mut self, build: F) -> Result<&GeneKeyTable, LoadError>
    where
        F: FnOnce(&dyn FileResolver) -> Result<GeneKeyTable, LoadError>,
    {
        let table = match self.gene_key.take() {
            Some(table) => table,
            None => {
                let table = build(self.resolver)?;
                debug!("Built gene key with {} entries", table.len());
                table
            }
        };
        Ok(&*self.gene_key.insert(table))
    }

    /// Named helper lookup (aliquot maps), built on first use and cached.
    pub fn lookup<F>(&mut self, name: &str, build: F) -> Result<&HashMap<String, String>, LoadError>
    where
        F: FnOnce(&dyn FileResolver) -> Result<HashMap<String, String>, LoadError>,
    {
        if !self.lookups.contains_key(name) {
            let map = build(self.resolver)?;
            debug!("Built {} lookup with {} entries", name, map.len());
            self.lookups.insert(name.to_string(), map);
        }
        Ok(&*self.lookups.entry(name.to_string()).or_default())
    }

    /// Hand the gene key back to the dataset
    pub fn into_gene_key(self) -> Option<GeneKeyTable> {
        self.gene_key
    }
}

/// Parsed file whose name contains `part`
pub fn find_part<'r>(raw: &'r [RawTable], data_type: DataType, part: &str) -> Result<&'r RawTable, LoadError> {
    raw.iter()
        .find(|r| file_name(r.source()).contains(part))
        .ok_or_else(|| LoadError::MissingPart {
            data_type,
            part: part.to_string(),
        })
}

fn file_name(source: &str) -> &str {
    Path::new(source)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source)
}

/// Build an exact-match label map from two columns of a raw table.
///
/// Rows whose target matches `exclude` (quality control rows) are skipped;
/// one label mapped to two different targets is a
/// [`LoadError::AmbiguousAliquot`].
pub fn build_lookup(
    raw: &RawTable,
    from_column: &str,
    to_column: &str,
    exclude: Option<&Regex>,
) -> Result<HashMap<String, String>, LoadError> {
    let from = raw.require_column(from_column)?;
    let to = raw.require_column(to_column)?;
    let mut map: HashMap<String, String> = HashMap::new();
    for row in 0..raw.n_rows() {
        let (key, value) = (raw.value(row, from), raw.value(row, to));
        if key.is_empty() || value.is_empty() || exclude.map_or(false, |re| re.is_match(value)) {
            continue;
        }
        match map.get(key) {
            Some(existing) if existing == value => {}
            Some(existing) => {
                return Err(LoadError::AmbiguousAliquot {
                    aliquot: key.to_string(),
                    first: existing.clone(),
                    second: value.to_string(),
                })
            }
            None => {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    Ok(map)
}
