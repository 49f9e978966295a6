//! Institution-specific loaders.
//!
//! Each source knows its file manifest, its sample labeling convention and
//! how to shape each of its exports:
//!
//! - [`bcm`] - gene-level tables mapped through a gene key
//! - [`umich`] - reference-intensity proteomics and multi-site phosphoproteomics
//! - [`washu`] - split tumor/normal transcriptomics, MAF mutations, miRNA
//!
//! [`MetadataLoader`] covers the sample-major clinical exports shared by all
//! of them.

/// Baylor College of Medicine gene-level exports.
pub mod bcm;

/// University of Michigan proteomics exports.
pub mod umich;

/// Washington University exports.
pub mod washu;

mod clinical;

#[cfg(test)]
mod tests;

pub use clinical::MetadataLoader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::dataset::{
    Dataset, DatasetError, FileResolver, LoadContext, LoadError, LocalResolver, Manifest, SourceLoader,
};
use crate::genekey::GeneKeyTable;
use crate::identifier::RuleSet;
use crate::join::WildtypeConvention;
use crate::raw::RawTable;
use crate::table::DataType;

/// Institutions with a built-in loader set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Baylor College of Medicine
    Bcm,
    /// University of Michigan
    Umich,
    /// Washington University in St. Louis
    Washu,
}

impl Source {
    /// Every source
    pub const ALL: [Source; 3] = [Source::Bcm, Source::Umich, Source::Washu];

    /// Lowercase source name
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Bcm => "bcm",
            Source::Umich => "umich",
            Source::Washu => "washu",
        }
    }

    /// Cancer types this source has data for
    pub fn cancer_types(self) -> &'static [&'static str] {
        match self {
            Source::Bcm => bcm::CANCER_TYPES,
            Source::Umich => umich::CANCER_TYPES,
            Source::Washu => washu::CANCER_TYPES,
        }
    }

    fn check_cancer(self, cancer_type: &str) -> Result<String, DatasetError> {
        let lower = cancer_type.to_ascii_lowercase();
        if self.cancer_types().contains(&lower.as_str()) {
            Ok(lower)
        } else {
            Err(DatasetError::UnsupportedCancer {
                source_name: self.as_str().to_string(),
                cancer_type: cancer_type.to_string(),
            })
        }
    }

    /// Declared versions and files for one cancer type
    pub fn manifest(self, cancer_type: &str) -> Result<Manifest, DatasetError> {
        let cancer = self.check_cancer(cancer_type)?;
        Ok(match self {
            Source::Bcm => bcm::manifest(&cancer),
            Source::Umich => umich::manifest(&cancer),
            Source::Washu => washu::manifest(&cancer),
        })
    }

    /// Identifier rules shared by the source's loaders
    pub fn rules(self) -> Result<RuleSet, DatasetError> {
        Ok(match self {
            Source::Bcm => bcm::rules()?,
            Source::Umich => umich::rules()?,
            Source::Washu => washu::rules()?,
        })
    }

    /// Data types left out of the master index unless configured otherwise
    pub fn excluded_from_index(self) -> Vec<DataType> {
        match self {
            Source::Washu => washu::excluded_from_index(),
            Source::Bcm | Source::Umich => Vec::new(),
        }
    }

    /// One loader per data type the source provides for a cancer type
    pub fn loaders(self, cancer_type: &str) -> Result<Vec<Box<dyn SourceLoader>>, DatasetError> {
        let cancer = self.check_cancer(cancer_type)?;
        Ok(match self {
            Source::Bcm => bcm::loaders(),
            Source::Umich => umich::loaders(&cancer)?,
            Source::Washu => washu::loaders(),
        })
    }

    /// How the source labels samples without a mutation
    pub fn wildtype(self) -> WildtypeConvention {
        match self {
            Source::Washu => WildtypeConvention::TumorNormal,
            Source::Bcm | Source::Umich => WildtypeConvention::Plain,
        }
    }

    /// Resolver over `data_dir` for one manifest version; returns the resolved version too.
    pub fn resolver(
        self,
        cancer_type: &str,
        version: &str,
        data_dir: impl Into<PathBuf>,
    ) -> Result<(LocalResolver, String), DatasetError> {
        let manifest = self.manifest(cancer_type)?;
        LocalResolver::from_manifest(self.as_str(), data_dir, &manifest, version)
    }

    /// Dataset with this source's rules, loaders and wildtype convention.
    ///
    /// Nothing is read until [`Dataset::load`] is called.
    pub fn dataset(self, cancer_type: &str, version: &str, data_dir: impl Into<PathBuf>) -> Result<Dataset, DatasetError> {
        let (resolver, version) = self.resolver(cancer_type, version, data_dir)?;
        self.dataset_with(cancer_type, &version, Box::new(resolver))
    }

    /// Same as [`dataset`](Source::dataset) over a caller supplied resolver.
    pub fn dataset_with(
        self,
        cancer_type: &str,
        version: &str,
        resolver: Box<dyn FileResolver>,
    ) -> Result<Dataset, DatasetError> {
        let cancer = self.check_cancer(cancer_type)?;
        let dataset = Dataset::new(self.as_str(), cancer.as_str(), version, resolver)
            .with_rules(self.rules()?)
            .with_wildtype(self.wildtype())
            .with_excluded(self.excluded_from_index());
        Ok(self
            .loaders(&cancer)?
            .into_iter()
            .fold(dataset, Dataset::with_loader))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|src| src.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DatasetError::UnknownSource(s.to_string()))
    }
}

/// Resolver key of the gene key helper file
pub const MAPPING_KEY: &str = "mapping";

/// Gene key from the `mapping` helper file, built once per load.
pub(crate) fn gene_key<'c>(
    ctx: &'c mut LoadContext<'_>,
    source: &str,
    id_column: &str,
    symbol_column: &str,
) -> Result<&'c GeneKeyTable, LoadError> {
    ctx.gene_key(|resolver| {
        let paths = resolver.resolve(MAPPING_KEY)?;
        let path = paths.first().ok_or_else(|| DatasetError::UndefinedDataType {
            key: MAPPING_KEY.to_string(),
            source_name: source.to_string(),
        })?;
        let raw = RawTable::from_path(path)?;
        Ok(GeneKeyTable::build(&raw, id_column, symbol_column)?)
    })
}
