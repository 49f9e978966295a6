use log::info;
use std::collections::BTreeMap;

use super::{Dataset, DatasetError, LoadReport};
use crate::harmonize::{unionize, MasterIndex};
use crate::table::{DataType, Table};

/// Datasets of one cancer type from several sources
#[derive(Debug)]
pub struct Cohort {
    cancer_type: String,
    datasets: BTreeMap<String, Dataset>,
}

impl Cohort {
    /// Empty cohort
    pub fn new(cancer_type: impl Into<String>) -> Self {
        Self {
            cancer_type: cancer_type.into(),
            datasets: BTreeMap::new(),
        }
    }

    /// Add a dataset, replacing any earlier one from the same source.
    pub fn add(&mut self, dataset: Dataset) -> Result<(), DatasetError> {
        if !dataset.cancer_type().eq_ignore_ascii_case(&self.cancer_type) {
            return Err(DatasetError::CohortMismatch {
                expected: self.cancer_type.clone(),
                found: dataset.cancer_type().to_string(),
            });
        }
        self.datasets.insert(dataset.source().to_string(), dataset);
        Ok(())
    }

    /// Load every dataset; one report per source.
    pub fn load_all(&mut self) -> BTreeMap<String, LoadReport> {
        self.datasets
            .iter_mut()
            .map(|(source, dataset)| {
                let report = dataset.load();
                info!("{} {}: {}", self.cancer_type, source, report.summary());
                (source.clone(), report)
            })
            .collect()
    }

    /// Union of the sample identifiers of every dataset
    pub fn master_index(&self, exclude: &[DataType]) -> MasterIndex {
        unionize(self.datasets.values().flat_map(|d| d.tables()), exclude)
    }

    /// Table of one source
    pub fn get_table(&self, source: &str, name: &str) -> Result<&Table, DatasetError> {
        self.dataset(source)
            .ok_or_else(|| DatasetError::UnknownSource(source.to_string()))?
            .get_table(name)
    }

    /// Dataset of one source
    pub fn dataset(&self, source: &str) -> Option<&Dataset> {
        self.datasets.get(source)
    }

    /// Source names, sorted
    pub fn sources(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    /// Cancer type
    pub fn cancer_type(&self) -> &str {
        &self.cancer_type
    }
}
