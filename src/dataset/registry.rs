#[cfg(feature = "colorized_output")]
use console::style;
use log::{error, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{DatasetError, FileResolver, LoadContext, LoadError, SourceLoader};
use crate::genekey::GeneKeyTable;
use crate::harmonize::{reindex_metadata, sort_rows_tumor_first, unionize, MasterIndex};
use crate::identifier::RuleSet;
use crate::join::{self, MutationJoinOptions, WildtypeConvention};
use crate::table::{ColumnSelection, DataType, Table, TableKind};

/// Shape of one loaded table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedTable {
    /// Data type
    pub data_type: DataType,
    /// Number of samples
    pub rows: usize,
    /// Number of columns
    pub columns: usize,
}

/// A loader that failed; the rest of the dataset is still usable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// Data type of the failed loader
    pub data_type: DataType,
    /// Error message
    pub error: String,
}

/// Outcome of [`Dataset::load`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Tables registered
    pub loaded: Vec<LoadedTable>,
    /// Loaders that failed
    pub failures: Vec<LoadFailure>,
    /// Size of the master index
    pub master_index_len: usize,
}

impl LoadReport {
    /// True when every loader succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} loaded, {} failed, {} samples in master index",
            self.loaded.len(),
            self.failures.len(),
            self.master_index_len
        )
    }

    /// Format the report with colors
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Loaded tables").bold().cyan()));
            for table in &self.loaded {
                output.push_str(&format!(
                    "  {} {} samples x {} columns\n",
                    style(table.data_type).green(),
                    table.rows,
                    table.columns
                ));
            }
            if !self.failures.is_empty() {
                output.push_str(&format!("{}\n", style("Failed").bold().red()));
                for failure in &self.failures {
                    output.push_str(&format!("  {}: {}\n", style(failure.data_type).red(), failure.error));
                }
            }
            output.push_str(&format!("{}: {}\n", style("Summary").bold(), self.summary()));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loaded tables")?;
        for table in &self.loaded {
            writeln!(f, "  {} {} samples x {} columns", table.data_type, table.rows, table.columns)?;
        }
        if !self.failures.is_empty() {
            writeln!(f, "Failed")?;
            for failure in &self.failures {
                writeln!(f, "  {}: {}", failure.data_type, failure.error)?;
            }
        }
        writeln!(f, "Summary: {}", self.summary())
    }
}

/// Registry of canonical tables for one (source, cancer type) pair
///
/// Built explicitly and populated by [`load`](Dataset::load); nothing is read
/// at construction time.
pub struct Dataset {
    source: String,
    cancer_type: String,
    version: String,
    resolver: Box<dyn FileResolver>,
    rules: RuleSet,
    loaders: Vec<Box<dyn SourceLoader>>,
    tables: BTreeMap<DataType, Table>,
    gene_key: Option<GeneKeyTable>,
    exclude_from_index: Vec<DataType>,
    wildtype: WildtypeConvention,
    master_index: MasterIndex,
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("source", &self.source)
            .field("cancer_type", &self.cancer_type)
            .field("version", &self.version)
            .field("tables", &self.list_tables())
            .finish()
    }
}

impl Dataset {
    /// Empty dataset over a resolver
    pub fn new(
        source: impl Into<String>,
        cancer_type: impl Into<String>,
        version: impl Into<String>,
        resolver: Box<dyn FileResolver>,
    ) -> Self {
        let source = source.into();
        Self {
            rules: RuleSet::new(source.clone()),
            source,
            cancer_type: cancer_type.into(),
            version: version.into(),
            resolver,
            loaders: Vec::new(),
            tables: BTreeMap::new(),
            gene_key: None,
            exclude_from_index: Vec::new(),
            wildtype: WildtypeConvention::default(),
            master_index: MasterIndex::default(),
        }
    }

    /// Add a loader; a later loader for the same data type replaces the earlier one.
    pub fn with_loader(mut self, loader: Box<dyn SourceLoader>) -> Self {
        self.loaders.retain(|l| l.data_type() != loader.data_type());
        self.loaders.push(loader);
        self
    }

    /// Identifier rules shared by all loaders
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Tables whose samples stay out of the master index
    pub fn with_excluded(mut self, exclude: Vec<DataType>) -> Self {
        self.exclude_from_index = exclude;
        self
    }

    /// Wildtype labeling for mutation joins
    pub fn with_wildtype(mut self, wildtype: WildtypeConvention) -> Self {
        self.wildtype = wildtype;
        self
    }

    /// Source name
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Cancer type
    pub fn cancer_type(&self) -> &str {
        &self.cancer_type
    }

    /// Data version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Identifier rules
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Data types kept out of the master index
    pub fn excluded(&self) -> &[DataType] {
        &self.exclude_from_index
    }

    /// Wildtype convention
    pub fn wildtype(&self) -> WildtypeConvention {
        self.wildtype
    }

    /// Data types with a loader
    pub fn loader_types(&self) -> Vec<DataType> {
        self.loaders.iter().map(|l| l.data_type()).collect()
    }

    /// Run every loader, register the results and harmonize.
    ///
    /// A failing loader is logged and reported; the others still load.
    pub fn load(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let mut ctx = LoadContext::new(
            &*self.resolver,
            &self.rules,
            &self.cancer_type,
            &self.version,
        )
        .with_gene_key(self.gene_key.take());

        for loader in &self.loaders {
            let data_type = loader.data_type();
            info!("Loading {} {} {}", self.source, self.cancer_type, data_type);
            match run_loader(loader.as_ref(), &mut ctx) {
                Ok(tables) => {
                    for mut table in tables {
                        let Some(table_type) = table.data_type() else {
                            warn!("Loader for {} produced unnamed table '{}'", data_type, table.name());
                            continue;
                        };
                        sort_rows_tumor_first(&mut table);
                        info!("  {}: {} x {}", table_type, table.n_rows(), table.n_cols());
                        report.loaded.push(LoadedTable {
                            data_type: table_type,
                            rows: table.n_rows(),
                            columns: table.n_cols(),
                        });
                        self.tables.insert(table_type, table);
                    }
                }
                Err(e) => {
                    error!(
                        "Failed to load {} for {} {}: {}",
                        data_type, self.source, self.cancer_type, e
                    );
                    report.failures.push(LoadFailure {
                        data_type,
                        error: e.to_string(),
                    });
                }
            }
        }
        self.gene_key = ctx.into_gene_key();

        if let Err(e) = self.harmonize() {
            error!("Failed to harmonize {} {}: {}", self.source, self.cancer_type, e);
        }
        report.master_index_len = self.master_index.len();
        report
    }

    /// Recompute the master index and reindex the metadata tables against it.
    pub fn harmonize(&mut self) -> Result<(), DatasetError> {
        self.master_index = unionize(self.tables.values(), &self.exclude_from_index);
        for data_type in DataType::of_kind(TableKind::Metadata) {
            if let Some(table) = self.tables.get(&data_type) {
                let reindexed = reindex_metadata(&self.master_index, table)?;
                self.tables.insert(data_type, reindexed);
            }
        }
        Ok(())
    }

    /// Register a table under its data type, replacing any previous one.
    pub fn register(&mut self, table: Table) -> Result<(), DatasetError> {
        let data_type = table.data_type().ok_or_else(|| DatasetError::UndefinedDataType {
            key: table.name().to_string(),
            source_name: self.source.clone(),
        })?;
        self.tables.insert(data_type, table);
        Ok(())
    }

    /// Table by name; `TableNotAvailable` for unknown or unloaded names.
    pub fn get_table(&self, name: &str) -> Result<&Table, DatasetError> {
        name.parse::<DataType>()
            .ok()
            .and_then(|t| self.tables.get(&t))
            .ok_or_else(|| DatasetError::TableNotAvailable {
                name: name.to_string(),
                available: self.list_tables().iter().map(|t| t.to_string()).collect(),
            })
    }

    /// Table by data type
    pub fn table(&self, data_type: DataType) -> Option<&Table> {
        self.tables.get(&data_type)
    }

    /// Loaded data types
    pub fn list_tables(&self) -> Vec<DataType> {
        self.tables.keys().copied().collect()
    }

    /// All loaded tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Master sample index computed by the last load
    pub fn master_index(&self) -> &MasterIndex {
        &self.master_index
    }

    /// [`join::join_omics_to_omics`] by table name
    pub fn join_omics_to_omics(
        &self,
        left: &str,
        right: &str,
        left_cols: &ColumnSelection,
        right_cols: &ColumnSelection,
    ) -> Result<Table, DatasetError> {
        let (left, right) = (self.get_table(left)?, self.get_table(right)?);
        Ok(join::join_omics_to_omics(left, right, left_cols, right_cols)?)
    }

    /// [`join::join_metadata_to_omics`] by table name
    pub fn join_metadata_to_omics(
        &self,
        metadata: &str,
        omics: &str,
        metadata_cols: &ColumnSelection,
        omics_cols: &ColumnSelection,
    ) -> Result<Table, DatasetError> {
        let (metadata, omics) = (self.get_table(metadata)?, self.get_table(omics)?);
        Ok(join::join_metadata_to_omics(metadata, omics, metadata_cols, omics_cols)?)
    }

    /// [`join::join_mutations_to_omics`] against the somatic mutation table,
    /// using the dataset's wildtype convention.
    pub fn join_mutations_to_omics(
        &self,
        omics: &str,
        mutation_genes: &[String],
        omics_cols: &ColumnSelection,
        multiple_mutations: bool,
        show_location: bool,
    ) -> Result<Table, DatasetError> {
        let mutations = self.get_table(DataType::SomaticMutation.as_str())?;
        let omics = self.get_table(omics)?;
        let options = self.mutation_options(multiple_mutations, show_location);
        Ok(join::join_mutations_to_omics(
            mutations,
            omics,
            mutation_genes,
            omics_cols,
            &options,
        )?)
    }

    /// [`join::join_metadata_to_mutations`] against the somatic mutation table
    pub fn join_metadata_to_mutations(
        &self,
        metadata: &str,
        metadata_cols: &ColumnSelection,
        mutation_genes: &[String],
        multiple_mutations: bool,
        show_location: bool,
    ) -> Result<Table, DatasetError> {
        let metadata = self.get_table(metadata)?;
        let mutations = self.get_table(DataType::SomaticMutation.as_str())?;
        let options = self.mutation_options(multiple_mutations, show_location);
        Ok(join::join_metadata_to_mutations(
            metadata,
            mutations,
            metadata_cols,
            mutation_genes,
            &options,
        )?)
    }

    fn mutation_options(&self, multiple_mutations: bool, show_location: bool) -> MutationJoinOptions {
        MutationJoinOptions {
            multiple_mutations,
            show_location,
            wildtype: self.wildtype,
        }
    }
}

fn run_loader(loader: &dyn SourceLoader, ctx: &mut LoadContext<'_>) -> Result<Vec<Table>, LoadError> {
    let paths = ctx.resolve(&loader.file_key())?;
    let raw = paths
        .iter()
        .map(|p| loader.parse(p))
        .collect::<Result<Vec<_>, _>>()?;
    loader.shape(raw, ctx)
}
