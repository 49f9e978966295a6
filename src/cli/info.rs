use anyhow::Result;
use log::info;
use std::path::Path;

use omicsjoin::harmonize::SAMPLE_STATUS_COLUMN;
use omicsjoin::table::INDEX_NAME;

use super::load_dataset;

/// Load a dataset and print each table's shape and any load failures
pub fn run_tables(config: &Path) -> Result<()> {
    let (dataset, report) = load_dataset(config)?;
    info!("{} {} v{}", dataset.source(), dataset.cancer_type(), dataset.version());

    #[cfg(feature = "colorized_output")]
    {
        print!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        print!("{}", report);
    }

    Ok(())
}

/// Print the master sample index as `Patient_ID<TAB>status` lines
pub fn run_index(config: &Path) -> Result<()> {
    let (dataset, _) = load_dataset(config)?;
    let index = dataset.master_index();
    let (tumor, normal) = index.counts();
    info!("Master index: {} tumor, {} normal samples", tumor, normal);

    println!("{}\t{}", INDEX_NAME, SAMPLE_STATUS_COLUMN);
    for (id, status) in index.iter_status() {
        println!("{}\t{}", id, status);
    }
    Ok(())
}
