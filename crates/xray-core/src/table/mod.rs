mod model;
mod source;

#[cfg(feature = "hdf5")]
mod hdf5_source;

pub use model::EmissivityTable;
pub use source::{JsonTableSource, TableSource};

#[cfg(feature = "hdf5")]
pub use hdf5_source::Hdf5TableSource;

use crate::common::{TableConfig, TableFormat};
use crate::domain::{EmissionComponent, EmissivityError, TableKind, XrayResult};
use std::path::{Path, PathBuf};

pub const LOG_T_DATASET: &str = "log_T";
pub const LOG_NH_DATASET: &str = "log_nH";
pub const ENERGY_DATASET: &str = "E";

/// Resolves the versioned table file for `kind`, failing when it is absent.
pub fn locate_table(config: &TableConfig, kind: TableKind) -> XrayResult<PathBuf> {
    let path = config.table_path(kind);
    if path.exists() {
        return Ok(path);
    }

    let error = EmissivityError::MissingDataFile {
        file_name: config.file_name(kind),
        path,
        url: config.data_url.clone(),
    };
    tracing::error!("{}", error);
    Err(error)
}

pub fn open_source(path: &Path, format: TableFormat) -> XrayResult<Box<dyn TableSource>> {
    match format {
        TableFormat::Json => Ok(Box::new(JsonTableSource::open(path)?)),
        #[cfg(feature = "hdf5")]
        TableFormat::Hdf5 => Ok(Box::new(Hdf5TableSource::open(path)?)),
        #[cfg(not(feature = "hdf5"))]
        TableFormat::Hdf5 => Err(EmissivityError::Parse {
            path: path.to_path_buf(),
            message: "HDF5 tables require the 'hdf5' feature; use a JSON table instead"
                .to_string(),
        }),
    }
}

/// Reads grids, energy edges and emissivity arrays. Metals are read only
/// when requested; a density grid marks a two-dimensional table.
pub fn load_table(source: &dyn TableSource, use_metals: bool) -> XrayResult<EmissivityTable> {
    tracing::info!(source = %source.source_name(), use_metals, "reading emissivity table");

    let log_t = source.read_vector(LOG_T_DATASET)?;
    let primordial = source.read_dataset(EmissionComponent::Primordial.dataset_name())?;
    let log_nh = if source.contains(LOG_NH_DATASET) {
        Some(source.read_vector(LOG_NH_DATASET)?)
    } else {
        None
    };
    let metals = if use_metals {
        Some(source.read_dataset(EmissionComponent::Metals.dataset_name())?)
    } else {
        None
    };
    let energy_bins = source.read_vector(ENERGY_DATASET)?;

    let table = EmissivityTable::new(log_t, log_nh, energy_bins, primordial, metals)?
        .with_version(source.declared_version()?);
    tracing::debug!(
        temperatures = table.log_t().len(),
        densities = table.log_nh().map_or(0, <[f64]>::len),
        bins = table.bin_count(),
        "emissivity table loaded"
    );
    Ok(table)
}

/// Rejects tables that declare a version older than the configured one.
/// Tables without a declared version are accepted.
pub fn check_version(
    table: &EmissivityTable,
    config: &TableConfig,
    kind: TableKind,
) -> XrayResult<()> {
    let expected = config.version(kind);
    match table.version() {
        Some(found) if found < expected => Err(EmissivityError::ObsoleteTableVersion {
            found,
            expected,
            file_name: config.file_name(kind),
            url: config.data_url.clone(),
        }),
        _ => Ok(()),
    }
}

/// Locates, opens, loads and version-checks the table for `kind`.
pub fn load_configured_table(
    config: &TableConfig,
    kind: TableKind,
    use_metals: bool,
) -> XrayResult<EmissivityTable> {
    let path = locate_table(config, kind)?;
    let source = open_source(&path, config.format)?;
    let table = load_table(source.as_ref(), use_metals)?;
    check_version(&table, config, kind)?;
    Ok(table)
}
