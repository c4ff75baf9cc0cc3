use super::CliError;
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use xray_core::common::config::SUPPORT_DATA_DIR_ENV;
use xray_core::common::{TableConfig, TableFormat};
use xray_core::domain::{EmissivityError, EnergyBand, TableKind};
use xray_core::fields::{CellCatalog, CellData, Metallicity};
use xray_core::numerics::stable_sum;

#[derive(clap::Args)]
pub(super) struct TableArgs {
    /// Directory holding the emissivity table files
    #[arg(long)]
    pub(super) data_dir: Option<PathBuf>,

    /// Support data directory searched when --data-dir is not given
    #[arg(long, env = SUPPORT_DATA_DIR_ENV)]
    pub(super) support_data_dir: Option<PathBuf>,

    /// Table file format (json or hdf5)
    #[arg(long, default_value = "json")]
    pub(super) format: String,

    /// Emission table type (cloudy or apec)
    #[arg(long, default_value = "cloudy")]
    pub(super) table_type: String,
}

impl TableArgs {
    pub(super) fn table_kind(&self) -> Result<TableKind, CliError> {
        Ok(self.table_type.parse::<TableKind>()?)
    }

    pub(super) fn to_config(&self) -> Result<TableConfig, CliError> {
        let format = TableFormat::from_token(&self.format).ok_or_else(|| {
            CliError::Usage(format!(
                "Invalid table format '{}'; expected 'json' or 'hdf5'.",
                self.format
            ))
        })?;

        let mut config = TableConfig::default().with_format(format);
        if let Some(data_dir) = &self.data_dir {
            config = config.with_data_dir(data_dir);
        }
        if let Some(support_data_dir) = &self.support_data_dir {
            config = config.with_support_data_dir(support_data_dir);
        }
        Ok(config)
    }
}

pub(super) fn energy_band(e_min: f64, e_max: f64) -> Result<EnergyBand, CliError> {
    Ok(EnergyBand::new(e_min, e_max)?)
}

pub(super) fn metallicity_choice(field: Option<String>, constant: Option<f64>) -> Metallicity {
    match (field, constant) {
        (Some(name), _) => Metallicity::Field(name),
        (None, Some(value)) => Metallicity::Constant(value),
        (None, None) => Metallicity::None,
    }
}

pub(super) fn load_cells(path: &Path) -> Result<CellCatalog, CliError> {
    let cells = CellCatalog::load_json(path)?;
    tracing::info!(
        path = %path.display(),
        fields = cells.field_names().count(),
        "loaded cell catalog"
    );
    Ok(cells)
}

pub(super) fn require_field<'a>(cells: &'a CellCatalog, name: &str) -> Result<&'a [f64], CliError> {
    cells
        .field(name)
        .ok_or_else(|| CliError::Compute(EmissivityError::MissingField(name.to_string())))
}

pub(super) fn write_json_report<T: Serialize>(path: &Path, report: &T) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory '{}'", parent.display()))?;
    }
    let rendered =
        serde_json::to_string_pretty(report).context("failed to serialize JSON report")?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write JSON report '{}'", path.display()))?;
    Ok(())
}

/// Min, max and sum over the finite entries of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(super) struct FieldStats {
    pub(super) min: f64,
    pub(super) max: f64,
    pub(super) total: f64,
}

pub(super) fn field_stats(values: &[f64]) -> Option<FieldStats> {
    let finite: Vec<f64> = values.iter().copied().filter(|value| value.is_finite()).collect();
    let min = finite.iter().copied().reduce(f64::min)?;
    let max = finite.iter().copied().reduce(f64::max)?;
    Some(FieldStats {
        min,
        max,
        total: stable_sum(&finite),
    })
}

pub(super) fn render_stats(label: &str, unit: &str, values: &[f64]) -> String {
    match field_stats(values) {
        Some(stats) => format!(
            "{label}: min {:.6e}, max {:.6e}, total {:.6e} {unit}",
            stats.min, stats.max, stats.total
        ),
        None => format!("{label}: no finite values"),
    }
}
