//! Radiated X-ray emission compared against normalized gas heating.

use crate::domain::XrayResult;
use crate::fields::check_length;
use crate::numerics::stable_sum_iter;
use serde::Serialize;

pub const HEATING_FLAG: f64 = 1.0;
pub const COOLING_FLAG: f64 = -1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XrayFractionSummary {
    pub cells: usize,
    pub max_fraction: f64,
    /// `Σ(f·h) / Σh` over all cells.
    pub heating_weighted_mean: f64,
    /// `None` when no fraction is finite and positive.
    pub min_log10_fraction: Option<f64>,
    pub max_log10_fraction: Option<f64>,
    pub net_heating_cells: usize,
    pub net_cooling_cells: usize,
}

pub fn xray_fractions(emissivity: &[f64], normalized_heating: &[f64]) -> XrayResult<Vec<f64>> {
    check_length("normalized_heating", normalized_heating, emissivity.len())?;
    Ok(emissivity
        .iter()
        .zip(normalized_heating)
        .map(|(&emitted, &heating)| emitted / heating)
        .collect())
}

pub fn xray_fraction_summary(
    emissivity: &[f64],
    normalized_heating: &[f64],
    heating_flags: Option<&[f64]>,
) -> XrayResult<XrayFractionSummary> {
    let fractions = xray_fractions(emissivity, normalized_heating)?;
    if let Some(flags) = heating_flags {
        check_length("heating_flags", flags, emissivity.len())?;
    }

    let max_fraction = fractions
        .iter()
        .copied()
        .filter(|value| !value.is_nan())
        .fold(f64::NAN, f64::max);
    let weighted = stable_sum_iter(
        fractions
            .iter()
            .zip(normalized_heating)
            .map(|(&fraction, &heating)| fraction * heating),
    );
    let total_heating = stable_sum_iter(normalized_heating.iter().copied());

    let logs: Vec<f64> = fractions
        .iter()
        .filter(|value| value.is_finite() && **value > 0.0)
        .map(|value| value.log10())
        .collect();
    let min_log10_fraction = logs.iter().copied().reduce(f64::min);
    let max_log10_fraction = logs.iter().copied().reduce(f64::max);

    let count_flag = |target: f64| {
        heating_flags
            .map(|flags| flags.iter().filter(|&&flag| flag == target).count())
            .unwrap_or(0)
    };

    let summary = XrayFractionSummary {
        cells: fractions.len(),
        max_fraction,
        heating_weighted_mean: weighted / total_heating,
        min_log10_fraction,
        max_log10_fraction,
        net_heating_cells: count_flag(HEATING_FLAG),
        net_cooling_cells: count_flag(COOLING_FLAG),
    };
    tracing::debug!(
        cells = summary.cells,
        max_fraction = summary.max_fraction,
        "computed X-ray fraction summary"
    );
    Ok(summary)
}
