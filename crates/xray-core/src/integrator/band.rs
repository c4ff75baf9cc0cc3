use crate::common::constants::ENERGY_BOUNDS_RELATIVE_TOLERANCE;
use crate::domain::{EmissivityError, EnergyBand, XrayResult};
use crate::numerics::digitize;

/// Energy bins covered by a rest-frame band, with the first and last widths
/// shrunk to the requested edges.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSelection {
    pub rest_frame: EnergyBand,
    pub start: usize,
    pub end: usize,
    pub widths: Vec<f64>,
}

impl BandSelection {
    pub fn bins(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    pub fn total_width(&self) -> f64 {
        self.widths.iter().sum()
    }
}

pub fn check_energy_bounds(band: EnergyBand, energy_bins: &[f64]) -> XrayResult<()> {
    let lower = energy_bins[0];
    let upper = energy_bins[energy_bins.len() - 1];
    if (band.e_min - lower) / band.e_min < -ENERGY_BOUNDS_RELATIVE_TOLERANCE
        || (band.e_max - upper) / band.e_max > ENERGY_BOUNDS_RELATIVE_TOLERANCE
    {
        return Err(EmissivityError::EnergyBounds { lower, upper });
    }
    Ok(())
}

/// Brackets an observer-frame band against the table's bin edges after
/// shifting it to the rest frame.
pub fn select_band(
    band: EnergyBand,
    redshift: f64,
    energy_bins: &[f64],
    bin_widths: &[f64],
) -> XrayResult<BandSelection> {
    let rest_frame = band.rest_frame(redshift);
    check_energy_bounds(rest_frame, energy_bins)?;

    let last_edge = energy_bins.len() - 1;
    let start = digitize(rest_frame.e_min, energy_bins)
        .saturating_sub(1)
        .min(last_edge);
    let end = digitize(rest_frame.e_max, energy_bins).min(last_edge);

    // A band squeezed into the tolerance margin past the last edge can
    // bracket no bins at all.
    if end <= start {
        return Err(EmissivityError::InvalidBand {
            e_min: band.e_min,
            e_max: band.e_max,
            reason: "band does not overlap any tabulated energy bin",
        });
    }

    let mut widths = bin_widths[start..end].to_vec();
    widths[0] -= rest_frame.e_min - energy_bins[start];
    let last = widths.len() - 1;
    widths[last] -= energy_bins[end] - rest_frame.e_max;

    tracing::debug!(
        e_min = rest_frame.e_min,
        e_max = rest_frame.e_max,
        start,
        end,
        "bracketed rest-frame band"
    );

    Ok(BandSelection {
        rest_frame,
        start,
        end,
        widths,
    })
}

#[cfg(test)]
mod tests {
    use super::{check_energy_bounds, select_band};
    use crate::domain::{EmissivityError, EnergyBand};
    use approx::assert_relative_eq;

    const EDGES: [f64; 3] = [0.1, 1.0, 10.0];
    const WIDTHS: [f64; 2] = [0.9, 9.0];

    fn band(e_min: f64, e_max: f64) -> EnergyBand {
        EnergyBand::new(e_min, e_max).expect("valid band")
    }

    #[test]
    fn band_spanning_two_bins_clips_both_ends() {
        let selection = select_band(band(0.5, 5.0), 0.0, &EDGES, &WIDTHS).expect("selection");
        assert_eq!(selection.bins(), 0..2);
        assert_relative_eq!(selection.widths[0], 0.5);
        assert_relative_eq!(selection.widths[1], 4.0);
    }

    #[test]
    fn band_on_exact_edges_keeps_full_widths() {
        let selection = select_band(band(0.1, 10.0), 0.0, &EDGES, &WIDTHS).expect("selection");
        assert_eq!(selection.bins(), 0..2);
        assert_relative_eq!(selection.widths[0], 0.9);
        assert_relative_eq!(selection.widths[1], 9.0);
    }

    #[test]
    fn band_inside_one_bin_uses_requested_width() {
        let selection = select_band(band(2.0, 3.5), 0.0, &EDGES, &WIDTHS).expect("selection");
        assert_eq!(selection.bins(), 1..2);
        assert_relative_eq!(selection.total_width(), 1.5);
    }

    #[test]
    fn redshift_moves_band_to_rest_frame() {
        let selection = select_band(band(0.25, 2.5), 1.0, &EDGES, &WIDTHS).expect("selection");
        assert_relative_eq!(selection.rest_frame.e_min, 0.5);
        assert_relative_eq!(selection.rest_frame.e_max, 5.0);
        assert_relative_eq!(selection.total_width(), 4.5);
    }

    #[test]
    fn upper_edge_tolerance_is_one_part_per_thousand() {
        assert!(check_energy_bounds(band(0.5, 10.005), &EDGES).is_ok());
        let error = check_energy_bounds(band(0.5, 10.2), &EDGES).expect_err("too high");
        let EmissivityError::EnergyBounds { lower, upper } = error else {
            panic!("expected energy bounds error, got {error:?}");
        };
        assert_eq!((lower, upper), (0.1, 10.0));
    }

    #[test]
    fn lower_edge_tolerance_is_one_part_per_thousand() {
        assert!(check_energy_bounds(band(0.09995, 5.0), &EDGES).is_ok());
        assert!(check_energy_bounds(band(0.09, 5.0), &EDGES).is_err());
    }

    #[test]
    fn slightly_out_of_range_edges_widen_end_bins() {
        let selection = select_band(band(0.09995, 10.005), 0.0, &EDGES, &WIDTHS).expect("selection");
        assert_eq!(selection.bins(), 0..2);
        assert_relative_eq!(selection.widths[0], 0.90005, max_relative = 1.0e-12);
        assert_relative_eq!(selection.widths[1], 9.005, max_relative = 1.0e-12);
    }
}
