use crate::common::constants::KEV_TO_ERG;
use crate::domain::{EmissionComponent, EmissivityError, XrayResult};
use crate::numerics::{differences, is_strictly_increasing, midpoints};
use ndarray::ArrayD;

/// Tabulated emissivity, energy-binned over a temperature grid and an
/// optional density grid.
///
/// Data arrays are shaped `[T, N]` for temperature-only tables and
/// `[nH, T, N]` when a density grid is present, with `N + 1` energy edges.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissivityTable {
    log_t: Vec<f64>,
    log_nh: Option<Vec<f64>>,
    energy_bins: Vec<f64>,
    primordial: ArrayD<f64>,
    metals: Option<ArrayD<f64>>,
    bin_widths: Vec<f64>,
    bin_midpoints_erg: Vec<f64>,
    version: Option<u32>,
}

impl EmissivityTable {
    pub fn new(
        log_t: Vec<f64>,
        log_nh: Option<Vec<f64>>,
        energy_bins: Vec<f64>,
        primordial: ArrayD<f64>,
        metals: Option<ArrayD<f64>>,
    ) -> XrayResult<Self> {
        if log_t.is_empty() || !is_strictly_increasing(&log_t) {
            return Err(invalid("log_T must be a non-empty strictly increasing grid"));
        }
        if let Some(log_nh) = &log_nh {
            if log_nh.is_empty() || !is_strictly_increasing(log_nh) {
                return Err(invalid("log_nH must be a non-empty strictly increasing grid"));
            }
        }
        if energy_bins.len() < 2 || !is_strictly_increasing(&energy_bins) {
            return Err(invalid(
                "E must hold at least two strictly increasing bin edges",
            ));
        }

        let bin_count = energy_bins.len() - 1;
        let expected_shape = match &log_nh {
            Some(log_nh) => vec![log_nh.len(), log_t.len(), bin_count],
            None => vec![log_t.len(), bin_count],
        };
        check_shape(EmissionComponent::Primordial, &primordial, &expected_shape)?;
        if let Some(metals) = &metals {
            check_shape(EmissionComponent::Metals, metals, &expected_shape)?;
        }

        let bin_widths = differences(&energy_bins);
        let bin_midpoints_erg = midpoints(&energy_bins)
            .into_iter()
            .map(|energy| energy * KEV_TO_ERG)
            .collect();

        Ok(Self {
            log_t,
            log_nh,
            energy_bins,
            primordial,
            metals,
            bin_widths,
            bin_midpoints_erg,
            version: None,
        })
    }

    pub fn with_version(mut self, version: Option<u32>) -> Self {
        self.version = version;
        self
    }

    pub fn log_t(&self) -> &[f64] {
        &self.log_t
    }

    pub fn log_nh(&self) -> Option<&[f64]> {
        self.log_nh.as_deref()
    }

    pub fn energy_bins(&self) -> &[f64] {
        &self.energy_bins
    }

    pub fn bin_widths(&self) -> &[f64] {
        &self.bin_widths
    }

    pub fn bin_midpoints_erg(&self) -> &[f64] {
        &self.bin_midpoints_erg
    }

    pub fn bin_count(&self) -> usize {
        self.bin_widths.len()
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn has_density_axis(&self) -> bool {
        self.log_nh.is_some()
    }

    pub fn has_metals(&self) -> bool {
        self.metals.is_some()
    }

    /// Lowest and highest tabulated energy edge in keV.
    pub fn energy_bounds(&self) -> (f64, f64) {
        (
            self.energy_bins[0],
            self.energy_bins[self.energy_bins.len() - 1],
        )
    }

    pub fn component(&self, component: EmissionComponent) -> XrayResult<&ArrayD<f64>> {
        match component {
            EmissionComponent::Primordial => Ok(&self.primordial),
            EmissionComponent::Metals => self
                .metals
                .as_ref()
                .ok_or(EmissivityError::ComponentNotLoaded { component }),
        }
    }
}

fn check_shape(
    component: EmissionComponent,
    data: &ArrayD<f64>,
    expected: &[usize],
) -> XrayResult<()> {
    if data.shape() == expected {
        return Ok(());
    }
    Err(EmissivityError::InvalidTable(format!(
        "{} has shape {:?}, expected {:?}",
        component.dataset_name(),
        data.shape(),
        expected
    )))
}

fn invalid(message: &str) -> EmissivityError {
    EmissivityError::InvalidTable(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::EmissivityTable;
    use crate::common::constants::KEV_TO_ERG;
    use crate::domain::{EmissionComponent, EmissivityError};
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};

    fn constant(shape: &[usize], value: f64) -> ArrayD<f64> {
        ArrayD::from_elem(IxDyn(shape), value)
    }

    #[test]
    fn derived_bin_widths_and_midpoints_follow_edges() {
        let table = EmissivityTable::new(
            vec![6.0, 7.0, 8.0],
            None,
            vec![0.1, 1.0, 10.0],
            constant(&[3, 2], 1.0e-23),
            None,
        )
        .expect("table should validate");

        assert_relative_eq!(table.bin_widths()[0], 0.9);
        assert_relative_eq!(table.bin_widths()[1], 9.0);
        assert_relative_eq!(table.bin_midpoints_erg()[0], 0.55 * KEV_TO_ERG);
        assert_relative_eq!(table.bin_midpoints_erg()[1], 5.5 * KEV_TO_ERG);
        assert_eq!(table.energy_bounds(), (0.1, 10.0));
        assert!(!table.has_density_axis());
    }

    #[test]
    fn shape_mismatch_with_energy_edges_is_rejected() {
        let error = EmissivityTable::new(
            vec![6.0, 7.0, 8.0],
            None,
            vec![0.1, 1.0, 10.0],
            constant(&[3, 3], 1.0),
            None,
        )
        .expect_err("bin count mismatch");
        assert!(matches!(error, EmissivityError::InvalidTable(_)));
    }

    #[test]
    fn density_tables_require_three_dimensional_data() {
        let ok = EmissivityTable::new(
            vec![6.0, 7.0],
            Some(vec![-3.0, -2.0, -1.0]),
            vec![0.1, 1.0],
            constant(&[3, 2, 1], 1.0),
            Some(constant(&[3, 2, 1], 2.0)),
        );
        assert!(ok.is_ok());

        let bad = EmissivityTable::new(
            vec![6.0, 7.0],
            Some(vec![-3.0, -2.0, -1.0]),
            vec![0.1, 1.0],
            constant(&[2, 1], 1.0),
            None,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn non_monotonic_grids_are_rejected() {
        let error = EmissivityTable::new(
            vec![7.0, 6.0],
            None,
            vec![0.1, 1.0],
            constant(&[2, 1], 1.0),
            None,
        )
        .expect_err("decreasing grid");
        assert!(error.to_string().contains("log_T"));
    }

    #[test]
    fn metals_component_requires_loaded_metals() {
        let table = EmissivityTable::new(
            vec![6.0, 7.0],
            None,
            vec![0.1, 1.0],
            constant(&[2, 1], 1.0),
            None,
        )
        .expect("table");
        let error = table
            .component(EmissionComponent::Metals)
            .expect_err("metals not loaded");
        assert!(matches!(
            error,
            EmissivityError::ComponentNotLoaded {
                component: EmissionComponent::Metals
            }
        ));
    }
}
