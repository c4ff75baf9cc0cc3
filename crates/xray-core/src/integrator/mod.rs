//! Band integration of tabulated emissivity and interpolator construction.
//!
//! An [`XrayEmissivityIntegrator`] owns one loaded table. For each requested
//! band it clips the bracketing energy bins to the band edges, sums the
//! width-weighted bin values into a surface over the remaining grid axes, and
//! wraps log10 of that surface in a [`FieldInterpolator`].

mod band;
mod interpolator;

pub use band::{BandSelection, check_energy_bounds, select_band};
pub use interpolator::FieldInterpolator;

use crate::common::TableConfig;
use crate::domain::{
    EmissionComponent, EmissivityError, EnergyBand, TableKind, Weighting, XrayResult,
};
use crate::numerics::{BilinearInterpolator, UnilinearInterpolator, stable_sum_iter};
use crate::table::{EmissivityTable, load_configured_table};
use ndarray::{ArrayD, Axis, Ix1, Ix2, IxDyn};

/// Band-integrated emissivity over the table's temperature (and density)
/// grid, before taking the logarithm.
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedIntegral {
    pub component: EmissionComponent,
    pub weighting: Weighting,
    pub selection: BandSelection,
    pub surface: ArrayD<f64>,
}

#[derive(Debug, Clone)]
pub struct XrayEmissivityIntegrator {
    kind: TableKind,
    table: EmissivityTable,
    redshift: f64,
}

impl XrayEmissivityIntegrator {
    pub fn new(
        kind: TableKind,
        config: &TableConfig,
        redshift: f64,
        use_metals: bool,
    ) -> XrayResult<Self> {
        let table = load_configured_table(config, kind, use_metals)?;
        Ok(Self::from_table(kind, table, redshift))
    }

    pub fn from_table(kind: TableKind, table: EmissivityTable, redshift: f64) -> Self {
        Self {
            kind,
            table,
            redshift,
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn table(&self) -> &EmissivityTable {
        &self.table
    }

    pub fn redshift(&self) -> f64 {
        self.redshift
    }

    pub fn clipped_integral(
        &self,
        component: EmissionComponent,
        band: EnergyBand,
        weighting: Weighting,
    ) -> XrayResult<ClippedIntegral> {
        let data = self.table.component(component)?;
        let selection = select_band(
            band,
            self.redshift,
            self.table.energy_bins(),
            self.table.bin_widths(),
        )?;
        let midpoints = &self.table.bin_midpoints_erg()[selection.bins()];

        let energy_axis = Axis(data.ndim() - 1);
        let sums: Vec<f64> = data
            .lanes(energy_axis)
            .into_iter()
            .map(|lane| {
                stable_sum_iter(selection.bins().zip(&selection.widths).zip(midpoints).map(
                    |((bin, &width), &midpoint)| match weighting {
                        Weighting::Energy => lane[bin] * width,
                        Weighting::Photons => lane[bin] / midpoint * width,
                    },
                ))
            })
            .collect();

        let surface_shape = &data.shape()[..data.ndim() - 1];
        let surface = ArrayD::from_shape_vec(IxDyn(surface_shape), sums)
            .map_err(|error| EmissivityError::InvalidTable(error.to_string()))?;

        Ok(ClippedIntegral {
            component,
            weighting,
            selection,
            surface,
        })
    }

    /// Builds the log-space interpolator for `component` over an
    /// observer-frame band in keV.
    pub fn interpolator(
        &self,
        component: EmissionComponent,
        e_min: f64,
        e_max: f64,
        weighting: Weighting,
    ) -> XrayResult<FieldInterpolator> {
        let band = EnergyBand::new(e_min, e_max)?;
        let integral = self.clipped_integral(component, band, weighting)?;
        let log_surface = integral.surface.mapv(f64::log10);
        let shape_error = |error: ndarray::ShapeError| EmissivityError::InvalidTable(error.to_string());

        let interpolator = match self.table.log_nh() {
            None => {
                let values = log_surface.into_dimensionality::<Ix1>().map_err(shape_error)?;
                UnilinearInterpolator::new(self.table.log_t().to_vec(), values.to_vec())
                    .map(FieldInterpolator::Unilinear)
            }
            Some(log_nh) => {
                let values = log_surface.into_dimensionality::<Ix2>().map_err(shape_error)?;
                BilinearInterpolator::new(log_nh.to_vec(), self.table.log_t().to_vec(), values)
                    .map(FieldInterpolator::Bilinear)
            }
        };

        interpolator.ok_or_else(|| {
            EmissivityError::InvalidTable(format!(
                "{} surface does not match the table grid",
                component
            ))
        })
    }
}
