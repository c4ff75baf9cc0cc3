//! Per-cell X-ray fields assembled from band interpolators.
//!
//! Emissivities are `n_H² · Λ(n_H, T)` with `Λ` the band-integrated table
//! value in `erg cm³ s⁻¹` (or photons), giving `erg s⁻¹ cm⁻³`. Cells whose
//! evaluation is NaN contribute zero.

mod cells;
mod intensity;

pub use cells::{
    CellCatalog, CellData, DENSITY_FIELD, HOST_METALLICITY_FIELD, LOG_NH_FIELD, MASS_FIELD,
};
pub use intensity::{CosmologicalDistances, Observer};

pub(crate) use cells::check_length;

use crate::common::TableConfig;
use crate::domain::{
    EmissionComponent, EmissivityError, EnergyBand, TableKind, Weighting, XrayResult,
};
use crate::integrator::{FieldInterpolator, XrayEmissivityIntegrator};
use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Metallicity {
    #[default]
    None,
    /// Spatially constant metallicity in solar units.
    Constant(f64),
    /// Name of a per-cell metallicity field in solar units.
    Field(String),
}

impl Metallicity {
    pub fn host_field() -> Self {
        Self::Field(HOST_METALLICITY_FIELD.to_string())
    }

    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    fn resolve<'a>(
        &self,
        cells: &'a dyn CellData,
        count: usize,
    ) -> XrayResult<Option<Cow<'a, [f64]>>> {
        match self {
            Self::None => Ok(None),
            Self::Constant(value) => Ok(Some(Cow::Owned(vec![*value; count]))),
            Self::Field(name) => {
                let values = cells.require(name)?;
                check_length(name, values, count)?;
                Ok(Some(Cow::Borrowed(values)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmissivityRequest {
    pub temperature_field: String,
    pub band: EnergyBand,
    pub redshift: f64,
    pub table_kind: TableKind,
    pub metallicity: Metallicity,
    /// Fixed source distance in cm for nearby objects.
    pub distance_cm: Option<f64>,
}

impl EmissivityRequest {
    pub fn new(temperature_field: impl Into<String>, band: EnergyBand) -> Self {
        Self {
            temperature_field: temperature_field.into(),
            band,
            redshift: 0.0,
            table_kind: TableKind::Cloudy,
            metallicity: Metallicity::None,
            distance_cm: None,
        }
    }

    pub fn with_redshift(mut self, redshift: f64) -> Self {
        self.redshift = redshift;
        self
    }

    pub fn with_metallicity(mut self, metallicity: Metallicity) -> Self {
        self.metallicity = metallicity;
        self
    }

    pub fn with_distance_cm(mut self, distance_cm: f64) -> Self {
        self.distance_cm = Some(distance_cm);
        self
    }

    pub fn with_table_kind(mut self, table_kind: TableKind) -> Self {
        self.table_kind = table_kind;
        self
    }
}

/// Primordial and optional metal interpolators for one band and weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct BandEmissivity {
    pub weighting: Weighting,
    primordial: FieldInterpolator,
    metals: Option<FieldInterpolator>,
}

impl BandEmissivity {
    pub fn build(
        integrator: &XrayEmissivityIntegrator,
        band: EnergyBand,
        weighting: Weighting,
        use_metals: bool,
    ) -> XrayResult<Self> {
        let primordial = integrator.interpolator(
            EmissionComponent::Primordial,
            band.e_min,
            band.e_max,
            weighting,
        )?;
        let metals = if use_metals {
            Some(integrator.interpolator(
                EmissionComponent::Metals,
                band.e_min,
                band.e_max,
                weighting,
            )?)
        } else {
            None
        };
        Ok(Self {
            weighting,
            primordial,
            metals,
        })
    }

    /// Returns the per-cell emissivity and the number of NaN cells zeroed.
    pub fn evaluate(
        &self,
        log_nh: &[f64],
        log_t: &[f64],
        metallicity: Option<&[f64]>,
    ) -> (Vec<f64>, usize) {
        let mut zeroed = 0;
        let values = log_nh
            .iter()
            .zip(log_t)
            .enumerate()
            .map(|(index, (&nh, &t))| {
                let mut emissivity = 10f64.powf(self.primordial.evaluate(nh, t));
                if let (Some(metals), Some(metallicity)) = (&self.metals, metallicity) {
                    emissivity += metallicity[index] * 10f64.powf(metals.evaluate(nh, t));
                }
                let n_h = 10f64.powf(nh);
                let value = n_h * n_h * emissivity;
                if value.is_nan() {
                    zeroed += 1;
                    return 0.0;
                }
                value
            })
            .collect();
        (values, zeroed)
    }
}

/// Band fields for one set of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XrayFields {
    pub label: String,
    /// erg s⁻¹ cm⁻³
    pub emissivity: Vec<f64>,
    /// photons s⁻¹ cm⁻³
    pub photon_emissivity: Vec<f64>,
    /// erg s⁻¹; present when cells carry mass and density.
    pub luminosity: Option<Vec<f64>>,
    /// erg s⁻¹ cm⁻³ arcsec⁻²
    pub intensity: Option<Vec<f64>>,
    /// photons s⁻¹ cm⁻³ arcsec⁻²
    pub photon_intensity: Option<Vec<f64>>,
    pub zeroed_cells: usize,
}

struct CellInputs<'a> {
    log_nh: &'a [f64],
    log_t: Vec<f64>,
    metallicity: Option<Cow<'a, [f64]>>,
}

fn cell_inputs<'a>(
    cells: &'a dyn CellData,
    request: &EmissivityRequest,
) -> XrayResult<CellInputs<'a>> {
    let log_nh = cells.require(LOG_NH_FIELD)?;
    let temperature = cells.require(&request.temperature_field)?;
    check_length(&request.temperature_field, temperature, log_nh.len())?;
    let metallicity = request.metallicity.resolve(cells, log_nh.len())?;

    Ok(CellInputs {
        log_nh,
        log_t: temperature.iter().map(|value| value.log10()).collect(),
        metallicity,
    })
}

fn ensure_supported(kind: TableKind) -> XrayResult<()> {
    match kind {
        TableKind::Cloudy => Ok(()),
        TableKind::Apec => Err(EmissivityError::UnsupportedTable(kind)),
    }
}

/// Energy emissivity of every cell for an already-loaded integrator.
pub fn compute_emissivity(
    cells: &dyn CellData,
    request: &EmissivityRequest,
    integrator: &XrayEmissivityIntegrator,
) -> XrayResult<Vec<f64>> {
    let inputs = cell_inputs(cells, request)?;
    let model = BandEmissivity::build(
        integrator,
        request.band,
        Weighting::Energy,
        request.metallicity.is_enabled(),
    )?;
    let (values, zeroed) = model.evaluate(
        inputs.log_nh,
        &inputs.log_t,
        inputs.metallicity.as_deref(),
    );
    if zeroed > 0 {
        tracing::warn!(zeroed, "cells outside the valid range set to zero emissivity");
    }
    Ok(values)
}

/// Loads the configured table and returns the energy emissivity field.
pub fn calculate_xray_emissivity(
    cells: &dyn CellData,
    request: &EmissivityRequest,
    config: &TableConfig,
) -> XrayResult<Vec<f64>> {
    ensure_supported(request.table_kind)?;
    let integrator = XrayEmissivityIntegrator::new(
        request.table_kind,
        config,
        request.redshift,
        request.metallicity.is_enabled(),
    )?;
    compute_emissivity(cells, request, &integrator)
}

/// Emissivity, photon emissivity, and the derived luminosity and intensity
/// fields. Intensities need either a fixed distance or, for a positive
/// redshift, the host's cosmological distances.
pub fn compute_xray_fields(
    cells: &dyn CellData,
    request: &EmissivityRequest,
    integrator: &XrayEmissivityIntegrator,
    cosmology: Option<&dyn CosmologicalDistances>,
) -> XrayResult<XrayFields> {
    let inputs = cell_inputs(cells, request)?;
    let use_metals = request.metallicity.is_enabled();
    let metallicity = inputs.metallicity.as_deref();

    let energy = BandEmissivity::build(integrator, request.band, Weighting::Energy, use_metals)?;
    let photons = BandEmissivity::build(integrator, request.band, Weighting::Photons, use_metals)?;
    let (emissivity, zeroed_cells) = energy.evaluate(inputs.log_nh, &inputs.log_t, metallicity);
    let (photon_emissivity, _) = photons.evaluate(inputs.log_nh, &inputs.log_t, metallicity);
    if zeroed_cells > 0 {
        tracing::warn!(
            zeroed = zeroed_cells,
            "cells outside the valid range set to zero emissivity"
        );
    }

    let luminosity = match (cells.field(MASS_FIELD), cells.field(DENSITY_FIELD)) {
        (Some(mass), Some(density)) => {
            check_length(MASS_FIELD, mass, emissivity.len())?;
            check_length(DENSITY_FIELD, density, emissivity.len())?;
            Some(
                emissivity
                    .iter()
                    .zip(mass.iter().zip(density))
                    .map(|(&value, (&mass, &density))| value * mass / density)
                    .collect(),
            )
        }
        _ => None,
    };

    let observer = match (request.distance_cm, cosmology) {
        (Some(distance_cm), _) => Some(Observer::Local { distance_cm }),
        (None, Some(distances)) if request.redshift > 0.0 => Some(Observer::Cosmological {
            redshift: request.redshift,
            distances,
        }),
        (None, None) if request.redshift > 0.0 => {
            tracing::warn!(
                redshift = request.redshift,
                "no cosmology supplied; skipping intensity fields"
            );
            None
        }
        _ => None,
    };

    let (intensity, photon_intensity) = match observer {
        Some(observer) => {
            let dilution = observer.dilution_per_arcsec2();
            let photon_scale = (1.0 + observer.redshift()) * dilution;
            (
                Some(emissivity.iter().map(|value| value * dilution).collect()),
                Some(
                    photon_emissivity
                        .iter()
                        .map(|value| value * photon_scale)
                        .collect(),
                ),
            )
        }
        None => (None, None),
    };

    Ok(XrayFields {
        label: request.band.label(),
        emissivity,
        photon_emissivity,
        luminosity,
        intensity,
        photon_intensity,
        zeroed_cells,
    })
}

/// Table-loading counterpart of [`compute_xray_fields`].
pub fn calculate_xray_fields(
    cells: &dyn CellData,
    request: &EmissivityRequest,
    config: &TableConfig,
    cosmology: Option<&dyn CosmologicalDistances>,
) -> XrayResult<XrayFields> {
    ensure_supported(request.table_kind)?;
    let integrator = XrayEmissivityIntegrator::new(
        request.table_kind,
        config,
        request.redshift,
        request.metallicity.is_enabled(),
    )?;
    compute_xray_fields(cells, request, &integrator, cosmology)
}
