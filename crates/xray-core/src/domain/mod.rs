pub mod errors;

pub use errors::{EmissivityError, ErrorCategory, XrayResult};

use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Cloudy,
    Apec,
}

impl TableKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cloudy => "cloudy",
            Self::Apec => "apec",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "cloudy" => Some(Self::Cloudy),
            "apec" => Some(Self::Apec),
            _ => None,
        }
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for TableKind {
    type Err = EmissivityError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::from_token(token).ok_or_else(|| EmissivityError::UnknownTableKind(token.to_string()))
    }
}

/// Which tabulated contribution an interpolator is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmissionComponent {
    Primordial,
    Metals,
}

impl EmissionComponent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primordial => "primordial",
            Self::Metals => "metals",
        }
    }

    pub const fn dataset_name(self) -> &'static str {
        match self {
            Self::Primordial => "emissivity_primordial",
            Self::Metals => "emissivity_metals",
        }
    }
}

impl Display for EmissionComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Energy-flux weighting integrates the table as tabulated; photon weighting
/// divides every bin by its midpoint energy first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Weighting {
    #[default]
    Energy,
    Photons,
}

/// Observer-frame energy band in keV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBand {
    pub e_min: f64,
    pub e_max: f64,
}

impl EnergyBand {
    pub fn new(e_min: f64, e_max: f64) -> XrayResult<Self> {
        let reason = if !e_min.is_finite() || !e_max.is_finite() {
            Some("band edges must be finite")
        } else if e_min <= 0.0 {
            Some("lower edge must be positive")
        } else if e_max <= e_min {
            Some("upper edge must exceed lower edge")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(EmissivityError::InvalidBand {
                e_min,
                e_max,
                reason,
            }),
            None => Ok(Self { e_min, e_max }),
        }
    }

    pub fn rest_frame(self, redshift: f64) -> Self {
        let scale = 1.0 + redshift;
        Self {
            e_min: self.e_min * scale,
            e_max: self.e_max * scale,
        }
    }

    pub fn label(self) -> String {
        format!("{}_{}_keV", self.e_min, self.e_max)
    }
}
