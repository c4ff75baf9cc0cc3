use crate::common::constants::{ARCSEC2_PER_STERADIAN, FOUR_PI};

/// Distance measures supplied by the host's cosmology.
pub trait CosmologicalDistances {
    /// Luminosity distance from the observer to `redshift`, in cm.
    fn luminosity_distance_cm(&self, redshift: f64) -> f64;

    /// Proper length subtended by one radian at `redshift`, in cm.
    fn angular_scale_cm_per_radian(&self, redshift: f64) -> f64;
}

#[derive(Clone, Copy)]
pub enum Observer<'a> {
    Cosmological {
        redshift: f64,
        distances: &'a dyn CosmologicalDistances,
    },
    /// Nearby source at a fixed distance; redshift is taken as zero.
    Local { distance_cm: f64 },
}

impl Observer<'_> {
    pub fn redshift(&self) -> f64 {
        match self {
            Self::Cosmological { redshift, .. } => *redshift,
            Self::Local { .. } => 0.0,
        }
    }

    /// `1 / (4π D_L² θ²)` with `θ` the angle per unit length, converted from
    /// per-steradian to per-square-arcsecond.
    pub fn dilution_per_arcsec2(&self) -> f64 {
        let (luminosity_distance, radians_per_cm) = match self {
            Self::Cosmological {
                redshift,
                distances,
            } => (
                distances.luminosity_distance_cm(*redshift),
                1.0 / distances.angular_scale_cm_per_radian(*redshift),
            ),
            Self::Local { distance_cm } => (*distance_cm, 1.0 / *distance_cm),
        };

        let per_steradian = 1.0
            / (FOUR_PI
                * luminosity_distance
                * luminosity_distance
                * radians_per_cm
                * radians_per_cm);
        per_steradian / ARCSEC2_PER_STERADIAN
    }
}
