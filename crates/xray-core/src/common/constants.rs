//! CGS conversion constants shared by the table loader and field assembly.
//!
//! Quantities are carried as plain `f64` values; the unit of every field is
//! fixed by the function that produces it.

pub const PI: f64 = std::f64::consts::PI;
pub const FOUR_PI: f64 = 4.0 * PI;
pub const KEV_TO_ERG: f64 = 1.602_176_634e-9;
pub const MPC_TO_CM: f64 = 3.085_677_581_491_367e24;
pub const ARCSEC_PER_RADIAN: f64 = 180.0 * 3600.0 / PI;
pub const ARCSEC2_PER_STERADIAN: f64 = ARCSEC_PER_RADIAN * ARCSEC_PER_RADIAN;

/// Relative slack allowed between a requested band edge and the table edge.
pub const ENERGY_BOUNDS_RELATIVE_TOLERANCE: f64 = 1.0e-3;

#[cfg(test)]
mod tests {
    use super::{ARCSEC2_PER_STERADIAN, ARCSEC_PER_RADIAN, FOUR_PI, KEV_TO_ERG, MPC_TO_CM, PI};

    #[test]
    fn constants_match_expected_relationships() {
        assert!((FOUR_PI - 4.0 * PI).abs() <= 1.0e-15);
        assert!((ARCSEC_PER_RADIAN - 206_264.806_247_096_36).abs() <= 1.0e-6);
        assert!((ARCSEC2_PER_STERADIAN / ARCSEC_PER_RADIAN - ARCSEC_PER_RADIAN).abs() <= 1.0e-6);
    }

    #[test]
    fn physics_constants_remain_finite_and_positive() {
        for value in [KEV_TO_ERG, MPC_TO_CM, ARCSEC_PER_RADIAN] {
            assert!(value.is_finite());
            assert!(value > 0.0);
        }
    }
}
