use crate::numerics::{BilinearInterpolator, UnilinearInterpolator};

/// Log10 emissivity surface over `log_T`, or over `(log_nH, log_T)`.
///
/// Evaluation returns log10 of the band-integrated emissivity; callers
/// exponentiate. Out-of-grid queries are clamped to the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInterpolator {
    Unilinear(UnilinearInterpolator),
    Bilinear(BilinearInterpolator),
}

impl FieldInterpolator {
    pub const fn dimensions(&self) -> usize {
        match self {
            Self::Unilinear(_) => 1,
            Self::Bilinear(_) => 2,
        }
    }

    /// `log_nh` is ignored by temperature-only surfaces.
    pub fn evaluate(&self, log_nh: f64, log_t: f64) -> f64 {
        match self {
            Self::Unilinear(interp) => interp.evaluate(log_t),
            Self::Bilinear(interp) => interp.evaluate(log_nh, log_t),
        }
    }

    pub fn evaluate_cells(&self, log_nh: &[f64], log_t: &[f64]) -> Vec<f64> {
        log_nh
            .iter()
            .zip(log_t)
            .map(|(&nh, &t)| self.evaluate(nh, t))
            .collect()
    }

    pub fn log_t_grid(&self) -> &[f64] {
        match self {
            Self::Unilinear(interp) => interp.grid(),
            Self::Bilinear(interp) => interp.y_grid(),
        }
    }
}
