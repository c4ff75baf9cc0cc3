//! Clamped linear interpolation on rectilinear grids.
//!
//! Queries outside the grid are saturated to the boundary, never
//! extrapolated. A NaN coordinate yields NaN.

use super::is_strictly_increasing;
use ndarray::Array2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct GridCell {
    lower: usize,
    upper: usize,
    fraction: f64,
}

fn locate_cell(value: f64, grid: &[f64]) -> GridCell {
    let last = grid.len() - 1;
    if last == 0 || value <= grid[0] {
        return GridCell {
            lower: 0,
            upper: last.min(1),
            fraction: 0.0,
        };
    }
    if value >= grid[last] {
        return GridCell {
            lower: last - 1,
            upper: last,
            fraction: 1.0,
        };
    }

    let upper = grid.partition_point(|node| *node <= value).min(last);
    let lower = upper - 1;
    GridCell {
        lower,
        upper,
        fraction: (value - grid[lower]) / (grid[upper] - grid[lower]),
    }
}

// Endpoints are returned as-is so that -inf nodes (log10 of zero) stay -inf.
fn blend(lower: f64, upper: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        lower
    } else if fraction >= 1.0 {
        upper
    } else {
        (1.0 - fraction) * lower + fraction * upper
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnilinearInterpolator {
    grid: Vec<f64>,
    values: Vec<f64>,
}

impl UnilinearInterpolator {
    pub fn new(grid: Vec<f64>, values: Vec<f64>) -> Option<Self> {
        if grid.is_empty() || grid.len() != values.len() || !is_strictly_increasing(&grid) {
            return None;
        }
        Some(Self { grid, values })
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let cell = locate_cell(x, &self.grid);
        blend(self.values[cell.lower], self.values[cell.upper], cell.fraction)
    }
}

/// Values are indexed `[x, y]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearInterpolator {
    x_grid: Vec<f64>,
    y_grid: Vec<f64>,
    values: Array2<f64>,
}

impl BilinearInterpolator {
    pub fn new(x_grid: Vec<f64>, y_grid: Vec<f64>, values: Array2<f64>) -> Option<Self> {
        if x_grid.is_empty()
            || y_grid.is_empty()
            || values.dim() != (x_grid.len(), y_grid.len())
            || !is_strictly_increasing(&x_grid)
            || !is_strictly_increasing(&y_grid)
        {
            return None;
        }
        Some(Self {
            x_grid,
            y_grid,
            values,
        })
    }

    pub fn x_grid(&self) -> &[f64] {
        &self.x_grid
    }

    pub fn y_grid(&self) -> &[f64] {
        &self.y_grid
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        if x.is_nan() || y.is_nan() {
            return f64::NAN;
        }
        let xc = locate_cell(x, &self.x_grid);
        let yc = locate_cell(y, &self.y_grid);

        let lower = blend(
            self.values[[xc.lower, yc.lower]],
            self.values[[xc.lower, yc.upper]],
            yc.fraction,
        );
        let upper = blend(
            self.values[[xc.upper, yc.lower]],
            self.values[[xc.upper, yc.upper]],
            yc.fraction,
        );
        blend(lower, upper, xc.fraction)
    }
}
