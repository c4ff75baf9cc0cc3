pub mod interpolation;

pub use interpolation::{BilinearInterpolator, UnilinearInterpolator};

fn kahan_add(sum: &mut f64, correction: &mut f64, value: f64) {
    let corrected = value - *correction;
    let next = *sum + corrected;
    *correction = (next - *sum) - corrected;
    *sum = next;
}

pub fn stable_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;

    for &value in values {
        kahan_add(&mut sum, &mut correction, value);
    }

    sum
}

pub fn stable_sum_iter(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;

    for value in values {
        kahan_add(&mut sum, &mut correction, value);
    }

    sum
}

pub fn is_strictly_increasing(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
        && values.windows(2).all(|window| window[0] < window[1])
}

/// Index `i` such that `edges[i - 1] <= value < edges[i]`, with `0` below the
/// first edge and `edges.len()` at or beyond the last one.
pub fn digitize(value: f64, edges: &[f64]) -> usize {
    edges.partition_point(|edge| *edge <= value)
}

pub fn differences(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|window| window[1] - window[0]).collect()
}

pub fn midpoints(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|window| 0.5 * (window[0] + window[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        differences, digitize, is_strictly_increasing, midpoints, stable_sum, stable_sum_iter,
    };

    #[test]
    fn stable_sum_reduces_order_loss_for_large_and_small_values() {
        let input = [1.0e16, 1.0, -1.0e16];
        assert_eq!(stable_sum(&input), 0.0);
        assert_eq!(stable_sum_iter([0.1; 10]), stable_sum(&[0.1; 10]));
    }

    #[test]
    fn digitize_matches_right_open_bin_convention() {
        let edges = [0.1, 1.0, 10.0];
        assert_eq!(digitize(0.05, &edges), 0);
        assert_eq!(digitize(0.1, &edges), 1);
        assert_eq!(digitize(0.5, &edges), 1);
        assert_eq!(digitize(1.0, &edges), 2);
        assert_eq!(digitize(10.0, &edges), 3);
        assert_eq!(digitize(20.0, &edges), 3);
    }

    #[test]
    fn grid_helpers_produce_widths_and_midpoints() {
        assert_eq!(differences(&[0.0, 1.0, 3.0]), vec![1.0, 2.0]);
        assert_eq!(midpoints(&[0.0, 1.0, 3.0]), vec![0.5, 2.0]);
        assert!(is_strictly_increasing(&[6.0, 7.0, 8.0]));
        assert!(!is_strictly_increasing(&[6.0, 6.0, 8.0]));
        assert!(!is_strictly_increasing(&[6.0, f64::NAN]));
    }
}
