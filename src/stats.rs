use serde::{Deserialize, Serialize};

/// Running mean and variance of a stream of values (Welford's algorithm).
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub n_vals: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            n_vals: self.n_vals,
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
        }
    }
}

pub fn compute_mean(vals: &[f64]) -> f64 {
    if vals.is_empty() {
        return f64::NAN;
    }
    vals.iter().sum::<f64>() / vals.len() as f64
}

/// Sample variance (`n - 1` in the denominator).
pub fn compute_var(vals: &[f64]) -> f64 {
    let n_vals = vals.len();
    if n_vals < 2 {
        return f64::NAN;
    }
    let mean = compute_mean(vals);
    vals.iter().map(|&val| (val - mean).powi(2)).sum::<f64>() / (n_vals - 1) as f64
}

/// Median of the values, NaN if there are none or any of them is NaN.
pub fn compute_median(vals: &[f64]) -> f64 {
    if vals.is_empty() || vals.iter().any(|val| val.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = vals.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_matches_batch_statistics() {
        let vals = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut acc = Accumulator::new();
        for &val in &vals {
            acc.add(val);
        }
        let report = acc.report();
        assert_eq!(report.n_vals, 8);
        assert!((report.mean - compute_mean(&vals)).abs() < 1e-12);
        assert!((report.std_dev - compute_var(&vals).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn small_samples_are_undefined() {
        assert!(Accumulator::new().report().mean.is_nan());
        assert!(compute_mean(&[]).is_nan());
        assert!(compute_var(&[1.0]).is_nan());
        assert!(compute_median(&[]).is_nan());

        let mut acc = Accumulator::new();
        acc.add(3.0);
        assert_eq!(acc.report().mean, 3.0);
        assert!(acc.report().std_dev.is_nan());
    }

    #[test]
    fn median_of_odd_and_even_lengths() {
        assert_eq!(compute_median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(compute_median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(compute_median(&[f64::INFINITY, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn nan_propagates_through_every_statistic() {
        let vals = [f64::NAN, 5.0, 7.0];
        assert!(compute_mean(&vals).is_nan());
        assert!(compute_var(&vals).is_nan());
        assert!(compute_median(&vals).is_nan());
    }
}
