//! Means, deviations, and population spread over duration samples.
//!
//! Every detector threshold is defined against one of these quantities,
//! so they are centralized here and must stay bit-identical however often
//! they are re-derived.

use serde::Serialize;

/// Arithmetic mean. `None` for an empty slice; an empty denominator is a
/// skip condition for every caller, never a zero or an error.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (the biased estimator, dividing by n).
///
/// `None` for an empty slice. Matches the spread definition used by the
/// performance blow-out contract.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Running sum/count accumulator for mean durations.
///
/// Aggregate tables hold one of these per (resource, activity) key;
/// `mean` reads as `None` until at least one sample arrived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MeanAccumulator {
    pub total: f64,
    pub count: u64,
}

impl MeanAccumulator {
    pub fn add(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total / self.count as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn mean_basic() {
        assert!(approx_eq(mean(&[100.0, 400.0]).unwrap(), 250.0, 1e-12));
    }

    #[test]
    fn mean_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn population_std_dev_known_value() {
        // Samples 2, 4, 4, 4, 5, 5, 7, 9 have population std dev exactly 2.
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx_eq(
            population_std_dev(&samples).unwrap(),
            2.0,
            1e-12
        ));
    }

    #[test]
    fn population_std_dev_single_sample_is_zero() {
        assert!(approx_eq(population_std_dev(&[42.0]).unwrap(), 0.0, 1e-12));
    }

    #[test]
    fn accumulator_matches_mean() {
        let mut acc = MeanAccumulator::default();
        assert_eq!(acc.mean(), None);
        for v in [10.0, 20.0, 60.0] {
            acc.add(v);
        }
        assert!(approx_eq(acc.mean().unwrap(), 30.0, 1e-12));
        assert_eq!(acc.count, 3);
    }
}
