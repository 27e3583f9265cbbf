//! Descriptive statistics over numeric columns.
//!
//! All functions operate on the non-null population only. Quantiles use
//! linear interpolation between closest ranks (`pos = p * (n - 1)`).

use crate::error::{PreprocessingError, Result};
use crate::utils::non_null_f64;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), or `None` when n < 2.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let n = values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Sort values ascending using IEEE total ordering.
pub fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}

/// Quantile of already sorted values using linear interpolation.
///
/// Returns `None` for an empty slice or `p` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }

    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Summary statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub name: String,
    /// Non-null value count.
    pub count: usize,
    pub null_count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN when fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl ColumnStatistics {
    /// Describe a numeric column.
    ///
    /// Fails with [`PreprocessingError::NoValidValues`] if every value is null.
    pub fn from_series(series: &Series) -> Result<Self> {
        let name = series.name().to_string();
        let values = sorted(non_null_f64(series)?);
        if values.is_empty() {
            return Err(PreprocessingError::NoValidValues(name));
        }

        let quantile = |p: f64| quantile_sorted(&values, p).unwrap_or(f64::NAN);

        Ok(Self {
            count: values.len(),
            null_count: series.null_count(),
            mean: mean(&values).unwrap_or(f64::NAN),
            std: sample_std(&values).unwrap_or(f64::NAN),
            min: values[0],
            q1: quantile(0.25),
            median: quantile(0.5),
            q3: quantile(0.75),
            max: values[values.len() - 1],
            name,
        })
    }

    /// Interquartile range `q3 - q1`.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== mean / sample_std tests ====================

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_std_basic() {
        // Mean = 3, squared deviations sum to 10, 10 / 4 = 2.5
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_single_value() {
        assert_eq!(sample_std(&[5.0]), None);
    }

    #[test]
    fn test_sample_std_identical_values() {
        assert_eq!(sample_std(&[5.0, 5.0, 5.0]), Some(0.0));
    }

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_linear_interpolation() {
        let values = sorted(vec![7.25, 71.28, 8.05, 512.33, 7.92]);
        assert_eq!(quantile_sorted(&values, 0.25), Some(7.92));
        assert_eq!(quantile_sorted(&values, 0.75), Some(71.28));
        assert_eq!(quantile_sorted(&values, 0.5), Some(8.05));
    }

    #[test]
    fn test_quantile_between_ranks() {
        // pos = 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1)
        let values = [1.0, 2.0, 3.0, 4.0];
        let q1 = quantile_sorted(&values, 0.25).unwrap();
        assert!((q1 - 1.75).abs() < 1e-12);
        let q3 = quantile_sorted(&values, 0.75).unwrap();
        assert!((q3 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_edges() {
        let values = [2.0, 4.0, 9.0];
        assert_eq!(quantile_sorted(&values, 0.0), Some(2.0));
        assert_eq!(quantile_sorted(&values, 1.0), Some(9.0));
        assert_eq!(quantile_sorted(&[3.0], 0.75), Some(3.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&values, 1.5), None);
    }

    // ==================== ColumnStatistics tests ====================

    #[test]
    fn test_column_statistics_skips_nulls() {
        let series = Series::new("Age".into(), &[Some(22.0), None, Some(38.0), Some(26.0)]);
        let stats = ColumnStatistics::from_series(&series).unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.null_count, 1);
        assert!((stats.mean - 86.0 / 3.0).abs() < 1e-12);
        assert_eq!(stats.min, 22.0);
        assert_eq!(stats.median, 26.0);
        assert_eq!(stats.max, 38.0);
    }

    #[test]
    fn test_column_statistics_all_null() {
        let series = Series::new("Age".into(), &[None::<f64>, None]);
        let err = ColumnStatistics::from_series(&series).unwrap_err();
        assert!(matches!(err, PreprocessingError::NoValidValues(col) if col == "Age"));
    }

    #[test]
    fn test_column_statistics_single_value_std_is_nan() {
        let series = Series::new("Fare".into(), &[10.0f64]);
        let stats = ColumnStatistics::from_series(&series).unwrap();
        assert!(stats.std.is_nan());
        assert_eq!(stats.iqr(), 0.0);
    }
}
