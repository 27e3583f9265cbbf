//! Outlier handling module.
//!
//! Fences are computed with the interquartile-range rule over the non-null
//! values of one column; quartiles use linear interpolation between order
//! statistics. Rows are kept when `lower <= value <= upper`. A missing value
//! never satisfies the comparison, so those rows are dropped as well.

use crate::config::PipelineConfig;
use crate::error::{PreprocessingError, Result};
use crate::profiler::{quantile_sorted, sorted};
use crate::utils::non_null_f64;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// IQR fences of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IqrFences {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub multiplier: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrFences {
    /// Compute fences over the non-null values of `series`.
    pub fn compute(
        series: &Series,
        lower_quantile: f64,
        upper_quantile: f64,
        multiplier: f64,
    ) -> Result<Self> {
        let column = series.name().to_string();
        let values = sorted(non_null_f64(series)?);

        let (Some(q1), Some(q3)) = (
            quantile_sorted(&values, lower_quantile),
            quantile_sorted(&values, upper_quantile),
        ) else {
            return Err(PreprocessingError::NoValidValues(column));
        };

        let iqr = q3 - q1;
        Ok(Self {
            column,
            q1,
            q3,
            iqr,
            multiplier,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Inclusive range check.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Handles outlier detection and row filtering.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Fences for the configured outlier column.
    pub fn fences(df: &DataFrame, config: &PipelineConfig) -> Result<IqrFences> {
        let series = Self::float_column(df, &config.outlier_column)?;
        IqrFences::compute(
            &series,
            config.lower_quantile,
            config.upper_quantile,
            config.iqr_multiplier,
        )
    }

    /// Return the rows of `df` whose outlier column lies within the fences.
    ///
    /// The input is not modified and row order is preserved.
    pub fn filter_outliers(
        df: &DataFrame,
        config: &PipelineConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<(DataFrame, IqrFences)> {
        let fences = Self::fences(df, config)?;
        let series = Self::float_column(df, &config.outlier_column)?;

        let mask_values: Vec<bool> = series
            .f64()?
            .into_iter()
            .map(|val| val.is_some_and(|v| fences.contains(v)))
            .collect();
        let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
        let cleaned = df.filter(&mask)?;

        let rows_removed = df.height() - cleaned.height();
        processing_steps.push(format!(
            "Removed {} rows with '{}' outside [{:.4}, {:.4}]",
            rows_removed, fences.column, fences.lower, fences.upper
        ));
        debug!("IQR fences for '{}': {:?}", fences.column, fences);
        info!(
            "Outlier filter kept {} of {} rows",
            cleaned.height(),
            df.height()
        );

        Ok((cleaned, fences))
    }

    fn float_column(df: &DataFrame, col_name: &str) -> Result<Series> {
        let column = df
            .column(col_name)
            .map_err(|_| PreprocessingError::ColumnNotFound(col_name.to_string()))?;
        Ok(column
            .as_materialized_series()
            .cast(&DataType::Float64)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fare_config() -> PipelineConfig {
        PipelineConfig::default()
    }

    fn fares(df: &DataFrame) -> Vec<Option<f64>> {
        df.column("Fare")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_fences_match_worked_example() {
        let series = Series::new("Fare".into(), &[7.25, 71.28, 8.05, 512.33, 7.92]);
        let fences = IqrFences::compute(&series, 0.25, 0.75, 1.5).unwrap();

        assert!((fences.q1 - 7.92).abs() < 1e-9);
        assert!((fences.q3 - 71.28).abs() < 1e-9);
        assert!((fences.iqr - 63.36).abs() < 1e-9);
        assert!((fences.lower - -87.12).abs() < 1e-9);
        assert!((fences.upper - 166.32).abs() < 1e-9);
    }

    #[test]
    fn test_filter_outliers_removes_extreme_fare() {
        let df = df![
            "PassengerId" => [1i64, 2, 3, 4, 5],
            "Fare" => [7.25, 71.28, 8.05, 512.33, 7.92],
        ]
        .unwrap();
        let mut steps = vec![];

        let (cleaned, _) = OutlierHandler::filter_outliers(&df, &fare_config(), &mut steps).unwrap();

        assert_eq!(
            fares(&cleaned),
            vec![Some(7.25), Some(71.28), Some(8.05), Some(7.92)]
        );
        // Input untouched
        assert_eq!(df.height(), 5);
        assert!(steps[0].contains("Removed 1 rows"));
    }

    #[test]
    fn test_filter_outliers_drops_missing_values() {
        let df = df![
            "Fare" => [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)],
        ]
        .unwrap();
        let mut steps = vec![];

        let (cleaned, _) = OutlierHandler::filter_outliers(&df, &fare_config(), &mut steps).unwrap();

        assert_eq!(
            fares(&cleaned),
            vec![Some(1.0), Some(2.0), Some(4.0), Some(5.0)]
        );
    }

    #[test]
    fn test_filter_outliers_iqr_zero_keeps_equal_values() {
        let df = df![
            "Fare" => [5.0, 5.0, 5.0, 5.0, 5.0],
        ]
        .unwrap();
        let mut steps = vec![];

        let (cleaned, fences) =
            OutlierHandler::filter_outliers(&df, &fare_config(), &mut steps).unwrap();

        assert_eq!(fences.iqr, 0.0);
        assert_eq!(cleaned.height(), 5);
    }

    #[test]
    fn test_filter_outliers_preserves_order() {
        let df = df![
            "PassengerId" => [10i64, 20, 30, 40, 50, 60],
            "Fare" => [9.0, 1.0, 8.0, 2.0, 7.0, 1000.0],
        ]
        .unwrap();
        let mut steps = vec![];

        let (cleaned, _) = OutlierHandler::filter_outliers(&df, &fare_config(), &mut steps).unwrap();

        let ids: Vec<i64> = cleaned
            .column("PassengerId")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ids, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_filter_outliers_all_missing() {
        let df = df![
            "Fare" => [None::<f64>, None],
        ]
        .unwrap();
        let mut steps = vec![];

        let err = OutlierHandler::filter_outliers(&df, &fare_config(), &mut steps).unwrap_err();
        assert!(matches!(err, PreprocessingError::NoValidValues(_)));
    }

    #[test]
    fn test_filter_outliers_missing_column() {
        let df = df!["Age" => [1.0, 2.0]].unwrap();
        let mut steps = vec![];

        let err = OutlierHandler::filter_outliers(&df, &fare_config(), &mut steps).unwrap_err();
        assert!(matches!(err, PreprocessingError::ColumnNotFound(_)));
    }

    #[test]
    fn test_fences_boundary_is_inclusive() {
        let fences = IqrFences {
            column: "Fare".to_string(),
            q1: 1.0,
            q3: 3.0,
            iqr: 2.0,
            multiplier: 1.5,
            lower: -2.0,
            upper: 6.0,
        };
        assert!(fences.contains(-2.0));
        assert!(fences.contains(6.0));
        assert!(!fences.contains(6.000001));
    }
}
