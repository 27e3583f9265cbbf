//! Statistical imputation methods.
//!
//! Provides mean, mode and constant imputation for a single column.

use crate::error::{PreprocessingError, Result};
use crate::utils::{fill_numeric_nulls, fill_string_nulls, string_mode};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Replace nulls in a numeric column with the mean of its non-null values.
    ///
    /// The mean is computed before any replacement. Returns the fill value.
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<f64> {
        let series = Self::series(df, col_name)?;
        let missing = series.null_count();
        let mean_val = series
            .mean()
            .ok_or_else(|| PreprocessingError::NoValidValues(col_name.to_string()))?;

        let filled = fill_numeric_nulls(&series, mean_val)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with mean: {:.2} ({} values)",
            col_name, mean_val, missing
        ));
        debug!("Mean imputed '{}' with {}", col_name, mean_val);
        Ok(mean_val)
    }

    /// Replace nulls in a text column with its most frequent value.
    ///
    /// Ties are resolved to the lexicographically smallest value. Returns the
    /// fill value.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<String> {
        let series = Self::series(df, col_name)?;
        let missing = series.null_count();
        let mode_val = string_mode(&series)
            .ok_or_else(|| PreprocessingError::NoValidValues(col_name.to_string()))?;

        let filled = fill_string_nulls(&series, &mode_val)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with mode: '{}' ({} values)",
            col_name, mode_val, missing
        ));
        debug!("Mode imputed '{}' with '{}'", col_name, mode_val);
        Ok(mode_val)
    }

    /// Replace nulls in a text column with a constant.
    pub fn apply_constant_imputation(
        df: &mut DataFrame,
        col_name: &str,
        fill_value: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = Self::series(df, col_name)?;
        let missing = series.null_count();

        let filled = fill_string_nulls(&series, fill_value)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with constant value: '{}' ({} values)",
            col_name, fill_value, missing
        ));
        debug!("Constant imputed '{}' with '{}'", col_name, fill_value);
        Ok(())
    }

    fn series(df: &DataFrame, col_name: &str) -> Result<Series> {
        df.column(col_name)
            .map(|col| col.as_materialized_series().clone())
            .map_err(|_| PreprocessingError::ColumnNotFound(col_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // apply_numeric_mean() tests
    // ========================================================================

    #[test]
    fn test_apply_numeric_mean_basic() {
        let mut df = df![
            "values" => [Some(1.0), None, Some(3.0), None, Some(5.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let fill = StatisticalImputer::apply_numeric_mean(&mut df, "values", &mut steps).unwrap();

        assert_eq!(fill, 3.0);
        let values = df.column("values").unwrap();
        assert_eq!(values.null_count(), 0);
        assert_eq!(values.get(1).unwrap().try_extract::<f64>().unwrap(), 3.0);
        assert_eq!(values.get(4).unwrap().try_extract::<f64>().unwrap(), 5.0);
        assert!(steps[0].contains("mean"));
    }

    #[test]
    fn test_apply_numeric_mean_uses_pre_fill_mean() {
        let mut df = df![
            "Age" => [Some(20.0), Some(40.0), None, None, None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_numeric_mean(&mut df, "Age", &mut steps).unwrap();

        let ages: Vec<f64> = df
            .column("Age")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ages, vec![20.0, 40.0, 30.0, 30.0, 30.0]);
    }

    #[test]
    fn test_apply_numeric_mean_all_null() {
        let mut df = df![
            "Age" => [None::<f64>, None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let err = StatisticalImputer::apply_numeric_mean(&mut df, "Age", &mut steps).unwrap_err();
        assert!(matches!(err, PreprocessingError::NoValidValues(_)));
    }

    #[test]
    fn test_apply_numeric_mean_ignores_nulls_in_denominator() {
        let mut df = df![
            "Age" => [Some(0.42), None, None, Some(80.0)],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let fill = StatisticalImputer::apply_numeric_mean(&mut df, "Age", &mut steps).unwrap();

        assert!((fill - 40.21).abs() < 1e-12);
        assert_eq!(df.column("Age").unwrap().null_count(), 0);
    }

    #[test]
    fn test_apply_numeric_mean_missing_column() {
        let mut df = df!["other" => [1.0]].unwrap();
        let mut steps = Vec::new();

        let err = StatisticalImputer::apply_numeric_mean(&mut df, "Age", &mut steps).unwrap_err();
        assert!(matches!(err, PreprocessingError::ColumnNotFound(_)));
    }

    // ========================================================================
    // apply_mode_imputation() tests
    // ========================================================================

    #[test]
    fn test_apply_mode_imputation() {
        let mut df = df![
            "Embarked" => [Some("S"), Some("C"), None, Some("S"), Some("Q")],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let mode = StatisticalImputer::apply_mode_imputation(&mut df, "Embarked", &mut steps)
            .unwrap();

        assert_eq!(mode, "S");
        let col = df.column("Embarked").unwrap();
        assert_eq!(col.null_count(), 0);
        assert_eq!(col.as_materialized_series().str().unwrap().get(2), Some("S"));
    }

    #[test]
    fn test_apply_mode_imputation_tie_is_deterministic() {
        let mut df = df![
            "Embarked" => [Some("S"), Some("Q"), None, Some("Q"), Some("S")],
        ]
        .unwrap();
        let mut steps = Vec::new();

        let mode = StatisticalImputer::apply_mode_imputation(&mut df, "Embarked", &mut steps)
            .unwrap();
        assert_eq!(mode, "Q");
    }

    // ========================================================================
    // apply_constant_imputation() tests
    // ========================================================================

    #[test]
    fn test_apply_constant_imputation() {
        let mut df = df![
            "Cabin" => [None, Some("C85"), None],
        ]
        .unwrap();
        let mut steps = Vec::new();

        StatisticalImputer::apply_constant_imputation(&mut df, "Cabin", "Unknown", &mut steps)
            .unwrap();

        let values: Vec<Option<&str>> = df
            .column("Cabin")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some("Unknown"), Some("C85"), Some("Unknown")]);
        assert!(steps[0].contains("2 values"));
    }
}
