//! Z-score standardization.
//!
//! For each configured column a `<Name>_standardized` companion is appended:
//! `(value - mean) / std`, with the sample standard deviation taken over the
//! non-null values. Nulls stay null. The source column is left untouched.
//!
//! A column with zero or undefined spread (all values equal, or a single
//! value) has no meaningful z-score; every non-null entry becomes NaN and a
//! warning is logged. This is not an error. A column with no values at all
//! fails with [`PreprocessingError::NoValidValues`].

use crate::config::PipelineConfig;
use crate::error::{PreprocessingError, Result};
use crate::pipeline::frames::{EncodedFrame, StandardizedFrame};
use crate::profiler::{mean, sample_std};
use crate::types::standardized_name;
use crate::utils::non_null_f64;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Fitted location and scale of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParams {
    pub column: String,
    pub mean: f64,
    /// Sample standard deviation; NaN when undefined.
    pub std: f64,
}

impl ScalingParams {
    /// Fit mean and sample std over the non-null values of `series`.
    ///
    /// Fails with [`PreprocessingError::NoValidValues`] when there are none.
    pub fn fit(series: &Series) -> Result<Self> {
        let values = non_null_f64(series)?;
        let mean = mean(&values)
            .ok_or_else(|| PreprocessingError::NoValidValues(series.name().to_string()))?;
        let std = sample_std(&values).unwrap_or(f64::NAN);
        Ok(Self {
            column: series.name().to_string(),
            mean,
            std,
        })
    }

    /// True when z-scores would be NaN for every row.
    pub fn is_degenerate(&self) -> bool {
        !(self.std.is_finite() && self.std > 0.0)
    }

    /// Apply `(v - mean) / std` to every non-null value.
    pub fn transform(&self, series: &Series, name: &str) -> Result<Series> {
        let float_series = series.cast(&DataType::Float64)?;
        let scaled: Vec<Option<f64>> = float_series
            .f64()?
            .into_iter()
            .map(|val| val.map(|v| (v - self.mean) / self.std))
            .collect();
        Ok(Series::new(name.into(), scaled))
    }
}

/// Stateless standard scaler.
pub struct StandardScaler;

impl StandardScaler {
    /// Append `<col_name>_standardized` to the table and return the fitted params.
    pub fn standardize_column(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> Result<ScalingParams> {
        let series = df
            .column(col_name)
            .map_err(|_| PreprocessingError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series()
            .clone();

        let params = ScalingParams::fit(&series)?;
        if params.is_degenerate() {
            let message = format!(
                "Column '{}' has no spread (std = {}); standardized values are NaN",
                col_name, params.std
            );
            warn!("{}", message);
            warnings.push(message);
        }

        let target = standardized_name(col_name);
        let scaled = params.transform(&series, &target)?;
        df.with_column(scaled)?;

        processing_steps.push(format!(
            "Standardized '{}' into '{}' (mean {:.4}, std {:.4})",
            col_name, target, params.mean, params.std
        ));
        debug!("Standardized '{}' with {:?}", col_name, params);
        Ok(params)
    }
}

/// Run the standardization stage over the configured columns.
pub fn standardize(
    frame: EncodedFrame,
    config: &PipelineConfig,
    processing_steps: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> Result<(StandardizedFrame, Vec<ScalingParams>)> {
    let mut df = frame.into_inner();
    let mut fitted = Vec::with_capacity(config.standardize_columns.len());

    for col_name in &config.standardize_columns {
        fitted.push(StandardScaler::standardize_column(
            &mut df,
            col_name,
            processing_steps,
            warnings,
        )?);
    }

    info!("Standardized {} columns", fitted.len());
    Ok((StandardizedFrame::new(df), fitted))
}
