//! Configuration types for the preprocessing pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The defaults reproduce the standard Titanic preprocessing run.

use crate::error::{PreprocessingError, Result};
use crate::types::{ColumnKind, column_kind, columns};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default marker written into missing `Cabin` cells.
pub const DEFAULT_CABIN_FILL: &str = "Unknown";

/// Default fence multiplier for the IQR rule.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Configuration for the preprocessing pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use titanic_prep::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .iqr_multiplier(3.0)
///     .histogram_bins(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Value written into missing `Cabin` cells. The encoder maps this exact
    /// value to 0 and everything else to 1.
    /// Default: "Unknown"
    pub cabin_fill_value: String,

    /// Numeric columns that receive a `<Name>_standardized` companion.
    /// Default: ["Fare", "Age"]
    pub standardize_columns: Vec<String>,

    /// Column the IQR outlier filter is applied to.
    /// Default: "Fare"
    pub outlier_column: String,

    /// Fence distance in multiples of the IQR.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Quantile used as the lower box edge.
    /// Default: 0.25
    pub lower_quantile: f64,

    /// Quantile used as the upper box edge.
    /// Default: 0.75
    pub upper_quantile: f64,

    /// Number of equal-width bins in distribution histograms.
    /// Default: 30
    pub histogram_bins: usize,

    /// Whether to compute histograms and boxplot summaries.
    /// Default: true
    pub collect_visuals: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cabin_fill_value: DEFAULT_CABIN_FILL.to_string(),
            standardize_columns: vec![columns::FARE.to_string(), columns::AGE.to_string()],
            outlier_column: columns::FARE.to_string(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            lower_quantile: 0.25,
            upper_quantile: 0.75,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            collect_visuals: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default value. The loaded configuration is
    /// validated before it is returned.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PreprocessingError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| PreprocessingError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if self.cabin_fill_value.is_empty() {
            return Err(ConfigValidationError::EmptyCabinFill);
        }

        if self.standardize_columns.is_empty() {
            return Err(ConfigValidationError::NoStandardizeColumns);
        }

        for col in &self.standardize_columns {
            if column_kind(col) != Some(ColumnKind::Float) {
                return Err(ConfigValidationError::NotNumericColumn {
                    field: "standardize_columns".to_string(),
                    column: col.clone(),
                });
            }
        }

        if column_kind(&self.outlier_column) != Some(ColumnKind::Float) {
            return Err(ConfigValidationError::NotNumericColumn {
                field: "outlier_column".to_string(),
                column: self.outlier_column.clone(),
            });
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        for (field, value) in [
            ("lower_quantile", self.lower_quantile),
            ("upper_quantile", self.upper_quantile),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidQuantile {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.lower_quantile >= self.upper_quantile {
            return Err(ConfigValidationError::QuantileOrder {
                lower: self.lower_quantile,
                upper: self.upper_quantile,
            });
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Cabin fill value must not be empty")]
    EmptyCabinFill,

    #[error("At least one column must be standardized")]
    NoStandardizeColumns,

    #[error("Invalid column for '{field}': '{column}' is not a floating point Titanic column")]
    NotNumericColumn { field: String, column: String },

    #[error("Invalid IQR multiplier: {0} (must be a finite value >= 0)")]
    InvalidMultiplier(f64),

    #[error("Invalid quantile for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidQuantile { field: String, value: f64 },

    #[error("Lower quantile {lower} must be below upper quantile {upper}")]
    QuantileOrder { lower: f64, upper: f64 },

    #[error("Histogram needs at least one bin")]
    InvalidHistogramBins,
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    cabin_fill_value: Option<String>,
    standardize_columns: Option<Vec<String>>,
    outlier_column: Option<String>,
    iqr_multiplier: Option<f64>,
    lower_quantile: Option<f64>,
    upper_quantile: Option<f64>,
    histogram_bins: Option<usize>,
    collect_visuals: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the marker written into missing `Cabin` cells.
    pub fn cabin_fill_value(mut self, value: impl Into<String>) -> Self {
        self.cabin_fill_value = Some(value.into());
        self
    }

    /// Set the columns that receive a standardized companion column.
    pub fn standardize_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.standardize_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the column the outlier filter is applied to.
    pub fn outlier_column(mut self, column: impl Into<String>) -> Self {
        self.outlier_column = Some(column.into());
        self
    }

    /// Set the fence distance in multiples of the IQR.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the quantiles used as box edges.
    ///
    /// # Arguments
    /// * `lower` - Lower edge, e.g. 0.25
    /// * `upper` - Upper edge, e.g. 0.75
    pub fn quantiles(mut self, lower: f64, upper: f64) -> Self {
        self.lower_quantile = Some(lower);
        self.upper_quantile = Some(upper);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Enable or disable histogram and boxplot collection.
    pub fn collect_visuals(mut self, collect: bool) -> Self {
        self.collect_visuals = Some(collect);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            cabin_fill_value: self.cabin_fill_value.unwrap_or(defaults.cabin_fill_value),
            standardize_columns: self
                .standardize_columns
                .unwrap_or(defaults.standardize_columns),
            outlier_column: self.outlier_column.unwrap_or(defaults.outlier_column),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            lower_quantile: self.lower_quantile.unwrap_or(defaults.lower_quantile),
            upper_quantile: self.upper_quantile.unwrap_or(defaults.upper_quantile),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            collect_visuals: self.collect_visuals.unwrap_or(defaults.collect_visuals),
        };

        config.validate()?;
        Ok(config)
    }
}
