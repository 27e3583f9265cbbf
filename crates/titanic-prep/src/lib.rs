//! Titanic Preprocessing Pipeline Library
//!
//! A preprocessing library for the Titanic passenger dataset, built with Rust and Polars.
//!
//! # Overview
//!
//! A run goes through five stages, each consuming the typed frame produced by
//! the previous one:
//!
//! - **Load**: read the CSV and normalize every column to its canonical dtype
//! - **Impute**: `Age` by mean, `Embarked` by mode, `Cabin` by a constant marker
//! - **Encode**: `Sex`, `Embarked`, `Cabin` and `Ticket` to integer codes
//! - **Standardize**: append `Fare_standardized` and `Age_standardized` z-scores
//! - **Filter outliers**: keep rows whose `Fare` lies within the IQR fences
//!
//! Alongside the tables, a run also yields a dataset overview, histogram and
//! boxplot summaries, and a per-column summary of what changed.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! // The whole pipeline with default settings
//! let (full, cleaned) = titanic_prep::process("data/train.csv")?;
//! println!("{} of {} rows kept", cleaned.height(), full.height());
//! ```
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to customize preprocessing behavior:
//!
//! ```rust,ignore
//! use titanic_prep::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .cabin_fill_value("Unknown")
//!     .iqr_multiplier(3.0)          // Only drop extreme fares
//!     .histogram_bins(20)
//!     .build()?;
//!
//! let output = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process_file("data/train.csv")?;
//!
//! println!("Fences: {:?}", output.fences);
//! ```

pub mod config;
pub mod encoders;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod scaling;
pub mod types;
pub mod utils;
pub mod visualize;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use encoders::CategoricalEncoder;
pub use error::{PreprocessingError, Result as PreprocessingResult, ResultExt};
pub use imputers::{ImputationValues, StatisticalImputer};
pub use loader::load_csv;
pub use pipeline::{
    ClosureProgressReporter, IqrFences, OutlierHandler, Pipeline, PipelineBuilder,
    PreprocessingStage, ProgressReporter, ProgressUpdate,
};
pub use profiler::{DataProfiler, DatasetOverview};
pub use reporting::{OutputFormat, PreprocessingReport, ReportGenerator};
pub use scaling::{ScalingParams, StandardScaler};
pub use types::{ColumnSummary, PipelineOutput, PreprocessingSummary};
pub use visualize::{BoxplotSummary, Histogram, VisualSummary};

use polars::prelude::DataFrame;
use std::path::Path;

/// Run the default pipeline on a CSV file.
///
/// Returns `(full, cleaned)`: the imputed, encoded and standardized table, and
/// its subset of rows whose `Fare` lies within the IQR fences.
pub fn process(source_path: impl AsRef<Path>) -> error::Result<(DataFrame, DataFrame)> {
    let pipeline = Pipeline::builder()
        .build()
        .map_err(|e| PreprocessingError::InvalidConfig(e.to_string()))?;
    Ok(pipeline.process_file(source_path)?.into_tables())
}
