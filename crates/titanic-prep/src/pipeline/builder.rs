//! Main preprocessing pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the preprocessing workflow.

use crate::config::{ConfigValidationError, PipelineConfig};
use crate::encoders::encode;
use crate::error::{PreprocessingError, Result};
use crate::imputers::impute;
use crate::loader::{load_csv, normalize_schema};
use crate::pipeline::frames::LoadedFrame;
use crate::pipeline::outliers::OutlierHandler;
use crate::pipeline::progress::{
    ClosureProgressReporter, PreprocessingStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::scaling::standardize;
use crate::types::{ColumnSummary, PipelineOutput, PreprocessingSummary};
use crate::utils::total_null_count;
use crate::visualize;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The main preprocessing pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use titanic_prep::{Pipeline, PipelineConfig};
///
/// let output = Pipeline::builder()
///     .config(PipelineConfig::builder().iqr_multiplier(3.0).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process_file("data/train.csv")?;
///
/// println!("kept {} of {} rows", output.cleaned.height(), output.full.height());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure Pipeline is Send (can be moved to a worker thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load a CSV file and run every stage on it.
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<PipelineOutput> {
        let path = path.as_ref();
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Loading,
            0.0,
            format!("Loading {}", path.display()),
        ));

        let frame = load_csv(path).inspect_err(|e| self.fail(e))?;
        self.run_guarded(frame)
    }

    /// Run every stage on an in-memory table.
    ///
    /// The table is normalized to the canonical Titanic schema first, exactly
    /// as [`process_file`](Self::process_file) does after reading.
    pub fn process(&self, df: DataFrame) -> Result<PipelineOutput> {
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Loading,
            0.0,
            "Normalizing column types",
        ));

        let frame = normalize_schema(df).inspect_err(|e| self.fail(e))?;
        self.run_guarded(frame)
    }

    fn run_guarded(&self, frame: LoadedFrame) -> Result<PipelineOutput> {
        match self.run(frame) {
            Ok(output) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(output)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn fail(&self, e: &PreprocessingError) {
        error!("Pipeline error: {}", e);
        self.report_progress(ProgressUpdate::failed(e.to_string()));
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run(&self, frame: LoadedFrame) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        info!("Starting preprocessing pipeline...");

        let mut processing_steps: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let loaded_df = frame.as_df();
        let mut summary = PreprocessingSummary {
            rows_loaded: loaded_df.height(),
            columns_loaded: loaded_df.width(),
            missing_before: total_null_count(loaded_df),
            ..Default::default()
        };
        let initial_columns: Vec<(String, String, usize)> = loaded_df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.dtype().to_string(), col.null_count()))
            .collect();
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Loading,
            1.0,
            format!("Loaded {} rows x {} columns", summary.rows_loaded, summary.columns_loaded),
        ));

        // Step 1: Overview of the raw table
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Profiling,
            0.0,
            "Profiling dataset...",
        ));
        let overview = DataProfiler::overview(loaded_df)?;
        debug!("Shape: {:?}", overview.shape);
        for col in &overview.columns {
            debug!("  {}: {} ({} non-null)", col.name, col.dtype, col.non_null_count);
        }
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Profiling,
            1.0,
            "Profiling complete",
        ));

        // Step 2: Imputation
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Imputation,
            0.0,
            "Imputing missing values...",
        ));
        info!("Step 2: Imputing missing values...");
        let (imputed, imputation) = impute(frame, &self.config, &mut processing_steps)?;
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Imputation,
            1.0,
            "Imputation complete",
        ));

        // Step 3: Encoding
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Encoding,
            0.0,
            "Encoding categorical columns...",
        ));
        info!("Step 3: Encoding categorical columns...");
        let encoded = encode(imputed, &self.config, &mut processing_steps)?;
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Encoding,
            1.0,
            "Encoding complete",
        ));

        // Step 4: Standardization
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Standardization,
            0.0,
            "Standardizing numeric columns...",
        ));
        info!("Step 4: Standardizing numeric columns...");
        let (standardized, scaling) =
            standardize(encoded, &self.config, &mut processing_steps, &mut warnings)?;
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Standardization,
            1.0,
            "Standardization complete",
        ));

        // Step 5: Outlier filtering
        self.report_progress(ProgressUpdate::with_sub_stage(
            PreprocessingStage::OutlierFiltering,
            format!("Column: {}", self.config.outlier_column),
            0.0,
            "Filtering outliers...",
        ));
        info!("Step 5: Filtering outliers...");
        let (cleaned, fences) = OutlierHandler::filter_outliers(
            standardized.as_df(),
            &self.config,
            &mut processing_steps,
        )?;
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::OutlierFiltering,
            1.0,
            format!("Kept {} rows", cleaned.height()),
        ));

        // Step 6: Distribution summaries
        let visuals = if self.config.collect_visuals {
            self.report_progress(ProgressUpdate::new(
                PreprocessingStage::Visualization,
                0.0,
                "Summarizing distributions...",
            ));
            let visuals = visualize::collect(standardized.as_df(), &self.config)?;
            self.report_progress(ProgressUpdate::new(
                PreprocessingStage::Visualization,
                1.0,
                format!("Collected {} histograms", visuals.histograms.len()),
            ));
            Some(visuals)
        } else {
            debug!("Skipping distribution summaries (disabled)");
            None
        };

        let full = standardized.into_inner();

        // Finalize summary
        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        summary.rows_cleaned = cleaned.height();
        summary.rows_removed = summary.rows_loaded.saturating_sub(summary.rows_cleaned);
        summary.columns_final = full.width();
        summary.missing_after = total_null_count(&full);
        summary.column_summaries = self.column_summaries(&initial_columns, &full);
        summary.warnings = warnings;

        info!(
            "Pipeline finished in {} ms: {} rows -> {} cleaned",
            summary.duration_ms, summary.rows_loaded, summary.rows_cleaned
        );

        Ok(PipelineOutput {
            full,
            cleaned,
            imputation,
            scaling,
            fences,
            overview,
            visuals,
            processing_steps,
            summary,
        })
    }

    /// Pair each final column with its loaded state and the action applied to it.
    fn column_summaries(
        &self,
        initial_columns: &[(String, String, usize)],
        full: &DataFrame,
    ) -> Vec<ColumnSummary> {
        full.get_columns()
            .iter()
            .map(|col| {
                let name = col.name().to_string();
                let initial = initial_columns.iter().find(|(n, _, _)| *n == name);
                ColumnSummary {
                    action: self.column_action(&name),
                    original_dtype: initial.map(|(_, dtype, _)| dtype.clone()),
                    final_dtype: col.dtype().to_string(),
                    missing_before: initial.map(|(_, _, nulls)| *nulls).unwrap_or(0),
                    missing_after: col.null_count(),
                    name,
                }
            })
            .collect()
    }

    fn column_action(&self, name: &str) -> Option<String> {
        use crate::types::{columns, standardized_name};

        let action = match name {
            columns::AGE => "mean imputation",
            columns::EMBARKED => "mode imputation, integer codes",
            columns::CABIN => "constant imputation, has-cabin flag",
            columns::SEX => "integer codes",
            columns::TICKET => "numeric-ticket flag",
            _ if self
                .config
                .standardize_columns
                .iter()
                .any(|col| standardized_name(col) == name) =>
            {
                "z-score"
            }
            _ => return None,
        };
        Some(action.to_string())
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure PipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
