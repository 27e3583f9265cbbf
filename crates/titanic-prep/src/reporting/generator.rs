use crate::error::Result;
use crate::imputers::ImputationValues;
use crate::pipeline::outliers::IqrFences;
use crate::profiler::DatasetOverview;
use crate::scaling::ScalingParams;
use crate::types::{PipelineOutput, PreprocessingSummary};
use crate::visualize::VisualSummary;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// File format for exported tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// Everything known about one pipeline run, for JSON output (`--json`)
/// and report files (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the exported table (if written)
    pub output_file: Option<String>,

    /// Shape, dtypes and head of the loaded table
    pub overview: DatasetOverview,
    /// Fill values chosen during imputation
    pub imputation: ImputationValues,
    /// Mean and std of each standardized column
    pub scaling: Vec<ScalingParams>,
    /// Fences used by the outlier filter
    pub outlier_fences: IqrFences,

    pub summary: PreprocessingSummary,
    pub processing_steps: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visuals: Option<VisualSummary>,
}

/// Writes exported tables and reports into an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Build a report from a finished pipeline run.
    pub fn build_report(
        input_file: impl AsRef<Path>,
        output_file: Option<&Path>,
        output: &PipelineOutput,
    ) -> PreprocessingReport {
        PreprocessingReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.as_ref().display().to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            overview: output.overview.clone(),
            imputation: output.imputation.clone(),
            scaling: output.scaling.clone(),
            outlier_fences: output.fences.clone(),
            summary: output.summary.clone(),
            processing_steps: output.processing_steps.clone(),
            visuals: output.visuals.clone(),
        }
    }

    /// Save a table as `<file_stem>.<ext>` in the output directory.
    pub fn save_table(
        &self,
        df: &mut DataFrame,
        file_stem: &str,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let output_path = self
            .output_dir
            .join(format!("{}.{}", file_stem, format.extension()));
        let mut file = File::create(&output_path)?;

        match format {
            OutputFormat::Csv => {
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .with_separator(b',')
                    .with_quote_char(b'"')
                    .finish(df)?;
            }
            OutputFormat::Parquet => {
                ParquetWriter::new(&mut file).finish(df)?;
            }
        }

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }

    /// Write a report to `<report_base_name>_report.json` in the output directory.
    pub fn write_report(
        &self,
        report: &PreprocessingReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pipeline;
    use crate::test_support::titanic_df;
    use pretty_assertions::assert_eq;

    fn run() -> PipelineOutput {
        Pipeline::builder()
            .build()
            .unwrap()
            .process(titanic_df())
            .unwrap()
    }

    #[test]
    fn test_save_table_csv_round_trips_shape() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path());
        let mut cleaned = run().cleaned;

        let path = generator
            .save_table(&mut cleaned, "train_cleaned", OutputFormat::Csv)
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "train_cleaned.csv");
        let reloaded = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path))
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(reloaded.shape(), cleaned.shape());
    }

    #[test]
    fn test_save_table_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path().join("nested"));
        let mut cleaned = run().cleaned;

        let path = generator
            .save_table(&mut cleaned, "train_cleaned", OutputFormat::Parquet)
            .unwrap();

        assert!(path.exists());
        assert_eq!(path.extension().unwrap(), "parquet");
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path());
        let output = run();

        let report = ReportGenerator::build_report("train.csv", None, &output);
        let path = generator.write_report(&report, "train").unwrap();

        assert_eq!(path.file_name().unwrap(), "train_report.json");
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["input_file"], "train.csv");
        assert_eq!(json["imputation"]["embarked_mode"], "S");
        assert_eq!(json["outlier_fences"]["column"], "Fare");
        assert_eq!(json["summary"]["rows_cleaned"], 8);
        assert!(json.get("output_file").unwrap().is_null());
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Csv.extension(), "csv");
        assert_eq!(OutputFormat::Parquet.extension(), "parquet");
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
    }
}
