//! Distribution summaries.
//!
//! Histograms and boxplot summaries of the numeric columns, plus plain-text
//! renderers for terminal output. Nothing here feeds data back into the
//! pipeline.

use crate::config::PipelineConfig;
use crate::error::{PreprocessingError, Result};
use crate::profiler::{quantile_sorted, sorted};
use crate::types::standardized_name;
use crate::utils::non_null_f64;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::debug;

/// Width in characters of the longest histogram bar.
const BAR_WIDTH: usize = 40;

/// One equal-width histogram bin. The last bin of a histogram includes its
/// upper edge; all others are half-open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the finite, non-null values of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Bin `values` into `bin_count` equal-width bins spanning their range.
    ///
    /// No values gives no bins. When every value is equal a single bin holds them all.
    pub fn from_values(column: impl Into<String>, values: &[f64], bin_count: usize) -> Self {
        let column = column.into();
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

        let (Some(min), Some(max)) = (
            finite.iter().copied().reduce(f64::min),
            finite.iter().copied().reduce(f64::max),
        ) else {
            return Self { column, bins: Vec::new() };
        };

        if bin_count == 0 {
            return Self { column, bins: Vec::new() };
        }

        if min == max {
            return Self {
                column,
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: finite.len(),
                }],
            };
        }

        let width = (max - min) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == bin_count {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for v in finite {
            let idx = (((v - min) / width) as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Self { column, bins }
    }

    /// Total number of binned values.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Five-number summary with whiskers and outlier count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotSummary {
    pub column: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value not below `q1 - multiplier * iqr`.
    pub lower_whisker: f64,
    /// Largest value not above `q3 + multiplier * iqr`.
    pub upper_whisker: f64,
    /// Values beyond the whiskers.
    pub outlier_count: usize,
}

impl BoxplotSummary {
    /// Summarize the finite values, or `None` when there are none.
    pub fn from_values(column: impl Into<String>, values: &[f64], multiplier: f64) -> Option<Self> {
        let values = sorted(values.iter().copied().filter(|v| v.is_finite()).collect());
        let q1 = quantile_sorted(&values, 0.25)?;
        let median = quantile_sorted(&values, 0.5)?;
        let q3 = quantile_sorted(&values, 0.75)?;
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - multiplier * iqr, q3 + multiplier * iqr);

        let within = |v: &f64| *v >= low_fence && *v <= high_fence;
        let lower_whisker = values.iter().copied().find(within).unwrap_or(q1);
        let upper_whisker = values.iter().copied().rev().find(within).unwrap_or(q3);
        let outlier_count = values.iter().filter(|v| !within(*v)).count();

        Some(Self {
            column: column.into(),
            min: values[0],
            q1,
            median,
            q3,
            max: values[values.len() - 1],
            lower_whisker,
            upper_whisker,
            outlier_count,
        })
    }
}

/// Histograms and boxplots collected from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualSummary {
    pub histograms: Vec<Histogram>,
    pub boxplots: Vec<BoxplotSummary>,
}

/// Collect histograms of each standardized column and its z-score companion,
/// and a boxplot of each raw column.
pub fn collect(df: &DataFrame, config: &PipelineConfig) -> Result<VisualSummary> {
    let mut summary = VisualSummary::default();

    for col_name in &config.standardize_columns {
        let raw = column_values(df, col_name)?;
        let scaled_name = standardized_name(col_name);
        let scaled = column_values(df, &scaled_name)?;

        summary
            .histograms
            .push(Histogram::from_values(col_name.as_str(), &raw, config.histogram_bins));
        summary
            .histograms
            .push(Histogram::from_values(scaled_name, &scaled, config.histogram_bins));

        match BoxplotSummary::from_values(col_name.as_str(), &raw, config.iqr_multiplier) {
            Some(boxplot) => summary.boxplots.push(boxplot),
            None => debug!("No values to summarize in '{}'", col_name),
        }
    }

    Ok(summary)
}

fn column_values(df: &DataFrame, col_name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(col_name)
        .map_err(|_| PreprocessingError::ColumnNotFound(col_name.to_string()))?;
    Ok(non_null_f64(column.as_materialized_series())?)
}

/// Render a histogram as horizontal bars.
pub fn render_histogram(histogram: &Histogram) -> String {
    let mut out = format!("Histogram of {} (n = {})\n", histogram.column, histogram.total());
    if histogram.bins.is_empty() {
        out.push_str("  (no values)\n");
        return out;
    }

    let peak = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &histogram.bins {
        let bar = "#".repeat(bin.count * BAR_WIDTH / peak);
        let _ = writeln!(
            out,
            "  {:>10.3} .. {:<10.3} | {:<width$} {}",
            bin.lower,
            bin.upper,
            bar,
            bin.count,
            width = BAR_WIDTH
        );
    }
    out
}

/// Render a boxplot summary as a labelled five-number line.
pub fn render_boxplot(boxplot: &BoxplotSummary) -> String {
    format!(
        "Boxplot of {}\n  min {:.3} | whisker {:.3} | Q1 {:.3} | median {:.3} | Q3 {:.3} | whisker {:.3} | max {:.3}\n  {} outlier(s)\n",
        boxplot.column,
        boxplot.min,
        boxplot.lower_whisker,
        boxplot.q1,
        boxplot.median,
        boxplot.q3,
        boxplot.upper_whisker,
        boxplot.max,
        boxplot.outlier_count
    )
}
