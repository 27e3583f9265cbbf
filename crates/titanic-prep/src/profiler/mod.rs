//! Dataset exploration.
//!
//! This module provides the first look at a freshly loaded table:
//! - Shape and per-column dtype / non-null counts
//! - Which columns hold text and which hold numbers
//! - A short head preview
//! - Descriptive statistics for numeric columns

mod statistics;

pub use statistics::{ColumnStatistics, mean, quantile_sorted, sample_std, sorted};

use crate::error::Result;
use crate::utils::{head_rows, is_numeric_dtype, is_text_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of rows kept in [`DatasetOverview::head`].
pub const HEAD_ROWS: usize = 5;

/// Per-column dtype and null information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null_count: usize,
    pub null_count: usize,
}

/// Shape, column types and a head preview of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub shape: (usize, usize),
    pub columns: Vec<ColumnInfo>,
    pub text_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub head: Vec<Vec<String>>,
    /// Descriptive statistics of the numeric columns that hold any value.
    pub numeric_summary: Vec<ColumnStatistics>,
}

impl DatasetOverview {
    /// Look up the info of a single column.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|col| col.name == name)
    }
}

/// Data profiler for analyzing dataset structure.
pub struct DataProfiler;

impl DataProfiler {
    /// Build an overview of the table.
    pub fn overview(df: &DataFrame) -> Result<DatasetOverview> {
        let mut columns = Vec::with_capacity(df.width());
        let mut text_columns = Vec::new();
        let mut numeric_columns = Vec::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            let null_count = col.null_count();

            if is_text_dtype(col.dtype()) {
                text_columns.push(name.clone());
            } else if is_numeric_dtype(col.dtype()) {
                numeric_columns.push(name.clone());
            }

            columns.push(ColumnInfo {
                name,
                dtype: format!("{}", col.dtype()),
                non_null_count: col.len() - null_count,
                null_count,
            });
        }

        Ok(DatasetOverview {
            shape: df.shape(),
            columns,
            text_columns,
            numeric_columns,
            head: head_rows(df, HEAD_ROWS),
            numeric_summary: Self::describe_numeric(df)?,
        })
    }

    /// Descriptive statistics for every numeric column that has at least one value.
    pub fn describe_numeric(df: &DataFrame) -> Result<Vec<ColumnStatistics>> {
        let mut stats = Vec::new();
        for col in df.get_columns() {
            if !is_numeric_dtype(col.dtype()) || col.null_count() == col.len() {
                continue;
            }
            stats.push(ColumnStatistics::from_series(col.as_materialized_series())?);
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df![
            "PassengerId" => [1i64, 2, 3],
            "Name" => ["Braund", "Cumings", "Heikkinen"],
            "Age" => [Some(22.0), None, Some(26.0)],
            "Cabin" => [None, Some("C85"), None],
        ]
        .unwrap()
    }

    #[test]
    fn test_overview_shape_and_counts() {
        let overview = DataProfiler::overview(&sample_df()).unwrap();

        assert_eq!(overview.shape, (3, 4));
        let age = overview.column("Age").unwrap();
        assert_eq!(age.non_null_count, 2);
        assert_eq!(age.null_count, 1);
        let cabin = overview.column("Cabin").unwrap();
        assert_eq!(cabin.non_null_count, 1);
    }

    #[test]
    fn test_overview_splits_text_and_numeric() {
        let overview = DataProfiler::overview(&sample_df()).unwrap();

        assert_eq!(overview.text_columns, vec!["Name", "Cabin"]);
        assert_eq!(overview.numeric_columns, vec!["PassengerId", "Age"]);
    }

    #[test]
    fn test_overview_head_preview() {
        let overview = DataProfiler::overview(&sample_df()).unwrap();
        assert_eq!(overview.head.len(), 3);
        assert_eq!(overview.head[0][1], "Braund");
    }

    #[test]
    fn test_describe_numeric_skips_text() {
        let stats = DataProfiler::describe_numeric(&sample_df()).unwrap();
        let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["PassengerId", "Age"]);
        assert_eq!(stats[1].count, 2);
    }

    #[test]
    fn test_overview_includes_numeric_summary() {
        let overview = DataProfiler::overview(&sample_df()).unwrap();

        assert_eq!(overview.numeric_summary.len(), 2);
        let age = &overview.numeric_summary[1];
        assert_eq!(age.name, "Age");
        assert_eq!(age.null_count, 1);
        assert_eq!(age.mean, 24.0);
    }

    #[test]
    fn test_overview_skips_all_null_numeric_column() {
        let df = df![
            "Age" => [None::<f64>, None],
            "Fare" => [7.25, 8.05],
        ]
        .unwrap();

        let overview = DataProfiler::overview(&df).unwrap();
        assert_eq!(overview.numeric_columns, vec!["Age", "Fare"]);
        let names: Vec<&str> = overview.numeric_summary.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Fare"]);
    }
}
