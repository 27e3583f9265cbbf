use crate::imputers::ImputationValues;
use crate::pipeline::outliers::IqrFences;
use crate::profiler::DatasetOverview;
use crate::scaling::ScalingParams;
use crate::visualize::VisualSummary;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column names of the canonical Titanic export, in file order.
pub mod columns {
    pub const PASSENGER_ID: &str = "PassengerId";
    pub const SURVIVED: &str = "Survived";
    pub const PCLASS: &str = "Pclass";
    pub const NAME: &str = "Name";
    pub const SEX: &str = "Sex";
    pub const AGE: &str = "Age";
    pub const SIBSP: &str = "SibSp";
    pub const PARCH: &str = "Parch";
    pub const TICKET: &str = "Ticket";
    pub const FARE: &str = "Fare";
    pub const CABIN: &str = "Cabin";
    pub const EMBARKED: &str = "Embarked";
}

/// Storage type a Titanic column is normalized to after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    /// The polars dtype this kind is stored as.
    pub fn dtype(&self) -> DataType {
        match self {
            Self::Integer => DataType::Int64,
            Self::Float => DataType::Float64,
            Self::Text => DataType::String,
        }
    }
}

/// Expected input schema, in file order.
pub const TITANIC_SCHEMA: [(&str, ColumnKind); 12] = [
    (columns::PASSENGER_ID, ColumnKind::Integer),
    (columns::SURVIVED, ColumnKind::Integer),
    (columns::PCLASS, ColumnKind::Integer),
    (columns::NAME, ColumnKind::Text),
    (columns::SEX, ColumnKind::Text),
    (columns::AGE, ColumnKind::Float),
    (columns::SIBSP, ColumnKind::Integer),
    (columns::PARCH, ColumnKind::Integer),
    (columns::TICKET, ColumnKind::Text),
    (columns::FARE, ColumnKind::Float),
    (columns::CABIN, ColumnKind::Text),
    (columns::EMBARKED, ColumnKind::Text),
];

/// Look up the expected kind of a Titanic column.
pub fn column_kind(name: &str) -> Option<ColumnKind> {
    TITANIC_SCHEMA
        .iter()
        .find(|(col, _)| *col == name)
        .map(|(_, kind)| *kind)
}

/// Name of the derived column holding the z-scores of `column`.
pub fn standardized_name(column: &str) -> String {
    format!("{}_standardized", column)
}

/// Everything a pipeline run produces.
///
/// `full` is the imputed, encoded and standardized table. `cleaned` is the
/// row subset of `full` whose outlier column lies within `fences`.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub full: DataFrame,
    pub cleaned: DataFrame,
    pub imputation: ImputationValues,
    pub scaling: Vec<ScalingParams>,
    pub fences: IqrFences,
    pub overview: DatasetOverview,
    pub visuals: Option<VisualSummary>,
    pub processing_steps: Vec<String>,
    pub summary: PreprocessingSummary,
}

impl PipelineOutput {
    /// Split into the `(full, cleaned)` table pair.
    pub fn into_tables(self) -> (DataFrame, DataFrame) {
        (self.full, self.cleaned)
    }
}

/// Human-readable summary of what the pipeline did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessingSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows loaded from the source.
    pub rows_loaded: usize,
    /// Number of rows kept by the outlier filter.
    pub rows_cleaned: usize,
    /// Number of rows dropped by the outlier filter.
    pub rows_removed: usize,

    /// Number of columns loaded from the source.
    pub columns_loaded: usize,
    /// Number of columns after standardization.
    pub columns_final: usize,

    /// Missing cells in the loaded table.
    pub missing_before: usize,
    /// Missing cells in the full output table.
    pub missing_after: usize,

    /// Per-column summaries of changes.
    pub column_summaries: Vec<ColumnSummary>,

    /// Warnings and notes generated during preprocessing.
    pub warnings: Vec<String>,
}

/// Summary of changes made to a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub original_dtype: Option<String>,
    pub final_dtype: String,
    pub missing_before: usize,
    pub missing_after: usize,
    /// Short description of what was applied (e.g. "mean imputation, z-score").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_canonical_order() {
        let names: Vec<&str> = TITANIC_SCHEMA.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names.join(","),
            "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked"
        );
    }

    #[test]
    fn test_column_kind_lookup() {
        assert_eq!(column_kind("Age"), Some(ColumnKind::Float));
        assert_eq!(column_kind("Ticket"), Some(ColumnKind::Text));
        assert_eq!(column_kind("Pclass"), Some(ColumnKind::Integer));
        assert_eq!(column_kind("Fare_standardized"), None);
    }

    #[test]
    fn test_standardized_name() {
        assert_eq!(standardized_name("Fare"), "Fare_standardized");
    }
}
