//! Shared utilities for the preprocessing pipeline.
//!
//! This module contains the small series helpers used by more than one stage.

use polars::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds text.
#[inline]
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(_, _))
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// Collect the non-null values of a numeric Series as `f64`.
///
/// NaN values are kept; only nulls are dropped.
pub fn non_null_f64(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().flatten().collect())
}

/// Calculate the mode (most frequent value) of a string Series.
///
/// Ties are broken by picking the lexicographically smallest value, so the
/// result does not depend on row order or hashing.
pub fn string_mode(series: &Series) -> Option<String> {
    let str_series = series.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut value_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    // BTreeMap iterates in ascending key order; keep the first maximum.
    let mut best: Option<(&str, usize)> = None;
    for (val, count) in value_counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((val, count));
        }
    }

    best.map(|(val, _)| val.to_string())
}

/// Total number of null cells across all columns.
pub fn total_null_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let filled: Vec<f64> = float_series
        .f64()?
        .into_iter()
        .map(|val| val.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.cast(&DataType::String)?;
    let filled: Vec<&str> = str_series
        .str()?
        .into_iter()
        .map(|val| val.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Render the first `n` rows of a DataFrame as strings, one `Vec` per row.
///
/// Nulls are rendered as `"null"`.
pub fn head_rows(df: &DataFrame, n: usize) -> Vec<Vec<String>> {
    let rows = n.min(df.height());
    (0..rows)
        .map(|row| {
            df.get_columns()
                .iter()
                .map(|col| match col.get(row) {
                    Ok(AnyValue::Null) => "null".to_string(),
                    Ok(AnyValue::String(s)) => s.to_string(),
                    Ok(val) => format!("{}", val),
                    Err(_) => "?".to_string(),
                })
                .collect()
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
