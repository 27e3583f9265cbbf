//! CSV loading and schema normalization.
//!
//! Text and float columns are read with their canonical dtype fixed up front,
//! so a text `Ticket` far down the file cannot break an integer guess made from
//! the first rows. Integer columns are still inferred and every expected column
//! is cast to its canonical dtype right after reading.

use crate::error::{PreprocessingError, Result, ResultExt};
use crate::pipeline::frames::LoadedFrame;
use crate::types::{ColumnKind, TITANIC_SCHEMA};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Rows used for schema inference before casting.
const INFER_SCHEMA_ROWS: usize = 1000;

/// Read a Titanic CSV export from disk.
///
/// Fails with [`PreprocessingError::FileNotFound`] if the path does not exist
/// and with [`PreprocessingError::ColumnNotFound`] if the header lacks an
/// expected column.
pub fn load_csv(path: impl AsRef<Path>) -> Result<LoadedFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PreprocessingError::FileNotFound(path.to_path_buf()));
    }

    info!("Loading dataset from: {}", path.display());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_schema_overwrite(Some(Arc::new(fixed_dtypes())))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;

    let frame = normalize_schema(df)?;
    info!("Dataset loaded successfully: {:?}", frame.as_df().shape());
    Ok(frame)
}

/// Dtypes that must not be left to inference.
///
/// Only a subset of the columns is listed. A full-width schema would make the
/// reader rename headers by position.
fn fixed_dtypes() -> Schema {
    TITANIC_SCHEMA
        .iter()
        .filter(|(_, kind)| !matches!(kind, ColumnKind::Integer))
        .map(|(name, kind)| Field::new((*name).into(), kind.dtype()))
        .collect()
}

/// Validate that every expected column is present and cast it to its
/// canonical dtype. Extra columns are kept unchanged.
pub fn normalize_schema(mut df: DataFrame) -> Result<LoadedFrame> {
    for (name, kind) in TITANIC_SCHEMA {
        let column = df
            .column(name)
            .map_err(|_| PreprocessingError::ColumnNotFound(name.to_string()))?;

        let target = kind.dtype();
        if column.dtype() == &target {
            continue;
        }

        debug!("Casting '{}' from {} to {}", name, column.dtype(), target);
        // Strict cast: a value that cannot be represented is an error, not a null.
        let casted = column
            .as_materialized_series()
            .strict_cast(&target)
            .context(format!("Column '{}' does not hold {} values", name, target))?;
        df.replace(name, casted)?;
    }

    Ok(LoadedFrame::new(df))
}
