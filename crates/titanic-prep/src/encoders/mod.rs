//! Categorical encoding.
//!
//! Converts the text columns used downstream into integer codes:
//!
//! | Column | Encoding |
//! |---|---|
//! | `Sex` | male -> 1, female -> 0 |
//! | `Embarked` | S -> 0, C -> 1, Q -> 2 |
//! | `Cabin` | cabin fill marker -> 0, anything else -> 1 |
//! | `Ticket` | all decimal digits -> 1, otherwise 0 |

mod categorical;

pub use categorical::{CategoricalEncoder, EMBARKED_CODES, SEX_CODES, is_numeric_ticket};

use crate::config::PipelineConfig;
use crate::error::{PreprocessingError, Result};
use crate::pipeline::frames::{EncodedFrame, ImputedFrame};
use crate::types::columns;
use categorical::ENCODED_COLUMNS;
use polars::prelude::*;
use tracing::{debug, info};

/// Run the encoding stage.
pub fn encode(
    frame: ImputedFrame,
    config: &PipelineConfig,
    processing_steps: &mut Vec<String>,
) -> Result<EncodedFrame> {
    let mut df = frame.into_inner();

    for col_name in ENCODED_COLUMNS {
        let series = df
            .column(col_name)
            .map_err(|_| PreprocessingError::ColumnNotFound(col_name.to_string()))?
            .as_materialized_series();

        let encoded = match col_name {
            columns::SEX => CategoricalEncoder::encode_sex(series),
            columns::EMBARKED => CategoricalEncoder::encode_embarked(series),
            columns::CABIN => CategoricalEncoder::encode_cabin(series, &config.cabin_fill_value),
            columns::TICKET => CategoricalEncoder::encode_ticket(series),
            _ => unreachable!("no encoder registered for '{}'", col_name),
        }?;

        let positives = encoded.i64()?.into_iter().flatten().filter(|v| *v > 0).count();
        df.replace(col_name, encoded)?;

        processing_steps.push(format!(
            "Encoded '{}' as integer codes ({} non-zero)",
            col_name, positives
        ));
        debug!("Encoded '{}'", col_name);
    }

    info!("Encoded {} categorical columns", ENCODED_COLUMNS.len());
    Ok(EncodedFrame::new(df))
}
