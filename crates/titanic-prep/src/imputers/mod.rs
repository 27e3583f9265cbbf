//! Missing value imputation.
//!
//! - `Age` is filled with the mean of its non-null values
//! - `Embarked` is filled with its mode (ties -> lexicographically smallest)
//! - `Cabin` is filled with a constant marker (default `"Unknown"`)

mod statistical;

pub use statistical::StatisticalImputer;

use crate::config::PipelineConfig;
use crate::error::{Result, ResultExt};
use crate::pipeline::frames::{ImputedFrame, LoadedFrame};
use crate::types::columns;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Fill values chosen by the imputation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationValues {
    pub age_mean: f64,
    pub embarked_mode: String,
    pub cabin_fill: String,
}

/// Run the imputation stage.
pub fn impute(
    frame: LoadedFrame,
    config: &PipelineConfig,
    processing_steps: &mut Vec<String>,
) -> Result<(ImputedFrame, ImputationValues)> {
    let mut df = frame.into_inner();

    let age_mean = StatisticalImputer::apply_numeric_mean(&mut df, columns::AGE, processing_steps)
        .context("Imputing Age")?;
    let embarked_mode =
        StatisticalImputer::apply_mode_imputation(&mut df, columns::EMBARKED, processing_steps)
            .context("Imputing Embarked")?;
    StatisticalImputer::apply_constant_imputation(
        &mut df,
        columns::CABIN,
        &config.cabin_fill_value,
        processing_steps,
    )
    .context("Imputing Cabin")?;

    info!(
        "Imputation complete: Age={:.2}, Embarked='{}', Cabin='{}'",
        age_mean, embarked_mode, config.cabin_fill_value
    );

    Ok((
        ImputedFrame::new(df),
        ImputationValues {
            age_mean,
            embarked_mode,
            cabin_fill: config.cabin_fill_value.clone(),
        },
    ))
}
