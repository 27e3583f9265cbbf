//! Pipeline module.
//!
//! This module provides the main preprocessing pipeline, its typed stage
//! frames, the outlier filter and progress reporting.

mod builder;
pub mod frames;
pub mod outliers;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use frames::{EncodedFrame, ImputedFrame, LoadedFrame, StandardizedFrame};
pub use outliers::{IqrFences, OutlierHandler};
pub use progress::{ClosureProgressReporter, PreprocessingStage, ProgressReporter, ProgressUpdate};
