//! Report generation module.
//!
//! This module turns a finished pipeline run into a [`PreprocessingReport`]
//! and saves processed tables.
//!
//! The same report backs:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use titanic_prep::reporting::{OutputFormat, ReportGenerator};
//!
//! let generator = ReportGenerator::new("output");
//! let table = generator.save_table(&mut output.cleaned, "train_cleaned", OutputFormat::Csv)?;
//!
//! let report = ReportGenerator::build_report("data/train.csv", Some(&table), &output);
//! generator.write_report(&report, "train")?;
//! ```

mod generator;

pub use generator::{OutputFormat, PreprocessingReport, ReportGenerator};
