//! Unit economics of taxi trips: loads trip-record files, keeps the valid
//! trips, derives cost per minute and cost per mile, and reports their
//! distribution per rate code as a text table and a box-plot PNG.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod stats;
pub mod summary;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use pipeline::{run, RunReport};
