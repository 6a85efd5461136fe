//! Army Combat Fitness Test scoring.
//!
//! Raw event results are converted to points through age- and sex-specific standards
//! tables, and six event scores are summed into the overall test score.

pub mod config;
pub mod error;
pub mod scorecard;
pub mod scoring;
pub mod telemetry;
