//! Document statistics and the quality gate.
//!
//! [`QualityMetrics::compute`] derives duplication, script and sentence-length
//! statistics from a text; [`QualityThresholds`] turns them into an
//! accept/reject decision.

pub mod duplicate;
mod gate;
mod metrics;
pub mod script;
pub mod segment;

pub use gate::{QualityThresholds, Rejection};
pub use metrics::QualityMetrics;
pub use segment::Segmentation;
