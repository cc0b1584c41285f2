//! Filter outputs attached to a record.

use crate::ngword::NgWordStats;
use crate::quality::QualityMetrics;
use serde::{Deserialize, Serialize};

/// The `info` object of an annotated record.
///
/// `quality` is always present. The other members only appear when the
/// corresponding resource was configured (and, for `url`, when the record
/// has a URL).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub quality: QualityMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ngword: Option<NgWordStats>,
    /// True if the source domain is allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<bool>,
    /// Language identification score; positive means Japanese.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nanigo: Option<f64>,
}

impl Annotation {
    /// Creates an annotation carrying only quality metrics.
    pub fn new(quality: QualityMetrics) -> Self {
        Self {
            quality,
            ..Self::default()
        }
    }
}
