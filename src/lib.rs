//! # jaclean
//!
//! Quality and content-safety filtering for Japanese web corpora.
//!
//! Every document is judged independently against read-only resources:
//!
//! - **Quality**: duplication, script composition and sentence-length
//!   statistics, checked by a threshold gate
//! - **NG words**: longest-match scan against a compiled dictionary
//! - **Domain blocklist**: host categories of the source URL
//! - **Language identification**: character n-gram linear model
//!
//! Two cheap text transforms, punctuation normalization and footer trimming,
//! clean documents before they are judged.
//!
//! ## Quick Start
//!
//! ```no_run
//! use jaclean::{NgWordDictionary, Pipeline, PipelineOptions, Record};
//!
//! fn main() -> jaclean::Result<()> {
//!     let pipeline = Pipeline::new(PipelineOptions::default())
//!         .with_ngword(NgWordDictionary::load("ngword.dic")?);
//!
//!     let record = Record::from_json_line(r#"{"text": "吾輩は猫である。"}"#)?;
//!     let annotation = pipeline.annotate(&record);
//!     println!("accepted: {}", pipeline.accepts(&annotation));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `async`: Async resource loading and batch annotation with Tokio

pub mod blocklist;
pub mod error;
pub mod footer;
pub mod langid;
pub mod model;
pub mod ngword;
pub mod pipeline;
pub mod punctuation;
pub mod quality;
pub mod resource;

#[cfg(feature = "async")]
pub mod async_api;

// Re-exports
pub use blocklist::{BlocklistPolicy, DomainBlocklist, DomainBlocklistChecker};
pub use error::{Error, Result};
pub use footer::{trim_footer, FooterOptions};
pub use langid::{Evaluation, EvaluationSummary, LanguageModel};
pub use model::{Annotation, Record};
pub use ngword::{NgWordDictionary, NgWordMatcher, NgWordStats};
pub use pipeline::{Pipeline, PipelineOptions};
pub use punctuation::{normalize, Normalized};
pub use quality::{QualityMetrics, QualityThresholds, Rejection};

/// Computes the quality metrics of `text`.
///
/// # Example
///
/// ```
/// let metrics = jaclean::quality_metrics("吾輩は猫である。名前はまだ無い。");
/// assert_eq!(metrics.num_kuten, 2);
/// ```
pub fn quality_metrics(text: &str) -> QualityMetrics {
    QualityMetrics::compute(text)
}

/// Returns true if `text` passes the production quality gate.
pub fn passes_quality(text: &str) -> bool {
    QualityThresholds::v1().accepts(&QualityMetrics::compute(text))
}

/// Normalizes punctuation and trims the footer with default settings.
///
/// # Example
///
/// ```
/// let text = jaclean::clean_text("本文です．\nプライバシーポリシー");
/// assert_eq!(text, "本文です。");
/// ```
pub fn clean_text(text: &str) -> String {
    let normalized = normalize(text);
    trim_footer(&normalized.text, &FooterOptions::default())
}
