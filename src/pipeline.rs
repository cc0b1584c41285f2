//! Per-record filtering pipeline.
//!
//! A [`Pipeline`] owns the shared read-only resources and runs every
//! configured component over a record:
//!
//! 1. quality metrics (always),
//! 2. NG-word statistics, relative to the document's Japanese-letter count,
//! 3. the domain blocklist, when the record has a URL,
//! 4. the language identifier.
//!
//! The results are merged into an [`Annotation`]; [`Pipeline::accepts`]
//! applies the configured gates to it.

use crate::blocklist::{BlocklistPolicy, DomainBlocklist, DomainBlocklistChecker};
use crate::error::Result;
use crate::footer::{trim_footer, FooterOptions};
use crate::langid::LanguageModel;
use crate::model::{Annotation, Record};
use crate::ngword::{NgWordDictionary, NgWordMatcher, DEFAULT_MAX_NG_FRACTION};
use crate::punctuation;
use crate::quality::{QualityMetrics, QualityThresholds};
use crate::resource::read_json_resource;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Quality gate thresholds.
    pub quality: QualityThresholds,

    /// Upper bound (exclusive) on `ng_fraction`.
    pub max_ng_fraction: f64,

    /// Which domain categories block a record.
    pub blocklist: BlocklistPolicy,

    /// Footer trimming used by [`Pipeline::modify`].
    pub footer: FooterOptions,

    /// Whether batches are annotated on the rayon thread pool.
    pub parallel: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            quality: QualityThresholds::v1(),
            max_ng_fraction: DEFAULT_MAX_NG_FRACTION,
            blocklist: BlocklistPolicy::default(),
            footer: FooterOptions::default(),
            parallel: true,
        }
    }
}

impl PipelineOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads options from a JSON file; missing members keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_json_resource(path)
    }

    pub fn with_quality(mut self, quality: QualityThresholds) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_max_ng_fraction(mut self, max: f64) -> Self {
        self.max_ng_fraction = max;
        self
    }

    pub fn with_blocklist_policy(mut self, policy: BlocklistPolicy) -> Self {
        self.blocklist = policy;
        self
    }

    pub fn with_footer(mut self, footer: FooterOptions) -> Self {
        self.footer = footer;
        self
    }

    /// Disables parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Shared resources plus options. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
    ngword: Option<Arc<NgWordDictionary>>,
    blocklist: Option<Arc<DomainBlocklist>>,
    language_model: Option<Arc<LanguageModel>>,
}

impl Pipeline {
    /// Creates a pipeline with no optional resources.
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_ngword(mut self, dictionary: impl Into<Arc<NgWordDictionary>>) -> Self {
        self.ngword = Some(dictionary.into());
        self
    }

    pub fn with_blocklist(mut self, blocklist: impl Into<Arc<DomainBlocklist>>) -> Self {
        self.blocklist = Some(blocklist.into());
        self
    }

    pub fn with_language_model(mut self, model: impl Into<Arc<LanguageModel>>) -> Self {
        self.language_model = Some(model.into());
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs every configured component over `record`.
    ///
    /// A URL without an extractable host is reported as blocked.
    pub fn annotate(&self, record: &Record) -> Annotation {
        let quality = QualityMetrics::compute(&record.text);

        let ngword = self.ngword.as_deref().map(|dictionary| {
            NgWordMatcher::new(dictionary).stats(&record.text, quality.num_japanese_letters)
        });

        let url = match (self.blocklist.as_deref(), record.url.as_deref()) {
            (Some(blocklist), Some(url)) => {
                let checker = DomainBlocklistChecker::new(blocklist, &self.options.blocklist);
                Some(checker.check(url).unwrap_or_else(|e| {
                    tracing::warn!(url, error = %e, "treating malformed URL as blocked");
                    false
                }))
            }
            _ => None,
        };

        let nanigo = self
            .language_model
            .as_deref()
            .map(|model| model.score(&record.text));

        Annotation {
            quality,
            ngword,
            url,
            nanigo,
        }
    }

    /// Returns true if `annotation` passes every gate it has data for.
    pub fn accepts(&self, annotation: &Annotation) -> bool {
        if let Some(rejection) = self.options.quality.check(&annotation.quality) {
            tracing::debug!(%rejection, "rejected by quality gate");
            return false;
        }
        if let Some(stats) = &annotation.ngword {
            if !stats.accepts(self.options.max_ng_fraction) {
                tracing::debug!(ng_fraction = stats.ng_fraction, "rejected by NG words");
                return false;
            }
        }
        if annotation.url == Some(false) {
            tracing::debug!("rejected by domain blocklist");
            return false;
        }
        if let Some(score) = annotation.nanigo {
            if score <= 0.0 {
                tracing::debug!(score, "rejected by language identifier");
                return false;
            }
        }
        true
    }

    /// Normalizes punctuation and trims the footer of `text`.
    pub fn modify(&self, text: &str) -> String {
        let normalized = punctuation::normalize(text);
        trim_footer(&normalized.text, &self.options.footer)
    }

    /// Annotates `records`, in input order.
    pub fn annotate_batch(&self, records: &[Record]) -> Vec<Annotation> {
        if self.options.parallel {
            records.par_iter().map(|r| self.annotate(r)).collect()
        } else {
            records.iter().map(|r| self.annotate(r)).collect()
        }
    }

    /// Parses JSON lines and attaches their annotation, in input order.
    ///
    /// Each element is the annotated record and whether it was accepted, or
    /// the error for a line that is not a valid record.
    pub fn process_lines<S>(&self, lines: &[S]) -> Vec<Result<(Record, bool)>>
    where
        S: AsRef<str> + Sync,
    {
        let process = |line: &S| -> Result<(Record, bool)> {
            let mut record = Record::from_json_line(line.as_ref())?;
            let annotation = self.annotate(&record);
            let accepted = self.accepts(&annotation);
            record.set_info(&annotation)?;
            Ok((record, accepted))
        };
        if self.options.parallel {
            lines.par_iter().map(process).collect()
        } else {
            lines.iter().map(process).collect()
        }
    }
}
