//! Accept/reject decision over [`QualityMetrics`].

use super::metrics::QualityMetrics;
use serde::{Deserialize, Serialize};

/// Threshold table for the quality gate.
///
/// Every comparison is strict: a value equal to its bound passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub min_letters: usize,
    pub max_duplicate_paragraph_fraction: f64,
    pub max_duplicate_sentence_fraction: f64,
    pub max_duplicate_paragraph_fraction_in_character: f64,
    pub max_duplicate_sentence_fraction_in_character: f64,
    /// Bounds for `top_{2,3,4}gram_character_fraction`.
    pub max_top_ngram_fraction: [f64; 3],
    /// Bounds for `duplicate_{5..=10}gram_character_fraction`.
    pub max_duplicate_ngram_fraction: [f64; 6],
    pub min_hiragana_fraction: f64,
    pub max_katakana_fraction: f64,
    pub min_japanese_fraction: f64,
    pub min_japanese_letters: usize,
    pub min_avg_sentence_length: f64,
    pub max_avg_sentence_length: f64,
    pub max_sentence_length: usize,
    pub max_ellipsis_fraction: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self::v1()
    }
}

/// The first threshold a document violated.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Name of the offending metric.
    pub field: &'static str,
    /// Observed value.
    pub value: f64,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

impl QualityThresholds {
    /// The production threshold table.
    pub fn v1() -> Self {
        Self {
            min_letters: 400,
            max_duplicate_paragraph_fraction: 0.30,
            max_duplicate_sentence_fraction: 0.30,
            max_duplicate_paragraph_fraction_in_character: 0.20,
            max_duplicate_sentence_fraction_in_character: 0.20,
            max_top_ngram_fraction: [0.20, 0.18, 0.16],
            max_duplicate_ngram_fraction: [0.15, 0.14, 0.13, 0.12, 0.11, 0.10],
            min_hiragana_fraction: 0.2,
            max_katakana_fraction: 0.5,
            min_japanese_fraction: 0.5,
            min_japanese_letters: 400,
            min_avg_sentence_length: 20.0,
            max_avg_sentence_length: 90.0,
            max_sentence_length: 200,
            max_ellipsis_fraction: 0.2,
        }
    }

    /// Returns true when every threshold passes.
    pub fn accepts(&self, m: &QualityMetrics) -> bool {
        self.check(m).is_none()
    }

    /// Returns the first violated threshold, or `None` if the document is accepted.
    pub fn check(&self, m: &QualityMetrics) -> Option<Rejection> {
        let reject = |field: &'static str, value: f64| Some(Rejection { field, value });

        if m.num_letters < self.min_letters {
            return reject("num_letters", m.num_letters as f64);
        }
        if m.duplicate_paragraph_fraction > self.max_duplicate_paragraph_fraction {
            return reject("duplicate_paragraph_fraction", m.duplicate_paragraph_fraction);
        }
        if m.duplicate_sentence_fraction > self.max_duplicate_sentence_fraction {
            return reject("duplicate_sentence_fraction", m.duplicate_sentence_fraction);
        }
        if m.duplicate_paragraph_fraction_in_character
            > self.max_duplicate_paragraph_fraction_in_character
        {
            return reject(
                "duplicate_paragraph_fraction_in_character",
                m.duplicate_paragraph_fraction_in_character,
            );
        }
        if m.duplicate_sentence_fraction_in_character
            > self.max_duplicate_sentence_fraction_in_character
        {
            return reject(
                "duplicate_sentence_fraction_in_character",
                m.duplicate_sentence_fraction_in_character,
            );
        }

        let top = [
            ("top_2gram_character_fraction", m.top_2gram_character_fraction),
            ("top_3gram_character_fraction", m.top_3gram_character_fraction),
            ("top_4gram_character_fraction", m.top_4gram_character_fraction),
        ];
        for ((field, value), bound) in top.into_iter().zip(self.max_top_ngram_fraction) {
            if value > bound {
                return reject(field, value);
            }
        }

        let dup = [
            ("duplicate_5gram_character_fraction", m.duplicate_5gram_character_fraction),
            ("duplicate_6gram_character_fraction", m.duplicate_6gram_character_fraction),
            ("duplicate_7gram_character_fraction", m.duplicate_7gram_character_fraction),
            ("duplicate_8gram_character_fraction", m.duplicate_8gram_character_fraction),
            ("duplicate_9gram_character_fraction", m.duplicate_9gram_character_fraction),
            ("duplicate_10gram_character_fraction", m.duplicate_10gram_character_fraction),
        ];
        for ((field, value), bound) in dup.into_iter().zip(self.max_duplicate_ngram_fraction) {
            if value > bound {
                return reject(field, value);
            }
        }

        if m.hiragana_fraction < self.min_hiragana_fraction {
            return reject("hiragana_fraction", m.hiragana_fraction);
        }
        if m.katakana_fraction > self.max_katakana_fraction {
            return reject("katakana_fraction", m.katakana_fraction);
        }
        if m.japanese_fraction < self.min_japanese_fraction {
            return reject("japanese_fraction", m.japanese_fraction);
        }
        if m.num_japanese_letters < self.min_japanese_letters {
            return reject("num_japanese_letters", m.num_japanese_letters as f64);
        }
        if m.avg_sentence_length < self.min_avg_sentence_length
            || m.avg_sentence_length > self.max_avg_sentence_length
        {
            return reject("avg_sentence_length", m.avg_sentence_length);
        }
        if m.max_sentence_length > self.max_sentence_length {
            return reject("max_sentence_length", m.max_sentence_length as f64);
        }
        if m.ellipsis_fraction > self.max_ellipsis_fraction {
            return reject("ellipsis_fraction", m.ellipsis_fraction);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Metrics of a document that sits comfortably inside every bound.
    fn passing() -> QualityMetrics {
        QualityMetrics {
            num_letters: 1000,
            num_japanese_letters: 900,
            hiragana_fraction: 0.5,
            katakana_fraction: 0.1,
            japanese_fraction: 0.9,
            avg_sentence_length: 40.0,
            max_sentence_length: 120,
            ..Default::default()
        }
    }

    #[test]
    fn test_passing_document() {
        assert!(QualityThresholds::v1().accepts(&passing()));
    }

    #[test]
    fn test_boundaries_are_strict() {
        let gate = QualityThresholds::v1();
        let m = QualityMetrics {
            num_letters: 400,
            num_japanese_letters: 400,
            duplicate_paragraph_fraction: 0.30,
            top_2gram_character_fraction: 0.20,
            duplicate_10gram_character_fraction: 0.10,
            hiragana_fraction: 0.2,
            katakana_fraction: 0.5,
            japanese_fraction: 0.5,
            avg_sentence_length: 90.0,
            max_sentence_length: 200,
            ellipsis_fraction: 0.2,
            ..Default::default()
        };
        assert_eq!(gate.check(&m), None);
    }

    #[test]
    fn test_each_violation_rejects() {
        let gate = QualityThresholds::v1();
        let cases: [(&str, fn(&mut QualityMetrics)); 11] = [
            ("num_letters", |m: &mut QualityMetrics| m.num_letters = 399),
            ("duplicate_sentence_fraction", |m: &mut QualityMetrics| {
                m.duplicate_sentence_fraction = 0.31
            }),
            ("top_3gram_character_fraction", |m: &mut QualityMetrics| {
                m.top_3gram_character_fraction = 0.19
            }),
            ("duplicate_7gram_character_fraction", |m: &mut QualityMetrics| {
                m.duplicate_7gram_character_fraction = 0.131
            }),
            ("hiragana_fraction", |m: &mut QualityMetrics| m.hiragana_fraction = 0.19),
            ("katakana_fraction", |m: &mut QualityMetrics| m.katakana_fraction = 0.51),
            ("num_japanese_letters", |m: &mut QualityMetrics| m.num_japanese_letters = 10),
            ("avg_sentence_length", |m: &mut QualityMetrics| m.avg_sentence_length = 19.9),
            ("avg_sentence_length", |m: &mut QualityMetrics| m.avg_sentence_length = 90.1),
            ("max_sentence_length", |m: &mut QualityMetrics| m.max_sentence_length = 201),
            ("ellipsis_fraction", |m: &mut QualityMetrics| m.ellipsis_fraction = 0.25),
        ];

        for (field, mutate) in cases {
            let mut m = passing();
            mutate(&mut m);
            let rejection = gate.check(&m).expect("should reject");
            assert_eq!(rejection.field, field);
        }
    }

    #[test]
    fn test_first_violation_wins() {
        let mut m = passing();
        m.num_letters = 0;
        m.ellipsis_fraction = 1.0;
        assert_eq!(
            QualityThresholds::v1().check(&m).map(|r| r.field),
            Some("num_letters")
        );
    }

    #[test]
    fn test_short_text_rejected() {
        let m = QualityMetrics::compute("短い文章です。");
        assert!(!QualityThresholds::v1().accepts(&m));
    }

    #[test]
    fn test_thresholds_partial_override_from_json() {
        let t: QualityThresholds = serde_json::from_str(r#"{"min_letters": 10}"#).unwrap();
        assert_eq!(t.min_letters, 10);
        assert_eq!(t.max_ellipsis_fraction, 0.2);
    }
}
