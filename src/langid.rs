//! Binary language identification with a character n-gram linear model.
//!
//! A text is represented by the bag of its character 1-, 2- and 3-grams. The
//! score is the summed weight of those features divided by the square root of
//! their count, and a text belongs to the target language iff its score is
//! positive.

use crate::error::Result;
use crate::quality::duplicate::fraction;
use crate::resource::read_json_resource;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Longest n-gram used as a feature.
const MAX_NGRAM: usize = 3;

/// Immutable n-gram weight table.
#[derive(Debug, Clone, Default)]
pub struct LanguageModel {
    weights: HashMap<String, f64>,
}

impl LanguageModel {
    /// Creates a model from an n-gram → weight table.
    pub fn from_weights(weights: HashMap<String, f64>) -> Self {
        Self { weights }
    }

    /// Loads a model stored as a (optionally gzip-compressed) JSON object.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let weights: HashMap<String, f64> = read_json_resource(path)?;
        tracing::debug!(path = %path.display(), features = weights.len(), "loaded language model");
        Ok(Self { weights })
    }

    /// Number of n-grams with an explicit weight.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns true if the model has no weights.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight of a single feature; unknown features weigh zero.
    pub fn weight(&self, ngram: &str) -> f64 {
        self.weights.get(ngram).copied().unwrap_or(0.0)
    }

    /// Scores `text`. Returns `0.0` for an empty text.
    pub fn score(&self, text: &str) -> f64 {
        let chars: Vec<char> = text.chars().collect();
        let mut key = String::with_capacity(MAX_NGRAM * 4);
        let mut sum = 0.0;
        let mut count = 0usize;

        for n in 1..=MAX_NGRAM {
            for gram in chars.windows(n) {
                key.clear();
                key.extend(gram);
                sum += self.weight(&key);
                count += 1;
            }
        }

        if count == 0 {
            0.0
        } else {
            sum / (count as f64).sqrt()
        }
    }

    /// Returns true if `text` is classified as the target language.
    pub fn is_target(&self, text: &str) -> bool {
        self.score(text) > 0.0
    }
}

/// Running confusion counts for evaluating the identifier against gold labels.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    num_total: usize,
    num_correct: usize,
    num_true_positive: usize,
    num_gold_positive: usize,
    num_model_positive: usize,
    num_letters: usize,
}

/// Final evaluation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub num_correct: usize,
    pub num_total: usize,
    pub accuracy: f64,
    pub num_true_positive: usize,
    pub num_gold_positive: usize,
    pub num_model_positive: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub elapsed: f64,
    pub num_letters: usize,
    pub throughput_letter_per_second: f64,
}

impl Evaluation {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one prediction. Returns true if it matched the gold label.
    pub fn record(&mut self, gold: bool, predicted: bool, letters: usize) -> bool {
        self.num_total += 1;
        self.num_letters += letters;
        if gold {
            self.num_gold_positive += 1;
        }
        if predicted {
            self.num_model_positive += 1;
        }
        if gold && predicted {
            self.num_true_positive += 1;
        }
        let correct = gold == predicted;
        if correct {
            self.num_correct += 1;
        }
        correct
    }

    /// Produces the report for a run that took `elapsed`.
    pub fn summary(&self, elapsed: Duration) -> EvaluationSummary {
        let precision = fraction(self.num_true_positive, self.num_model_positive);
        let recall = fraction(self.num_true_positive, self.num_gold_positive);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let seconds = elapsed.as_secs_f64();
        let throughput = if seconds > 0.0 {
            self.num_letters as f64 / seconds
        } else {
            0.0
        };

        EvaluationSummary {
            num_correct: self.num_correct,
            num_total: self.num_total,
            accuracy: fraction(self.num_correct, self.num_total),
            num_true_positive: self.num_true_positive,
            num_gold_positive: self.num_gold_positive,
            num_model_positive: self.num_model_positive,
            precision,
            recall,
            f1,
            elapsed: seconds,
            num_letters: self.num_letters,
            throughput_letter_per_second: throughput,
        }
    }
}
