//! Duplicate-content analysis.
//!
//! Two distinct policies live here and must not be conflated:
//!
//! - [`top_ngram_fraction`] is occurrence-weighted: the share of all n-gram
//!   occurrences taken by the single most frequent n-gram.
//! - [`duplicate_ngram_fraction`] is type-weighted: the share of distinct
//!   n-grams that occur more than once.

use std::collections::HashMap;

/// Divides, returning `0.0` when the denominator is zero.
pub(crate) fn fraction(numerator: usize, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// Duplicate totals of a sequence of strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateCounts {
    /// Σ(freq − 1) over distinct strings.
    pub items: usize,
    /// Σ len·(freq − 1) over distinct strings, in characters.
    pub letters: usize,
}

/// Counts repeated entries by exact string equality.
pub fn count_duplicates<S: AsRef<str>>(items: &[S]) -> DuplicateCounts {
    let mut freq: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    for item in items {
        *freq.entry(item.as_ref()).or_insert(0) += 1;
    }

    freq.into_iter()
        .fold(DuplicateCounts::default(), |mut acc, (s, f)| {
            acc.items += f - 1;
            acc.letters += s.chars().count() * (f - 1);
            acc
        })
}

/// Occurrence counts of the overlapping `n`-grams of `chars`.
fn ngram_counts(chars: &[char], n: usize) -> HashMap<&[char], usize> {
    let mut counts = HashMap::new();
    if n == 0 {
        return counts;
    }
    for gram in chars.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

/// Frequency of the most common `n`-gram divided by the number of `n`-gram occurrences.
pub fn top_ngram_fraction(chars: &[char], n: usize) -> f64 {
    let counts = ngram_counts(chars, n);
    let top = counts.values().copied().max().unwrap_or(0);
    let total: usize = counts.values().sum();
    fraction(top, total)
}

/// Number of distinct `n`-grams seen more than once divided by the number of distinct `n`-grams.
pub fn duplicate_ngram_fraction(chars: &[char], n: usize) -> f64 {
    let counts = ngram_counts(chars, n);
    let repeated = counts.values().filter(|&&f| f > 1).count();
    fraction(repeated, counts.len())
}
