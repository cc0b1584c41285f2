//! NG-word scanning.
//!
//! The matcher walks the text left to right. At each position it asks the
//! dictionary for every entry that prefixes the remaining text, takes the
//! longest one and jumps past it; otherwise it advances one character. Matches
//! therefore never overlap.

mod dictionary;

pub use dictionary::NgWordDictionary;

use crate::quality::duplicate::fraction;
use serde::{Deserialize, Serialize};

/// Default upper bound (exclusive) on `ng_fraction`.
pub const DEFAULT_MAX_NG_FRACTION: f64 = 0.05;

/// A dictionary hit, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NgMatch {
    pub start: usize,
    pub len: usize,
}

/// NG-word statistics of one document (`info.ngword`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NgWordStats {
    pub num_ng_letters: usize,
    pub ng_fraction: f64,
}

impl NgWordStats {
    /// Returns true when `ng_fraction` is strictly below `max_fraction`.
    pub fn accepts(&self, max_fraction: f64) -> bool {
        self.ng_fraction < max_fraction
    }
}

/// Longest-match scanner over a borrowed dictionary.
#[derive(Debug, Clone, Copy)]
pub struct NgWordMatcher<'d> {
    dictionary: &'d NgWordDictionary,
}

impl<'d> NgWordMatcher<'d> {
    pub fn new(dictionary: &'d NgWordDictionary) -> Self {
        Self { dictionary }
    }

    /// Returns the non-overlapping longest matches in `text`.
    pub fn find_all(&self, text: &str) -> Vec<NgMatch> {
        let chars: Vec<char> = text.chars().collect();
        let mut matches = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match self.dictionary.longest_prefix(&chars[i..]) {
                Some(len) => {
                    matches.push(NgMatch { start: i, len });
                    i += len;
                }
                None => i += 1,
            }
        }
        matches
    }

    /// Counts NG letters in `text` relative to `reference_length`
    /// (normally the document's Japanese-letter count).
    pub fn stats(&self, text: &str, reference_length: usize) -> NgWordStats {
        let num_ng_letters = self.find_all(text).iter().map(|m| m.len).sum();
        NgWordStats {
            num_ng_letters,
            ng_fraction: fraction(num_ng_letters, reference_length),
        }
    }
}
