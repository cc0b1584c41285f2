//! Paragraph and sentence segmentation.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// A sentence needs at least one non-terminator character, so a terminator
// directly following another one is not part of any sentence.
static RE_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^。．！？!?]+[。．！？!?]?").unwrap());

/// A document split into paragraphs and sentences.
#[derive(Debug, Clone, Default)]
pub struct Segmentation<'a> {
    /// One entry per `\n`-separated line, rebuilt from its sentences.
    pub paragraphs: Vec<Cow<'a, str>>,
    /// All sentences of all paragraphs, in document order.
    pub sentences: Vec<&'a str>,
}

impl<'a> Segmentation<'a> {
    /// Segments `text` into paragraphs and sentences.
    pub fn new(text: &'a str) -> Self {
        let mut paragraphs = Vec::new();
        let mut sentences = Vec::new();

        for line in text.split('\n') {
            let first = sentences.len();
            sentences.extend(split_sentences(line));
            paragraphs.push(rebuild_paragraph(line, &sentences[first..]));
        }

        Self {
            paragraphs,
            sentences,
        }
    }

    /// Number of paragraphs (always at least one).
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Number of sentences.
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }
}

/// Splits a single paragraph into sentences.
pub fn split_sentences(paragraph: &str) -> impl Iterator<Item = &str> {
    RE_SENTENCE.find_iter(paragraph).map(|m| m.as_str())
}

/// Concatenates a paragraph's sentences, borrowing the line when nothing was dropped.
fn rebuild_paragraph<'a>(line: &'a str, sentences: &[&'a str]) -> Cow<'a, str> {
    let covered: usize = sentences.iter().map(|s| s.len()).sum();
    if covered == line.len() {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(sentences.concat())
    }
}
