//! The per-document quality metrics record.

use super::duplicate::{count_duplicates, duplicate_ngram_fraction, fraction, top_ngram_fraction};
use super::script::ScriptCounts;
use super::segment::Segmentation;
use serde::{Deserialize, Serialize};

/// Quality statistics of one document.
///
/// Field names are the JSON keys of the `info.quality` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub duplicate_paragraph_fraction: f64,
    pub duplicate_paragraph_fraction_in_character: f64,
    pub duplicate_sentence_fraction: f64,
    pub duplicate_sentence_fraction_in_character: f64,
    pub top_2gram_character_fraction: f64,
    pub top_3gram_character_fraction: f64,
    pub top_4gram_character_fraction: f64,
    pub duplicate_5gram_character_fraction: f64,
    pub duplicate_6gram_character_fraction: f64,
    pub duplicate_7gram_character_fraction: f64,
    pub duplicate_8gram_character_fraction: f64,
    pub duplicate_9gram_character_fraction: f64,
    pub duplicate_10gram_character_fraction: f64,
    pub num_letters: usize,
    pub num_hiragana_letters: usize,
    pub num_katakana_letters: usize,
    pub num_kanji_letters: usize,
    pub num_kuten: usize,
    pub num_toten: usize,
    pub num_japanese_letters: usize,
    pub hiragana_fraction: f64,
    pub katakana_fraction: f64,
    pub kanji_fraction: f64,
    pub kuten_fraction: f64,
    pub toten_fraction: f64,
    pub japanese_fraction: f64,
    pub avg_sentence_length: f64,
    pub max_sentence_length: usize,
    pub num_sentences_ending_with_ellipsis: usize,
    pub ellipsis_fraction: f64,
}

impl QualityMetrics {
    /// Computes all metrics of `text`.
    pub fn compute(text: &str) -> Self {
        let seg = Segmentation::new(text);
        let chars: Vec<char> = text.chars().collect();
        let mut m = Self::default();

        m.fill_duplicates(&seg, &chars);
        m.fill_scripts(text, chars.len());
        m.fill_sentences(&seg);
        m
    }

    fn fill_duplicates(&mut self, seg: &Segmentation<'_>, chars: &[char]) {
        let paragraphs = count_duplicates(&seg.paragraphs);
        let paragraph_letters: usize = seg.paragraphs.iter().map(|p| p.chars().count()).sum();
        self.duplicate_paragraph_fraction = fraction(paragraphs.items, seg.paragraph_count());
        self.duplicate_paragraph_fraction_in_character =
            fraction(paragraphs.letters, paragraph_letters);

        let sentences = count_duplicates(&seg.sentences);
        let sentence_letters: usize = seg.sentences.iter().map(|s| s.chars().count()).sum();
        self.duplicate_sentence_fraction = fraction(sentences.items, seg.sentence_count());
        self.duplicate_sentence_fraction_in_character =
            fraction(sentences.letters, sentence_letters);

        self.top_2gram_character_fraction = top_ngram_fraction(chars, 2);
        self.top_3gram_character_fraction = top_ngram_fraction(chars, 3);
        self.top_4gram_character_fraction = top_ngram_fraction(chars, 4);

        self.duplicate_5gram_character_fraction = duplicate_ngram_fraction(chars, 5);
        self.duplicate_6gram_character_fraction = duplicate_ngram_fraction(chars, 6);
        self.duplicate_7gram_character_fraction = duplicate_ngram_fraction(chars, 7);
        self.duplicate_8gram_character_fraction = duplicate_ngram_fraction(chars, 8);
        self.duplicate_9gram_character_fraction = duplicate_ngram_fraction(chars, 9);
        self.duplicate_10gram_character_fraction = duplicate_ngram_fraction(chars, 10);
    }

    fn fill_scripts(&mut self, text: &str, num_letters: usize) {
        let counts = ScriptCounts::count(text);
        let japanese = counts.japanese_letters();

        self.num_letters = num_letters;
        self.num_hiragana_letters = counts.hiragana;
        self.num_katakana_letters = counts.katakana;
        self.num_kanji_letters = counts.kanji;
        self.num_kuten = counts.kuten;
        self.num_toten = counts.toten;
        self.num_japanese_letters = japanese;

        self.hiragana_fraction = fraction(counts.hiragana, japanese);
        self.katakana_fraction = fraction(counts.katakana, japanese);
        self.kanji_fraction = fraction(counts.kanji, japanese);
        self.kuten_fraction = fraction(counts.kuten, japanese);
        self.toten_fraction = fraction(counts.toten, japanese);
        self.japanese_fraction = fraction(japanese, num_letters);
    }

    fn fill_sentences(&mut self, seg: &Segmentation<'_>) {
        let lengths: Vec<usize> = seg.sentences.iter().map(|s| s.chars().count()).collect();
        self.avg_sentence_length = fraction(lengths.iter().sum(), lengths.len());
        self.max_sentence_length = lengths.iter().copied().max().unwrap_or(0);

        self.num_sentences_ending_with_ellipsis = seg
            .sentences
            .iter()
            .filter(|s| s.trim().ends_with(['・', '…']))
            .count();
        self.ellipsis_fraction =
            fraction(self.num_sentences_ending_with_ellipsis, seg.sentence_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_all_zero() {
        let m = QualityMetrics::compute("");
        assert_eq!(m.num_letters, 0);
        assert_eq!(m.avg_sentence_length, 0.0);
        assert_eq!(m.max_sentence_length, 0);
        assert_eq!(m.ellipsis_fraction, 0.0);
        assert_eq!(m.japanese_fraction, 0.0);
        assert_eq!(m.duplicate_paragraph_fraction, 0.0);
        assert_eq!(m.duplicate_paragraph_fraction_in_character, 0.0);
        assert_eq!(m.top_2gram_character_fraction, 0.0);
        assert_eq!(m.duplicate_10gram_character_fraction, 0.0);
    }

    #[test]
    fn test_repeated_paragraph_fraction() {
        let paragraph = "これは同じ段落です。";
        for k in 2..6 {
            let text = vec![paragraph; k].join("\n");
            let m = QualityMetrics::compute(&text);
            let expected = (k - 1) as f64 / k as f64;
            assert!((m.duplicate_paragraph_fraction - expected).abs() < 1e-12);
            assert!((m.duplicate_paragraph_fraction_in_character - expected).abs() < 1e-12);
            assert!((m.duplicate_sentence_fraction - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sentence_statistics() {
        let m = QualityMetrics::compute("あいう。えお…\nかきくけこさ・");
        // sentences: "あいう。", "えお…", "かきくけこさ・"
        assert_eq!(m.max_sentence_length, 7);
        assert!((m.avg_sentence_length - 14.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.num_sentences_ending_with_ellipsis, 2);
        assert!((m.ellipsis_fraction - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ellipsis_ignores_trailing_whitespace() {
        let m = QualityMetrics::compute("続きは…  ");
        assert_eq!(m.num_sentences_ending_with_ellipsis, 1);
    }

    #[test]
    fn test_script_fractions() {
        let m = QualityMetrics::compute("ひらがなカタカナ漢字abcd");
        assert_eq!(m.num_letters, 14);
        assert_eq!(m.num_hiragana_letters, 4);
        assert_eq!(m.num_katakana_letters, 4);
        assert_eq!(m.num_kanji_letters, 2);
        assert_eq!(m.num_japanese_letters, 10);
        assert!((m.hiragana_fraction - 0.4).abs() < 1e-12);
        assert!((m.kanji_fraction - 0.2).abs() < 1e-12);
        assert!((m.japanese_fraction - 10.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let text = "吾輩は猫である。名前はまだ無い。\nどこで生れたかとんと見当がつかぬ。";
        assert_eq!(QualityMetrics::compute(text), QualityMetrics::compute(text));
    }

    #[test]
    fn test_json_field_order() {
        let json = serde_json::to_string(&QualityMetrics::compute("テスト。")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "duplicate_paragraph_fraction",
                "duplicate_paragraph_fraction_in_character",
                "duplicate_sentence_fraction",
                "duplicate_sentence_fraction_in_character",
                "top_2gram_character_fraction",
                "top_3gram_character_fraction",
                "top_4gram_character_fraction",
                "duplicate_5gram_character_fraction",
                "duplicate_6gram_character_fraction",
                "duplicate_7gram_character_fraction",
                "duplicate_8gram_character_fraction",
                "duplicate_9gram_character_fraction",
                "duplicate_10gram_character_fraction",
                "num_letters",
                "num_hiragana_letters",
                "num_katakana_letters",
                "num_kanji_letters",
                "num_kuten",
                "num_toten",
                "num_japanese_letters",
                "hiragana_fraction",
                "katakana_fraction",
                "kanji_fraction",
                "kuten_fraction",
                "toten_fraction",
                "japanese_fraction",
                "avg_sentence_length",
                "max_sentence_length",
                "num_sentences_ending_with_ellipsis",
                "ellipsis_fraction",
            ]
        );
    }
}
