//! Japanese script classification.

/// Returns true for hiragana letters (U+3041–U+3096).
pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{3096}').contains(&c)
}

/// Returns true for katakana letters (U+30A1–U+30FA).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A1}'..='\u{30FA}').contains(&c)
}

/// Returns true for BMP ideographs and the iteration marks 々〇〻.
///
/// Ideographs outside the BMP (e.g. `𠮷`) are not kanji.
pub fn is_kanji(c: char) -> bool {
    matches!(c, '々' | '〇' | '〻')
        || ('\u{3400}'..='\u{9FFF}').contains(&c)   // Extension A + Unified Ideographs
        || ('\u{F900}'..='\u{FAFF}').contains(&c)   // Compatibility Ideographs
}

/// Returns true for comma-class marks.
pub fn is_toten(c: char) -> bool {
    matches!(c, '、' | '，')
}

/// Returns true for period-class marks.
pub fn is_kuten(c: char) -> bool {
    matches!(c, '。' | '．' | '！' | '？')
}

/// Per-script character counts of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    pub hiragana: usize,
    pub katakana: usize,
    pub kanji: usize,
    pub kuten: usize,
    pub toten: usize,
}

impl ScriptCounts {
    /// Counts the script categories of `text`.
    ///
    /// Hiragana, katakana, toten and kuten are exclusive and tested in that
    /// order. Kanji is counted independently of them.
    pub fn count(text: &str) -> Self {
        let mut counts = Self::default();
        for c in text.chars() {
            if is_hiragana(c) {
                counts.hiragana += 1;
            } else if is_katakana(c) {
                counts.katakana += 1;
            } else if is_toten(c) {
                counts.toten += 1;
            } else if is_kuten(c) {
                counts.kuten += 1;
            }
            if is_kanji(c) {
                counts.kanji += 1;
            }
        }
        counts
    }

    /// Sum of all five categories.
    pub fn japanese_letters(&self) -> usize {
        self.hiragana + self.katakana + self.kanji + self.kuten + self.toten
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_mixed_text() {
        let counts = ScriptCounts::count("日本語のテキスト、です。ABC");
        assert_eq!(counts.kanji, 3);
        assert_eq!(counts.hiragana, 3);
        assert_eq!(counts.katakana, 4);
        assert_eq!(counts.toten, 1);
        assert_eq!(counts.kuten, 1);
        assert_eq!(counts.japanese_letters(), 12);
    }

    #[test]
    fn test_prolonged_sound_mark_is_not_katakana() {
        assert!(!is_katakana('ー'));
        assert!(is_katakana('ヺ'));
    }

    #[test]
    fn test_iteration_marks_are_kanji() {
        let counts = ScriptCounts::count("時々〇〻");
        assert_eq!(counts.kanji, 4);
        assert_eq!(counts.japanese_letters(), 4);
    }

    #[test]
    fn test_fullwidth_ambiguous_marks_counted() {
        let counts = ScriptCounts::count("，．！？!?");
        assert_eq!(counts.toten, 1);
        assert_eq!(counts.kuten, 3);
    }

    #[test]
    fn test_supplementary_ideograph_not_kanji() {
        assert!(!is_kanji('𠮷'));
        assert!(!is_kanji('a'));
        let counts = ScriptCounts::count("𠮷野家");
        assert_eq!(counts.kanji, 2);
        assert_eq!(counts.japanese_letters(), 2);
    }
}
