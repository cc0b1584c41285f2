//! Normalization of ambiguous full-width punctuation.
//!
//! Some Japanese pages write the comma and full stop as `，` and `．` instead
//! of `、` and `。`. For each class independently, the normalizer counts how
//! often each convention follows clearly Japanese characters and, when the
//! full-width Latin form is the majority, rewrites it everywhere except after
//! full-width digits and Latin letters (as in `３．１４`).

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Closing brackets, kana, iteration marks and ideographs.
const JAPANESE_CONTEXT: &str = r"[）」』］〕】〉》\u{3041}-\u{3096}\u{30A1}-\u{30FA}々〇〻\u{3400}-\u{9FFF}\u{F900}-\u{FAFF}]";

fn context_regex(mark: char) -> Regex {
    Regex::new(&format!("{JAPANESE_CONTEXT}{mark}+")).unwrap()
}

static RE_TOTEN: LazyLock<Regex> = LazyLock::new(|| context_regex('、'));
static RE_TOTEN_FULLWIDTH: LazyLock<Regex> = LazyLock::new(|| context_regex('，'));
static RE_KUTEN: LazyLock<Regex> = LazyLock::new(|| context_regex('。'));
static RE_KUTEN_FULLWIDTH: LazyLock<Regex> = LazyLock::new(|| context_regex('．'));

// The preceding character is consumed with the run, so a run can only be
// rewritten if something other than a full-width alphanumeric precedes it.
static RE_TOTEN_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^０-９Ａ-Ｚａ-ｚ\^])(，+)").unwrap());
static RE_KUTEN_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^０-９Ａ-Ｚａ-ｚ\^])(．+)").unwrap());

/// Result of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// `，` was rewritten to `、`.
    pub toten_replaced: bool,
    /// `．` was rewritten to `。`.
    pub kuten_replaced: bool,
}

/// Normalizes `，`/`．` to `、`/`。` when they dominate in Japanese context.
pub fn normalize(text: &str) -> Normalized {
    let toten_replaced =
        RE_TOTEN.find_iter(text).count() < RE_TOTEN_FULLWIDTH.find_iter(text).count();
    let kuten_replaced =
        RE_KUTEN.find_iter(text).count() < RE_KUTEN_FULLWIDTH.find_iter(text).count();

    let mut result = text.to_string();
    if toten_replaced {
        result = replace_runs(&RE_TOTEN_TARGET, &result, '、');
    }
    if kuten_replaced {
        result = replace_runs(&RE_KUTEN_TARGET, &result, '。');
    }

    Normalized {
        text: result,
        toten_replaced,
        kuten_replaced,
    }
}

fn replace_runs(re: &Regex, text: &str, mark: char) -> String {
    re.replace_all(text, |caps: &Captures| {
        let run = caps[2].chars().count();
        let mut out = String::with_capacity(caps[1].len() + run * mark.len_utf8());
        out.push_str(&caps[1]);
        out.extend(std::iter::repeat(mark).take(run));
        out
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str, expected: &str, toten: bool, kuten: bool) {
        let n = normalize(input);
        assert_eq!(n.text, expected, "input: {input}");
        assert_eq!(n.toten_replaced, toten, "toten flag for: {input}");
        assert_eq!(n.kuten_replaced, kuten, "kuten flag for: {input}");
    }

    #[test]
    fn test_already_normal() {
        check(
            "この文章の句点、読点を修正します。",
            "この文章の句点、読点を修正します。",
            false,
            false,
        );
    }

    #[test]
    fn test_comma_only() {
        check(
            "この文章の句点，読点を修正します。",
            "この文章の句点、読点を修正します。",
            true,
            false,
        );
    }

    #[test]
    fn test_period_only() {
        check(
            "この文章の句点、読点を修正します．",
            "この文章の句点、読点を修正します。",
            false,
            true,
        );
    }

    #[test]
    fn test_both() {
        check(
            "この文章の句点，読点を修正します．",
            "この文章の句点、読点を修正します。",
            true,
            true,
        );
    }

    #[test]
    fn test_fullwidth_latin_is_preserved() {
        check(
            "Ｈｉ，のように全角の英語が混ざった場合でも、できるだけ悪影響を及ぼさないように修正します。",
            "Ｈｉ，のように全角の英語が混ざった場合でも、できるだけ悪影響を及ぼさないように修正します。",
            false,
            false,
        );
        check(
            "Ｈｉ，のように全角の英語が混ざった場合でも，できるだけ悪影響を及ぼさないように修正します．",
            "Ｈｉ，のように全角の英語が混ざった場合でも、できるだけ悪影響を及ぼさないように修正します。",
            true,
            true,
        );
    }

    #[test]
    fn test_fullwidth_digits_are_preserved() {
        check(
            "円周率は３．１４と習いました、のように全角の数字が混ざった場合でも、できるだけ悪影響を及ぼさないように修正します。",
            "円周率は３．１４と習いました、のように全角の数字が混ざった場合でも、できるだけ悪影響を及ぼさないように修正します。",
            false,
            false,
        );
        check(
            "円周率は３．１４と習いました，のように全角の数字が混ざった場合でも，できるだけ悪影響を及ぼさないように修正します．",
            "円周率は３．１４と習いました、のように全角の数字が混ざった場合でも、できるだけ悪影響を及ぼさないように修正します。",
            true,
            true,
        );
    }

    #[test]
    fn test_runs_keep_length() {
        check("お待ちください．．．", "お待ちください。。。", false, true);
        check("それは，，，，，", "それは、、、、、", true, false);
    }

    #[test]
    fn test_substitution_is_global() {
        // Detection only looks after Japanese characters, but the rewrite also
        // applies after ASCII.
        check("abc，def，ですね，そう，", "abc、def、ですね、そう、", true, false);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "この文章の句点，読点を修正します．",
            "Ｈｉ，のように全角の英語が混ざった場合でも，できるだけ悪影響を及ぼさないように修正します．",
            "円周率は３．１４と習いました，のように全角の数字が混ざった場合でも，できるだけ悪影響を及ぼさないように修正します．",
            "お待ちください．．．",
        ];
        for input in inputs {
            let once = normalize(input);
            let twice = normalize(&once.text);
            assert_eq!(twice.text, once.text);
            assert!(!twice.toten_replaced);
            assert!(!twice.kuten_replaced);
        }
    }

    #[test]
    fn test_leading_mark_has_no_predecessor() {
        // Nothing precedes the first mark, so it stays.
        check("，，あ，", "，、あ、", true, false);
    }

    #[test]
    fn test_supplementary_ideograph_is_not_context() {
        check("𠮷，𠮷，", "𠮷，𠮷，", false, false);
        check("家，家，", "家、家、", true, false);
    }
}
