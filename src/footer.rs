//! Keyword-based removal of page footers.
//!
//! The last few lines of a scraped page are often navigation, copyright and
//! share buttons. A line counts as a footer when keywords cover more than a
//! given share of its characters; the first such line among the last `window`
//! lines and everything after it is dropped.

use serde::{Deserialize, Serialize};

/// Vocabulary typical of page footers.
const FOOTER_KEYWORDS: &[&str] = &[
    "この記事へのトラックバック一覧",
    "無断転載を禁じ",
    "無断転載を禁ず",
    "Sponsored Link",
    "Comments",
    "記事",
    "最近記事",
    "Copyright",
    "©",
    "All right reserved",
    "All rights reserved",
    "スポンサー",
    "固定リンク",
    "トップページ",
    "コメント",
    "Inc.",
    "その他",
    "PR",
    "クリック",
    "受け取る",
    "サイト",
    "いいね",
    "ツイート",
    "共有",
    "全部見る",
    "http",
    "Reserved",
    "Rights",
    "rights",
    "reserved",
    "問い合わせ",
    "トラックバック",
    "Twitter",
    "twitter",
    "ポイント",
    "Follow",
    "アフィリエイト",
    "ランキング",
    "sponsored",
    "リンク",
    "link",
    "クリックお願い",
    "一覧へ",
    "詳細表示",
    "特定商取引法に基づく表記",
    "プライバシーポリシー",
    "サイトポリシー",
    "サイト利用規約",
    "サイトマップ",
    "ご利用規約",
    "このサイトについて",
    "会社概要",
    "会社案内",
    "ヘルプ",
    "資料請求",
    "お知らせ",
    "管理者ページ",
    "検索",
    "サイト内検索",
    "プロフィール",
    "ピックアップ",
    "一覧を見る",
    "広告掲載",
    "マイページ",
    "ログイン",
    "ログアウト",
    "バナー",
    "新規登録",
    "新規会員登録",
    "トピックス",
];

/// Footer detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterOptions {
    /// Number of trailing lines examined.
    pub window: usize,
    /// A line is a footer when its keyword ratio exceeds this.
    pub threshold: f64,
    /// Keywords, longest first.
    pub keywords: Vec<String>,
}

impl Default for FooterOptions {
    fn default() -> Self {
        Self {
            window: 10,
            threshold: 0.3,
            keywords: Vec::new(),
        }
        .with_keywords(FOOTER_KEYWORDS.iter().copied())
    }
}

impl FooterOptions {
    /// Replaces the keyword list, removing duplicates and sorting longest first.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keywords: Vec<String> = keywords
            .into_iter()
            .map(Into::into)
            .filter(|k| !k.is_empty())
            .collect();
        keywords.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        keywords.dedup();
        self.keywords = keywords;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Share of `line` covered by keyword occurrences.
///
/// Each keyword is counted on the whole line independently of the others, so
/// overlapping keywords (e.g. `記事` inside `最近記事`) are counted twice and
/// the ratio can exceed 1.
pub fn keyword_ratio(line: &str, keywords: &[String]) -> f64 {
    let total = line.chars().count();
    if total == 0 {
        return 0.0;
    }
    let matched: usize = keywords
        .iter()
        .map(|k| line.matches(k.as_str()).count() * k.chars().count())
        .sum();
    matched as f64 / total as f64
}

/// Returns true if `line` is footer-like under `options`.
pub fn is_footer(line: &str, options: &FooterOptions) -> bool {
    keyword_ratio(line, &options.keywords) > options.threshold
}

/// Truncates `text` before the first footer line among its last `window` lines.
pub fn trim_footer(text: &str, options: &FooterOptions) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let start = lines.len().saturating_sub(options.window);
    let cut = (start..lines.len())
        .find(|&i| is_footer(lines[i], options))
        .unwrap_or(lines.len());
    if cut < lines.len() {
        tracing::trace!(removed = lines.len() - cut, "trimmed footer lines");
    }
    lines[..cut].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keywords_sorted_and_deduplicated() {
        let options = FooterOptions::default();
        assert_eq!(options.keywords[0], "All rights reserved");
        assert_eq!(options.keywords[1], "All right reserved");
        let lengths: Vec<usize> = options.keywords.iter().map(|k| k.chars().count()).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
        let mut unique = options.keywords.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), options.keywords.len());
    }

    #[test]
    fn test_keyword_line_is_removed() {
        let text = "本文です。\n続きの本文です。\nプライバシーポリシー";
        assert_eq!(
            trim_footer(text, &FooterOptions::default()),
            "本文です。\n続きの本文です。"
        );
    }

    #[test]
    fn test_everything_after_footer_is_removed() {
        let text = "本文です。\nCopyright 2024\n最後の行も消える";
        assert_eq!(trim_footer(text, &FooterOptions::default()), "本文です。");
    }

    #[test]
    fn test_no_footer_unchanged() {
        let text = "吾輩は猫である。\n名前はまだ無い。\n\nどこで生れたかとんと見当がつかぬ。";
        assert_eq!(trim_footer(text, &FooterOptions::default()), text);
    }

    #[test]
    fn test_only_last_window_lines_examined() {
        let mut lines = vec!["ログイン"];
        lines.extend(std::iter::repeat("普通の文章がここに続きます。").take(10));
        let text = lines.join("\n");
        assert_eq!(trim_footer(&text, &FooterOptions::default()), text);

        let narrow = FooterOptions::default().with_window(11);
        assert_eq!(trim_footer(&text, &narrow), "");
    }

    #[test]
    fn test_threshold_is_strict() {
        // "検索" covers 2 of 4 characters
        let options = FooterOptions::default().with_threshold(0.5);
        assert!(!is_footer("検索する", &options));
        assert!(is_footer("検索する", &options.clone().with_threshold(0.49)));
    }

    #[test]
    fn test_overlapping_keywords_double_count() {
        let options = FooterOptions::default();
        // "最近記事" (4) and "記事" (2) both count: 6 / 4
        assert_eq!(keyword_ratio("最近記事", &options.keywords), 1.5);
    }

    #[test]
    fn test_empty_line_ratio_zero() {
        assert_eq!(keyword_ratio("", &FooterOptions::default().keywords), 0.0);
        assert_eq!(trim_footer("", &FooterOptions::default()), "");
    }
}
