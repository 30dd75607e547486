//! Plain-text helpers for listing pages: excerpts, reading time and tags.
//!
//! Post content is stored as lightweight markup. Nothing here parses it
//! properly; the helpers only need text that reads well in a card.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_EXCERPT_LENGTH: usize = 160;
pub const WORDS_PER_MINUTE: usize = 200;
pub const MAX_TAGS: usize = 3;

const ELLIPSIS: &str = "...";
const BASELINE_TAGS: &[&str] = &["Blog"];

/// Lower-case keyword to display label, checked in order.
const TAG_VOCABULARY: &[(&str, &str)] = &[
    ("react", "React"),
    ("next.js", "Next.js"),
    ("blocknote", "BlockNote"),
    ("editor", "Editor"),
    ("tailwind", "Tailwind"),
    ("css", "CSS"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("rust", "Rust"),
    ("performance", "Performance"),
];

struct MarkupPass {
    pattern: Regex,
    replacement: &'static str,
}

impl MarkupPass {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid markup pattern"),
            replacement,
        }
    }
}

// Order matters: fences before inline code, images before links, block
// markers before emphasis, whitespace last. Emphasis markers only go when
// they wrap text.
static MARKUP_PASSES: Lazy<Vec<MarkupPass>> = Lazy::new(|| {
    vec![
        MarkupPass::new(r"(?s)```.*?(?:```|\z)", " "),
        MarkupPass::new(r"!\[[^\]]*\]\([^)]*\)", ""),
        MarkupPass::new(r"\[([^\]]*)\]\([^)]*\)", "${1}"),
        MarkupPass::new(r"`([^`]*)`", "${1}"),
        MarkupPass::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]*", ""),
        MarkupPass::new(r"(?m)^[ \t]*>[ \t]?", ""),
        MarkupPass::new(r"(?m)^[ \t]*[-*+][ \t]+", ""),
        MarkupPass::new(
            r"\*{1,3}([^*\s](?:[^*]*?[^*\s])?)\*{1,3}|~~([^~]+?)~~|\b_{1,3}([^_\s](?:[^_]*?[^_\s])?)_{1,3}\b",
            "${1}${2}${3}",
        ),
        MarkupPass::new(r"\s+", " "),
    ]
});

/// Remove markup syntax and collapse whitespace.
pub fn strip_markup(content: &str) -> String {
    let mut text = content.to_string();
    for pass in MARKUP_PASSES.iter() {
        text = pass
            .pattern
            .replace_all(&text, pass.replacement)
            .into_owned();
    }
    text.trim().to_string()
}

/// Plain-text preview of at most `max_len` characters, followed by `...`
/// when anything was cut.
pub fn excerpt(content: &str, max_len: usize) -> String {
    let text = strip_markup(content);
    if text.chars().count() <= max_len {
        return text;
    }

    let mut cut: String = text.chars().take(max_len).collect();
    cut.push_str(ELLIPSIS);
    cut
}

pub fn read_time_minutes(content: &str) -> usize {
    content
        .split_whitespace()
        .count()
        .div_ceil(WORDS_PER_MINUTE)
        .max(1)
}

/// Reading time label such as `3 min read`.
pub fn read_time(content: &str) -> String {
    format!("{} min read", read_time_minutes(content))
}

/// Up to [`MAX_TAGS`] labels: the baseline tags, then vocabulary hits in
/// vocabulary order.
pub fn tags(content: &str) -> Vec<String> {
    let haystack = content.to_lowercase();
    let mut labels: Vec<&str> = BASELINE_TAGS.to_vec();

    for &(keyword, label) in TAG_VOCABULARY {
        if labels.len() >= MAX_TAGS {
            break;
        }
        if haystack.contains(keyword) && !labels.contains(&label) {
            labels.push(label);
        }
    }

    labels.truncate(MAX_TAGS);
    labels.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_strips_heading_and_emphasis() {
        assert_eq!(
            excerpt("# Title\n**bold** text", DEFAULT_EXCERPT_LENGTH),
            "Title bold text"
        );
    }

    #[test]
    fn excerpt_handles_links_images_and_code() {
        let content = "See [the docs](https://example.com) ![diagram](d.png) and `cargo run`.\n\n```rust\nfn main() {}\n```\nDone.";
        assert_eq!(
            excerpt(content, DEFAULT_EXCERPT_LENGTH),
            "See the docs and cargo run. Done."
        );
    }

    #[test]
    fn excerpt_drops_block_markers() {
        let content = "> quoted line\n- first\n* second\n+ third\n~~gone~~ _soft_";
        assert_eq!(
            excerpt(content, DEFAULT_EXCERPT_LENGTH),
            "quoted line first second third gone soft"
        );
    }

    #[test]
    fn excerpt_keeps_leading_numbers() {
        assert_eq!(
            excerpt("2024. was a good year", DEFAULT_EXCERPT_LENGTH),
            "2024. was a good year"
        );
        assert_eq!(excerpt("1. preheat\n2. bake", 160), "1. preheat 2. bake");
    }

    #[test]
    fn excerpt_keeps_lone_asterisks() {
        assert_eq!(excerpt("2 * 3 = 6", DEFAULT_EXCERPT_LENGTH), "2 * 3 = 6");
        assert_eq!(excerpt("a *b* and **c** d", 160), "a b and c d");
    }

    #[test]
    fn excerpt_keeps_inner_underscores() {
        assert_eq!(excerpt("call snake_case_name", 160), "call snake_case_name");
    }

    #[test]
    fn excerpt_truncates_with_ellipsis() {
        let content = "a".repeat(200);
        let result = excerpt(&content, DEFAULT_EXCERPT_LENGTH);
        assert_eq!(result.chars().count(), DEFAULT_EXCERPT_LENGTH + ELLIPSIS.len());
        assert!(result.ends_with(ELLIPSIS));
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let result = excerpt("héllo wörld", 5);
        assert_eq!(result, "héllo...");
    }

    #[test]
    fn short_excerpt_is_untouched() {
        let result = excerpt("Plain words only.", DEFAULT_EXCERPT_LENGTH);
        assert_eq!(result, "Plain words only.");
        assert!(result.chars().count() <= DEFAULT_EXCERPT_LENGTH);
    }

    #[test]
    fn unterminated_fence_hides_the_rest() {
        assert_eq!(excerpt("Intro\n```\nlet x = 1;", 160), "Intro");
    }

    #[test]
    fn read_time_rounds_up_with_floor_of_one() {
        assert_eq!(read_time(&"word ".repeat(400)), "2 min read");
        assert_eq!(read_time(&"word ".repeat(401)), "3 min read");
        assert_eq!(read_time("one"), "1 min read");
        assert_eq!(read_time(""), "1 min read");
    }

    #[test]
    fn tags_start_with_baseline() {
        assert_eq!(tags("nothing special"), ["Blog"]);
    }

    #[test]
    fn tags_follow_vocabulary_order_and_cap() {
        let content = "Rust performance tips, plus some TypeScript and React.";
        assert_eq!(tags(content), ["Blog", "React", "TypeScript"]);
    }

    #[test]
    fn tags_are_case_insensitive() {
        assert_eq!(tags("Building with NEXT.JS"), ["Blog", "Next.js"]);
    }
}
