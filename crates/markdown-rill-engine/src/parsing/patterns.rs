//! Canonical pattern definitions for every construct the parser recognizes.
//!
//! Throughout the library a "newline" is either the literal `\n` character or
//! the escaped two-character sequence `\` + `n`, so token streams that escape
//! their newlines segment and classify identically.

use std::sync::OnceLock;

use regex::Regex;

use super::types::StyleGroup;

/// The four match variants of one inline style group.
///
/// `full` requires both markers in-segment; `partial_start`/`partial_end`
/// cover markers split across segments; `partial_or_full` is their union and
/// is used only for routing. Content must be non-empty and must not start or
/// end in whitespace; prefix, suffix, and content all exclude the group's
/// marker character.
pub struct StylePatterns {
    pub full: Regex,
    pub partial_start: Regex,
    pub partial_end: Regex,
    pub partial_or_full: Regex,
}

impl StylePatterns {
    fn compile(marker: char, repeats: usize) -> Self {
        let c = regex::escape(&marker.to_string());
        let m = c.repeat(repeats);
        let content = format!(r"[^\s{c}](?:[^{c}]*[^\s{c}])?");
        Self {
            full: pattern(&format!(r"^([^{c}]*)({m})({content})({m})([^{c}]*)$")),
            partial_start: pattern(&format!(r"^( *)({m})({content})([^{c}]*)$")),
            partial_end: pattern(&format!(r"^(\s*\S+)({m})((?s:.*))$")),
            partial_or_full: pattern(&format!(r"^([^{c}]*)({m})({content})({m})?([^{c}]*)$")),
        }
    }
}

/// All compiled patterns, built once per process.
pub struct PatternLibrary {
    /// Tokenizer: optional leading whitespace, a word, then its trailing
    /// whitespace run or newline run. Leftmost-first, so the whitespace-run
    /// alternative wins whenever both could match.
    pub segment: Regex,
    pub has_newline: Regex,
    pub ends_with_newline: Regex,
    pub ends_with_multiple_newlines: Regex,
    /// 1-6 `#` plus one optional whitespace captured as the marker; the rest
    /// of the line is the title capture.
    pub header_marker: Regex,
    pub code_block_start: Regex,
    backtick_runs: Regex,
    fence_close_tail: Regex,
    italic: StylePatterns,
    bold: StylePatterns,
    bold_italic: StylePatterns,
    strikethrough: StylePatterns,
    inline_code: StylePatterns,
}

impl PatternLibrary {
    fn compile() -> Self {
        Self {
            segment: pattern(r"\s*\S+\s+|\s*\S+(?:\n|\\n)+"),
            has_newline: pattern(r"(?:\n|\\n)+"),
            ends_with_newline: pattern(r"(?:\\n|\n)[ \t]*$"),
            ends_with_multiple_newlines: pattern(r"(?:\\n|\n){2,}[ \t]*$"),
            header_marker: pattern(r"^(#{1,6}\s?)(.*)"),
            code_block_start: pattern(r"^(\s*```)([a-zA-Z0-9_+-]*)(?:\n|\\n)([a-zA-Z_+\s-]*)$"),
            backtick_runs: pattern(r"`+"),
            fence_close_tail: pattern(r"^\s*(?:\n|\\n)"),
            italic: StylePatterns::compile('*', 1),
            bold: StylePatterns::compile('*', 2),
            bold_italic: StylePatterns::compile('*', 3),
            strikethrough: StylePatterns::compile('~', 2),
            inline_code: StylePatterns::compile('`', 1),
        }
    }

    pub fn style(&self, group: StyleGroup) -> &StylePatterns {
        match group {
            StyleGroup::Italic => &self.italic,
            StyleGroup::Bold => &self.bold,
            StyleGroup::BoldItalic => &self.bold_italic,
            StyleGroup::Strikethrough => &self.strikethrough,
            StyleGroup::InlineCode => &self.inline_code,
        }
    }

    /// A closing fence is a maximal run of exactly three backticks followed
    /// by optional blanks and at least one newline, anywhere in the segment.
    /// Scanning maximal runs keeps longer fences (````) from matching
    /// without needing lookaround.
    pub fn is_code_block_end(&self, segment: &str) -> bool {
        for run in self.backtick_runs.find_iter(segment) {
            if run.as_str().len() == 3 && self.fence_close_tail.is_match(&segment[run.end()..]) {
                return true;
            }
        }
        false
    }
}

/// Process-wide compiled pattern library.
pub fn library() -> &'static PatternLibrary {
    static LIBRARY: OnceLock<PatternLibrary> = OnceLock::new();
    LIBRARY.get_or_init(PatternLibrary::compile)
}

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("invalid builtin pattern")
}

/// Strips one maximal trailing run of newlines (literal or escaped, mixed
/// runs included). Leading and interior newlines are untouched.
pub fn truncate_trailing_newlines(segment: &str) -> &str {
    let mut end = segment.len();
    loop {
        let head = &segment[..end];
        if head.ends_with('\n') {
            end -= 1;
        } else if head.ends_with("\\n") {
            end -= 2;
        } else {
            break;
        }
    }
    &segment[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StyleGroup::Italic, "*", "italic")]
    #[case(StyleGroup::Bold, "**", "bold")]
    #[case(StyleGroup::BoldItalic, "***", "bolditalic")]
    #[case(StyleGroup::Strikethrough, "~~", "strike")]
    #[case(StyleGroup::InlineCode, "`", "code")]
    fn full_variant_requires_both_markers(
        #[case] group: StyleGroup,
        #[case] marker: &str,
        #[case] content: &str,
    ) {
        let patterns = library().style(group);
        let wrapped = format!("{marker}{content}{marker}");

        assert!(patterns.full.is_match(&wrapped));
        assert!(patterns.full.is_match(&format!("before{wrapped}after")));
        assert!(!patterns.full.is_match(&format!("{marker}{content}")));
        assert!(!patterns.full.is_match(&format!("{content}{marker}")));
    }

    #[rstest]
    #[case(StyleGroup::Italic, "*")]
    #[case(StyleGroup::Bold, "**")]
    #[case(StyleGroup::BoldItalic, "***")]
    #[case(StyleGroup::Strikethrough, "~~")]
    #[case(StyleGroup::InlineCode, "`")]
    fn partial_start_opens_without_closing(#[case] group: StyleGroup, #[case] marker: &str) {
        let patterns = library().style(group);

        assert!(patterns.partial_start.is_match(&format!("{marker}text")));
        assert!(patterns.partial_start.is_match(&format!(" {marker}text")));
        assert!(!patterns.partial_start.is_match(&format!("{marker}text{marker}")));
        assert!(!patterns.partial_start.is_match("text"));
    }

    #[rstest]
    #[case(StyleGroup::Italic, "*")]
    #[case(StyleGroup::Bold, "**")]
    #[case(StyleGroup::BoldItalic, "***")]
    #[case(StyleGroup::Strikethrough, "~~")]
    #[case(StyleGroup::InlineCode, "`")]
    fn partial_end_closes_a_pending_style(#[case] group: StyleGroup, #[case] marker: &str) {
        let patterns = library().style(group);

        assert!(patterns.partial_end.is_match(&format!("text{marker}")));
        assert!(patterns.partial_end.is_match(&format!("text{marker} after")));
        assert!(!patterns.partial_end.is_match("text"));
    }

    #[test]
    fn full_captures_prefix_marker_content_suffix() {
        let caps = library()
            .style(StyleGroup::Italic)
            .full
            .captures("before*italic*after")
            .unwrap();

        assert_eq!(&caps[1], "before");
        assert_eq!(&caps[2], "*");
        assert_eq!(&caps[3], "italic");
        assert_eq!(&caps[4], "*");
        assert_eq!(&caps[5], "after");
    }

    #[test]
    fn marker_characters_are_excluded_from_content() {
        let patterns = library();
        // Nested or unbalanced asterisks fail both the italic and the bold
        // full patterns instead of matching partially.
        assert!(!patterns.style(StyleGroup::Italic).full.is_match("*text**more*"));
        assert!(!patterns.style(StyleGroup::Bold).full.is_match("*text**more*"));
        assert!(
            !patterns
                .style(StyleGroup::Italic)
                .partial_or_full
                .is_match("**bold**")
        );
        assert!(
            patterns
                .style(StyleGroup::Italic)
                .full
                .is_match("*simple italic*")
        );
    }

    #[test]
    fn content_may_hold_special_characters() {
        let patterns = library();
        assert!(
            patterns
                .style(StyleGroup::Italic)
                .full
                .is_match("*text with $pecial chars!*")
        );
        assert!(
            patterns
                .style(StyleGroup::InlineCode)
                .full
                .is_match(r#"`var x = "string"; console.log(x);`"#)
        );
    }

    #[rstest]
    #[case("# Header 1", "# ")]
    #[case("###### Header 6", "###### ")]
    #[case("#Header", "#")]
    #[case("#\tTab", "#\t")]
    fn header_marker_captures_hashes_and_one_blank(#[case] segment: &str, #[case] marker: &str) {
        let caps = library().header_marker.captures(segment).unwrap();
        assert_eq!(&caps[1], marker);
    }

    #[test]
    fn header_marker_clamps_at_six_hashes() {
        let caps = library().header_marker.captures("####### Seven").unwrap();
        // The seventh hash falls into the title text.
        assert_eq!(&caps[1], "######");
        assert_eq!(&caps[2], "# Seven");
    }

    #[test]
    fn header_marker_requires_leading_hash() {
        assert!(!library().header_marker.is_match("Not # a header"));
        assert!(!library().header_marker.is_match(""));
    }

    #[rstest]
    #[case("```javascript\n", "javascript")]
    #[case("```python\n", "python")]
    #[case("```\n", "")]
    #[case("  ```\n", "")]
    #[case("```c++\n", "c++")]
    #[case("```objective-c\n", "objective-c")]
    #[case("```b64\n", "b64")]
    #[case("```javascript\\n", "javascript")]
    fn code_block_start_extracts_language(#[case] segment: &str, #[case] language: &str) {
        let caps = library().code_block_start.captures(segment).unwrap();
        assert_eq!(&caps[2], language);
    }

    #[rstest]
    #[case("```javascript")]
    #[case("````\n")]
    #[case("```java@script\n")]
    #[case("```py thon\n")]
    fn code_block_start_rejects_bad_fences(#[case] segment: &str) {
        assert!(!library().code_block_start.is_match(segment));
    }

    #[rstest]
    #[case("```\n")]
    #[case("```\n\n")]
    #[case("``` \n")]
    #[case("```\\n")]
    #[case("```\\n\\n")]
    #[case("x```\n")]
    #[case("``` ```\n")]
    fn code_block_end_accepts_exact_triple_fences(#[case] segment: &str) {
        assert!(library().is_code_block_end(segment));
    }

    #[rstest]
    #[case("````")]
    #[case("````\n")]
    #[case("```")]
    #[case("``` x\n")]
    #[case("`` `x\n")]
    fn code_block_end_rejects_other_backtick_runs(#[case] segment: &str) {
        assert!(!library().is_code_block_end(segment));
    }

    #[test]
    fn newline_helpers_accept_escaped_newlines() {
        let patterns = library();

        assert!(patterns.has_newline.is_match("hello\nworld"));
        assert!(patterns.has_newline.is_match("hello\\nworld"));
        assert!(!patterns.has_newline.is_match("hello world"));

        assert!(patterns.ends_with_newline.is_match("hello\n"));
        assert!(patterns.ends_with_newline.is_match("hello\\n"));
        assert!(patterns.ends_with_newline.is_match("hello\n  "));
        assert!(patterns.ends_with_newline.is_match("hello\\n\t"));
        assert!(!patterns.ends_with_newline.is_match("hello"));

        assert!(patterns.ends_with_multiple_newlines.is_match("hello\n\n"));
        assert!(patterns.ends_with_multiple_newlines.is_match("hello\\n\\n"));
        assert!(!patterns.ends_with_multiple_newlines.is_match("hello\n"));
        assert!(!patterns.ends_with_multiple_newlines.is_match("hello\\n"));
    }

    #[rstest]
    #[case("hello\n", "hello")]
    #[case("hello\\n", "hello")]
    #[case("hello\n\\n\n", "hello")]
    #[case("\n\n", "")]
    #[case("hello", "hello")]
    #[case("win", "win")]
    #[case("\nhello\nworld", "\nhello\nworld")]
    #[case("hello\nworld\n", "hello\nworld")]
    fn truncate_strips_only_the_trailing_newline_run(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(truncate_trailing_newlines(input), expected);
    }
}
