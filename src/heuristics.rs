//! Text heuristics shared by the analyzer, quality scorer and semantic validator.
//!
//! Everything here is a pure function over template text. Patterns are
//! compiled once and reused.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static MARKDOWN_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,3}\s").expect("header regex is valid"));

static XML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<[a-z_]+>").expect("xml tag regex is valid"));

static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^===").expect("section marker regex is valid"));

static CONDITIONAL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%-?\s*(if|elif|else)").expect("conditional regex is valid"));

static LOOP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%-?\s*for\s+").expect("loop regex is valid"));

static BLOCK_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%-?\s*(if|for|block|endif|endfor|endblock)\b").expect("block regex is valid")
});

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder regex is valid"));

/// Tags that open a nesting level.
const OPENING_KEYWORDS: &[&str] = &["if", "for", "block"];
/// Tags that close one.
const CLOSING_KEYWORDS: &[&str] = &["endif", "endfor", "endblock"];

/// A list of case-insensitive patterns treated as one check.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compile literal patterns case-insensitively.
    ///
    /// Panics on an invalid pattern; callers pass compile-time constants.
    pub fn case_insensitive(patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)).expect("pattern table entry is valid"))
            .collect();
        Self { patterns }
    }

    /// Whether any pattern matches somewhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Total non-overlapping matches of every pattern.
    pub fn count_matches(&self, text: &str) -> usize {
        self.patterns.iter().map(|p| p.find_iter(text).count()).sum()
    }
}

/// Maximum depth of nested `if`/`for`/`block` tags.
///
/// Closing tags never take the depth below zero.
pub fn nesting_depth(content: &str) -> usize {
    let mut max_depth = 0;
    let mut depth: usize = 0;

    for caps in BLOCK_KEYWORD.captures_iter(content) {
        let keyword = &caps[1];
        if OPENING_KEYWORDS.contains(&keyword) {
            depth += 1;
            max_depth = max_depth.max(depth);
        } else if CLOSING_KEYWORDS.contains(&keyword) {
            depth = depth.saturating_sub(1);
        }
    }

    max_depth
}

/// Markdown headers (`#` to `###`) at line start.
pub fn markdown_header_count(content: &str) -> usize {
    MARKDOWN_HEADER.find_iter(content).count()
}

/// XML-like opening tags such as `<task>`.
pub fn xml_tag_count(content: &str) -> usize {
    XML_TAG.find_iter(content).count()
}

/// Lines starting with `===`.
pub fn section_marker_count(content: &str) -> usize {
    SECTION_MARKER.find_iter(content).count()
}

/// Headers, XML tags and `===` markers together.
pub fn structural_element_count(content: &str) -> usize {
    markdown_header_count(content) + xml_tag_count(content) + section_marker_count(content)
}

/// Loose structure check: angle brackets, `##` or `===` anywhere.
pub fn has_structure_markers(content: &str) -> bool {
    (content.contains('<') && content.contains('>'))
        || content.contains("##")
        || content.contains("===")
}

/// Whether the text contains both `<` and `>`.
pub fn has_xml_like_tags(content: &str) -> bool {
    content.contains('<') && content.contains('>')
}

pub fn uses_conditionals(content: &str) -> bool {
    CONDITIONAL_TAG.is_match(content)
}

pub fn uses_loops(content: &str) -> bool {
    LOOP_TAG.is_match(content)
}

/// Number of `{%` openings.
pub fn block_tag_count(content: &str) -> usize {
    content.matches("{%").count()
}

fn long_sentences(text: &str) -> BTreeSet<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > 30)
        .map(str::to_lowercase)
        .collect()
}

/// Whether two texts share a period-delimited sentence longer than 30 characters,
/// ignoring case.
pub fn shares_long_sentence(a: &str, b: &str) -> bool {
    let left = long_sentences(a);
    let right = long_sentences(b);
    !left.is_disjoint(&right)
}

/// Regex matching `{{ name }}` with optional inner whitespace.
pub fn placeholder_regex(name: &str) -> Regex {
    Regex::new(&format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(name)))
        .expect("escaped placeholder regex is valid")
}

/// Occurrences of `{{ name }}` in `content`.
pub fn placeholder_count(content: &str, name: &str) -> usize {
    placeholder_regex(name).find_iter(content).count()
}

/// Names used as plain `{{ name }}` placeholders, in first-occurrence order.
pub fn placeholder_names(content: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    PLACEHOLDER
        .captures_iter(content)
        .filter_map(|caps| {
            let name = caps[1].to_string();
            seen.insert(name.clone()).then_some(name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nesting_depth_counts_open_blocks() {
        let content = "{% if a %}{% for x in xs %}{% if b %}{% endif %}{% endfor %}{% endif %}";
        assert_eq!(nesting_depth(content), 3);
    }

    #[test]
    fn nesting_depth_counts_blocks_and_trim_markers() {
        let content = "{% block main %}{%- if a -%}x{%- endif %}{% endblock %}";
        assert_eq!(nesting_depth(content), 2);
    }

    #[test]
    fn nesting_depth_never_goes_negative() {
        let content = "{% endif %}{% endfor %}{% if a %}{% endif %}";
        assert_eq!(nesting_depth(content), 1);
    }

    #[test]
    fn nesting_depth_of_plain_text_is_zero() {
        assert_eq!(nesting_depth("no blocks {{ here }}"), 0);
    }

    #[test]
    fn elif_and_else_do_not_change_depth() {
        let content = "{% if a %}1{% elif b %}2{% else %}3{% endif %}";
        assert_eq!(nesting_depth(content), 1);
    }

    #[test]
    fn structural_elements_are_counted() {
        let content = "# Title\n<task>do</task>\n## Part\n=== Section\nnot # a header";
        assert_eq!(markdown_header_count(content), 2);
        assert_eq!(xml_tag_count(content), 1);
        assert_eq!(section_marker_count(content), 1);
        assert_eq!(structural_element_count(content), 4);
    }

    #[test]
    fn structure_markers() {
        assert!(has_structure_markers("a <b> c"));
        assert!(has_structure_markers("## heading"));
        assert!(has_structure_markers("==="));
        assert!(!has_structure_markers("plain text only"));
    }

    #[test]
    fn conditional_and_loop_detection() {
        assert!(uses_conditionals("{% if x %}{% endif %}"));
        assert!(uses_conditionals("{%else%}"));
        assert!(!uses_conditionals("{{ if }}"));
        assert!(uses_loops("{% for x in y %}"));
        assert!(!uses_loops("{% if for_each %}"));
    }

    #[test]
    fn shared_sentences_ignore_case_and_short_fragments() {
        let system = "You are a thorough and careful reviewer of code. Be nice.";
        let user = "Review this. YOU ARE A THOROUGH AND CAREFUL REVIEWER OF CODE.";
        assert!(shares_long_sentence(system, user));
        assert!(!shares_long_sentence("Be nice. Short one.", "Be nice. Short one."));
    }

    #[test]
    fn placeholder_helpers() {
        let content = "{{ a }} and {{a}} and {{ b }} and {{ a.attr }} and {{ab}}";
        assert_eq!(placeholder_count(content, "a"), 2);
        assert_eq!(placeholder_names(content), vec!["a", "b", "ab"]);
    }

    #[test]
    fn pattern_set_counts_every_pattern() {
        let set = PatternSet::case_insensitive(&[r"\bmaybe\b", r"\bperhaps\b"]);
        assert!(set.is_match("MAYBE so"));
        assert_eq!(set.count_matches("maybe, perhaps, maybe"), 3);
        assert!(!set.is_match("maybelline"));
    }
}
