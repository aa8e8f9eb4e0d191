//! Pattern tables and thresholds for the quality dimensions.

use crate::heuristics::PatternSet;
use std::sync::LazyLock;

/// A group of patterns whose absence costs points.
pub(super) struct PresenceRule {
    pub patterns: &'static [&'static str],
    pub penalty: i32,
    pub found: &'static str,
    pub missing: &'static str,
    pub suggestion: &'static str,
}

pub(super) const CLARITY_RULES: &[PresenceRule] = &[
    PresenceRule {
        patterns: &["you are", "act as", "<role>", "<persona>"],
        penalty: 15,
        found: "Clear role definition found",
        missing: "No clear role definition",
        suggestion: "Add a clear role definition (e.g., 'You are a...')",
    },
    PresenceRule {
        patterns: &["your (task|goal|job) is", "please", "<task>", "<instructions>"],
        penalty: 15,
        found: "Clear task instructions present",
        missing: "Task instructions could be clearer",
        suggestion: "Add explicit task instructions",
    },
    PresenceRule {
        patterns: &["<output_format>", "respond in", "format your"],
        penalty: 10,
        found: "Output format specified",
        missing: "No output format specification",
        suggestion: "Specify expected output format",
    },
];

/// Compiled [`CLARITY_RULES`], index-aligned.
pub(super) static CLARITY_PATTERNS: LazyLock<Vec<PatternSet>> = LazyLock::new(|| {
    CLARITY_RULES
        .iter()
        .map(|rule| PatternSet::case_insensitive(rule.patterns))
        .collect()
});

pub(super) static AMBIGUOUS_PHRASES: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::case_insensitive(&[
        r"\bmaybe\b",
        r"\bperhaps\b",
        r"\bmight want to\b",
        r"\bcould potentially\b",
    ])
});

pub(super) static CAMEL_CASE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("[a-z][A-Z]").expect("camel case regex is valid"));

/// Variable names that usually take a fixed set of values.
pub(super) const CONSTRAINED_NAMES: &[&str] = &["style", "format", "type", "mode", "level"];

pub(super) const MIN_DOCUMENTED_RATIO: f64 = 0.5;
pub(super) const MAX_AMBIGUOUS_PHRASES: usize = 2;
pub(super) const BRIEF_DESCRIPTION_CHARS: usize = 20;
pub(super) const MAX_UNDOCUMENTED_PENALTY: i32 = 15;
pub(super) const UNSTRUCTURED_CONTENT_CHARS: usize = 500;

pub(super) const HIGH_TOKEN_COUNT: usize = 5_000;
pub(super) const VERY_HIGH_TOKEN_COUNT: usize = 10_000;
/// Words shorter than this are ignored by the repetition check.
pub(super) const MIN_REPEATED_WORD_CHARS: usize = 5;
pub(super) const FREQUENT_WORD_COUNT: usize = 5;
pub(super) const EXCESSIVE_WORD_COUNT: usize = 10;
pub(super) const MAX_VARIABLE_USAGE: usize = 5;
pub(super) const MAX_BLOCK_TAGS: usize = 10;

pub(super) const SPLIT_SUGGESTED_CHARS: usize = 2_000;
pub(super) const STRUCTURE_EXPECTED_CHARS: usize = 1_000;
pub(super) const MIN_STRUCTURAL_ELEMENTS: usize = 3;
pub(super) const MAX_NESTING_DEPTH: usize = 3;
