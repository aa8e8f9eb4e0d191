//! Pattern tables for the semantic checks.

use crate::heuristics::PatternSet;
use std::sync::LazyLock;

pub(super) static ROLE_PATTERNS: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::case_insensitive(&[
        r"you are\s+(a|an|the)\s+",
        r"act as\s+(a|an|the)\s+",
        r"<role>",
        r"<persona>",
        r"your role is",
        r"you will be\s+(a|an|the)\s+",
        r"as\s+(a|an)\s+\w+,?\s+you",
    ])
});

pub(super) static TASK_PATTERNS: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::case_insensitive(&[
        r"your (task|job|goal|objective) is",
        r"you (should|must|will|need to)",
        r"please\s+\w+",
        r"<task>",
        r"<instructions>",
        r"i want you to",
        r"i need you to",
    ])
});

pub(super) static OUTPUT_PATTERNS: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::case_insensitive(&[
        r"<output_format>",
        r"<output>",
        r"respond in (this|the following) format",
        r"format your (response|answer|output)",
        r"your (response|answer|output) should",
        r"use (this|the following) (format|structure)",
        r"return (the result|your answer) (as|in)",
    ])
});

pub(super) static AMBIGUOUS_PATTERNS: LazyLock<PatternSet> = LazyLock::new(|| {
    PatternSet::case_insensitive(&[
        r"\bmaybe\b",
        r"\bperhaps\b",
        r"\bmight want to\b",
        r"\bcould potentially\b",
        r"\bpossibly\b",
        r"\bif you want\b",
    ])
});

/// Lowercase ASCII words of four or more letters.
pub(super) static KEY_TERM: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\b[a-z]{4,}\b").expect("key term regex is valid"));

/// Characters of surrounding text inspected around a placeholder.
pub(super) const PLACEHOLDER_CONTEXT_CHARS: usize = 20;

pub(super) const ROLE_MISSING_SCORE: u32 = 60;
pub(super) const ROLE_IN_USER_PENALTY: u32 = 20;
pub(super) const MISSING_TASK_PENALTY: u32 = 25;
pub(super) const MISSING_OUTPUT_PENALTY: u32 = 15;
pub(super) const AMBIGUITY_PENALTY: u32 = 10;
pub(super) const MAX_AMBIGUOUS_PHRASES: usize = 2;
pub(super) const DUPLICATION_PENALTY: u32 = 15;
pub(super) const MISALIGNMENT_PENALTY: u32 = 20;
pub(super) const MISSING_DESCRIPTION_PENALTY: u32 = 10;
pub(super) const MIN_TERM_OVERLAP: f64 = 0.3;
pub(super) const UNSTRUCTURED_TEMPLATE_CHARS: usize = 3_000;
