//! Five-dimension quality scoring.

use super::rules::*;
use super::types::*;
use crate::analyze::TokenCounter;
use crate::config::{Bindings, TemplateConfig, VariableType};
use crate::heuristics;
use log::debug;
use std::collections::HashMap;

/// Running score for one dimension.
struct Tally {
    score: i32,
    details: Vec<String>,
    suggestions: Vec<String>,
}

impl Tally {
    fn new() -> Self {
        Self {
            score: 100,
            details: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn note(&mut self, detail: impl Into<String>) {
        self.details.push(detail.into());
    }

    fn suggest(&mut self, suggestion: impl Into<String>) {
        self.suggestions.push(suggestion.into());
    }

    fn penalize(&mut self, points: i32, detail: impl Into<String>, suggestion: impl Into<String>) {
        self.score -= points;
        self.note(detail);
        self.suggest(suggestion);
    }

    fn finish(self, dimension: QualityDimension) -> DimensionScore {
        DimensionScore {
            dimension,
            score: self.score.clamp(0, 100) as u32,
            weight: dimension.weight(),
            details: self.details,
            suggestions: self.suggestions,
        }
    }
}

/// Scores templates on clarity, consistency, completeness, efficiency and structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer {
    counter: TokenCounter,
}

impl QualityScorer {
    pub fn new(counter: TokenCounter) -> Self {
        Self { counter }
    }

    /// Score every dimension of `config`.
    ///
    /// Sample values do not change the result; token efficiency is judged on
    /// the static content so scores are comparable across invocations.
    pub fn score(&self, config: &TemplateConfig, samples: &Bindings) -> QualityReport {
        debug!(
            "scoring '{}' ({} sample values ignored)",
            config.name(),
            samples.len()
        );
        let content = config.combined_content();

        let dimensions: Vec<DimensionScore> = QualityDimension::ALL
            .iter()
            .map(|&dimension| match dimension {
                QualityDimension::Clarity => score_clarity(config, &content),
                QualityDimension::Consistency => score_consistency(config),
                QualityDimension::Completeness => score_completeness(config, &content),
                QualityDimension::Efficiency => self.score_efficiency(config, &content),
                QualityDimension::Structure => score_structure(config, &content),
            })
            .collect();

        let overall_score = dimensions
            .iter()
            .map(|d| d.score * d.dimension.weight_percent())
            .sum::<u32>()
            / 100;
        let grade = Grade::from_score(overall_score);

        let mut top_suggestions: Vec<String> = Vec::new();
        for suggestion in dimensions.iter().flat_map(|d| &d.suggestions) {
            if top_suggestions.len() == 5 {
                break;
            }
            if !top_suggestions.contains(suggestion) {
                top_suggestions.push(suggestion.clone());
            }
        }

        log::debug!(
            "Scored '{}': {} ({})",
            config.name(),
            overall_score,
            grade
        );

        QualityReport {
            template_name: config.name().to_string(),
            overall_score,
            grade,
            dimensions,
            summary: grade.summary().to_string(),
            top_suggestions,
        }
    }

    fn score_efficiency(&self, config: &TemplateConfig, content: &str) -> DimensionScore {
        let mut tally = Tally::new();

        let tokens = self.counter.count(content);
        if tokens > VERY_HIGH_TOKEN_COUNT {
            tally.penalize(
                30,
                format!("Very high token count: {}", tokens),
                "Consider breaking into smaller templates",
            );
        } else if tokens > HIGH_TOKEN_COUNT {
            tally.penalize(
                15,
                format!("High token count: {}", tokens),
                "Review for unnecessary content",
            );
        } else {
            tally.note(format!("Token count: {}", tokens));
        }

        let frequent = frequent_words(content);
        if !frequent.is_empty() {
            let top: Vec<&str> = frequent.iter().take(3).map(|(w, _)| w.as_str()).collect();
            tally.note(format!("Frequently repeated words: {}", top.join(", ")));
            if frequent.iter().any(|(_, count)| *count > EXCESSIVE_WORD_COUNT) {
                tally.score -= 10;
                tally.suggest("Review template for unnecessary repetition");
            }
        }

        for var in config.variables() {
            let usage = heuristics::placeholder_count(content, &var.name);
            if usage > MAX_VARIABLE_USAGE {
                tally.penalize(
                    5,
                    format!("Variable '{}' used {} times", var.name, usage),
                    format!("Consider if '{}' needs to be repeated {} times", var.name, usage),
                );
            }
        }

        let blocks = heuristics::block_tag_count(content);
        if blocks > MAX_BLOCK_TAGS {
            tally.penalize(
                15,
                format!("High template logic complexity: {} blocks", blocks),
                "Simplify template logic or split into multiple templates",
            );
        }

        tally.finish(QualityDimension::Efficiency)
    }
}

fn score_clarity(config: &TemplateConfig, content: &str) -> DimensionScore {
    let mut tally = Tally::new();

    for (rule, patterns) in CLARITY_RULES.iter().zip(CLARITY_PATTERNS.iter()) {
        if patterns.is_match(content) {
            tally.note(rule.found);
        } else {
            tally.penalize(rule.penalty, rule.missing, rule.suggestion);
        }
    }

    let total = config.variables().len();
    if total > 0 {
        let documented = config
            .variables()
            .iter()
            .filter(|v| !v.description.is_empty())
            .count();
        if (documented as f64) / (total as f64) < MIN_DOCUMENTED_RATIO {
            tally.penalize(
                10,
                format!("Only {}/{} variables have descriptions", documented, total),
                "Add descriptions to all variables",
            );
        } else {
            tally.note(format!("{}/{} variables documented", documented, total));
        }
    }

    let ambiguous = AMBIGUOUS_PHRASES.count_matches(content);
    if ambiguous > MAX_AMBIGUOUS_PHRASES {
        tally.penalize(
            10,
            format!("Found {} ambiguous phrases", ambiguous),
            "Replace ambiguous language with direct instructions",
        );
    }

    tally.finish(QualityDimension::Clarity)
}

fn score_consistency(config: &TemplateConfig) -> DimensionScore {
    let mut tally = Tally::new();
    let variables = config.variables();

    let snake_case = variables.iter().filter(|v| v.name.contains('_')).count();
    let camel_case = variables
        .iter()
        .filter(|v| CAMEL_CASE.is_match(&v.name))
        .count();
    if snake_case > 0 && camel_case > 0 {
        tally.penalize(
            15,
            "Mixed naming conventions (snake_case and camelCase)",
            "Use consistent naming convention for variables",
        );
    } else if !variables.is_empty() {
        tally.note("Consistent variable naming");
    }

    for var in variables {
        if var.var_type != VariableType::String {
            continue;
        }
        let allowed = var.allowed.as_deref().unwrap_or_default();
        if allowed.iter().any(|v| !v.is_string()) {
            tally.score -= 10;
            tally.note(format!("Variable '{}' has inconsistent enum types", var.name));
        }
    }

    if let (Some(system), Some(user)) = (config.system_prompt(), config.user_prompt()) {
        if heuristics::has_xml_like_tags(system) != heuristics::has_xml_like_tags(user) {
            tally.penalize(
                10,
                "Inconsistent formatting between system_prompt and user_prompt",
                "Use consistent formatting (XML tags, markdown) throughout",
            );
        } else {
            tally.note("Consistent formatting across prompts");
        }

        if heuristics::shares_long_sentence(system, user) {
            tally.penalize(
                10,
                "Duplicate content found between prompts",
                "Remove duplicate content between system_prompt and user_prompt",
            );
        }
    }

    tally.finish(QualityDimension::Consistency)
}

fn score_completeness(config: &TemplateConfig, content: &str) -> DimensionScore {
    let mut tally = Tally::new();

    let description = config.description();
    if description.is_empty() {
        tally.penalize(10, "Missing description", "Add a template description");
    } else if description.chars().count() < BRIEF_DESCRIPTION_CHARS {
        tally.penalize(5, "Description is very brief", "Expand the template description");
    } else {
        tally.note("Description present");
    }

    if config.tags().is_empty() {
        tally.penalize(5, "No tags defined", "Add tags for better discoverability");
    } else {
        tally.note(format!("{} tags defined", config.tags().len()));
    }

    let mut undocumented: Vec<&str> = Vec::new();
    for var in config.variables() {
        if var.description.is_empty() {
            undocumented.push(&var.name);
        }
        let unconstrained = var.allowed.as_ref().is_none_or(|values| values.is_empty());
        if CONSTRAINED_NAMES.contains(&var.name.as_str()) && unconstrained {
            tally.score -= 5;
            tally.suggest(format!("Consider adding enum values for '{}'", var.name));
        }
    }

    if !undocumented.is_empty() {
        let penalty = (undocumented.len() as i32 * 3).min(MAX_UNDOCUMENTED_PENALTY);
        let mut listed = undocumented[..undocumented.len().min(3)].join(", ");
        if undocumented.len() > 3 {
            listed.push_str("...");
        }
        tally.penalize(
            penalty,
            format!("Variables without descriptions: {}", listed),
            "Add descriptions to all variables",
        );
    }

    // Defaults are counted across every variable, not only the optional ones.
    let has_optional = config.optional_variables().next().is_some();
    let has_default = config.variables().iter().any(|v| v.default.is_some());
    if has_optional && !has_default {
        tally.penalize(
            5,
            "Optional variables have no default values",
            "Add default values for optional variables",
        );
    }

    if content.chars().count() > UNSTRUCTURED_CONTENT_CHARS
        && !heuristics::has_structure_markers(content)
    {
        tally.penalize(
            10,
            "Long template without clear structure",
            "Add sections or XML tags to organize longer templates",
        );
    }

    tally.finish(QualityDimension::Completeness)
}

fn score_structure(config: &TemplateConfig, content: &str) -> DimensionScore {
    let mut tally = Tally::new();

    match (config.system_prompt(), config.user_prompt(), config.template()) {
        (Some(_), Some(_), _) => {
            tally.score += 5;
            tally.note("Uses system_prompt/user_prompt split");
        }
        (Some(_), None, _) => tally.penalize(
            10,
            "Has system_prompt but no user_prompt",
            "Add user_prompt for complete chat structure",
        ),
        (None, Some(_), _) => {}
        (None, None, Some(template)) => {
            tally.note("Uses single template format");
            if template.chars().count() > SPLIT_SUGGESTED_CHARS {
                tally.suggest("Consider using system_prompt/user_prompt split");
            }
        }
        (None, None, None) => {}
    }

    if content.chars().count() > STRUCTURE_EXPECTED_CHARS {
        let elements = heuristics::structural_element_count(content);
        if elements < MIN_STRUCTURAL_ELEMENTS {
            tally.penalize(
                15,
                "Long template with minimal structure",
                "Add XML tags or section headers to organize content",
            );
        } else {
            tally.note(format!("Good structure: {} structural elements", elements));
        }
    }

    let depth = heuristics::nesting_depth(content);
    if depth > MAX_NESTING_DEPTH {
        tally.penalize(
            15,
            format!("Deep nesting: {} levels", depth),
            "Reduce nesting depth for better readability",
        );
    } else if depth > 0 {
        tally.note(format!("Nesting depth: {}", depth));
    }

    tally.finish(QualityDimension::Structure)
}

/// Lowercased words of five or more characters seen more than five times,
/// most frequent first; ties keep first-occurrence order.
fn frequent_words(content: &str) -> Vec<(String, usize)> {
    let lowered = content.to_lowercase();
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for word in lowered.split_whitespace() {
        if word.chars().count() < MIN_REPEATED_WORD_CHARS {
            continue;
        }
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word, counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }

    counts.retain(|(_, count)| *count > FREQUENT_WORD_COUNT);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
