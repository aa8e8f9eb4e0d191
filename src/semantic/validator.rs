//! The six semantic checks.

use super::rules::*;
use super::types::*;
use crate::config::TemplateConfig;
use crate::heuristics;
use regex::Regex;
use std::collections::HashSet;

/// Run every semantic check against `config`.
///
/// Checks run in a fixed order: role definition, instruction clarity,
/// context coherence, task alignment, placeholder quality, prompt structure.
pub fn validate_semantics(config: &TemplateConfig) -> SemanticValidationResult {
    let content = config.combined_content();
    let mut result = SemanticValidationResult::default();

    check_role_definition(config, &mut result);
    check_instruction_clarity(config, &content, &mut result);
    check_context_coherence(config, &mut result);
    check_task_alignment(config, &content, &mut result);
    check_placeholder_quality(config, &content, &mut result);
    check_prompt_structure(config, &content, &mut result);

    log::debug!(
        "Semantic validation of '{}' found {} issue(s)",
        config.name(),
        result.issues.len()
    );
    result
}

fn check_role_definition(config: &TemplateConfig, result: &mut SemanticValidationResult) {
    let system = config.system_prompt();
    let in_system = system.is_some_and(|s| ROLE_PATTERNS.is_match(s));
    let in_template = config.template().is_some_and(|t| ROLE_PATTERNS.is_match(t));
    let in_user = config.user_prompt().is_some_and(|u| ROLE_PATTERNS.is_match(u));

    if in_system || in_template {
        result.role_clarity = 100;
    } else {
        result.role_clarity = ROLE_MISSING_SCORE;
        let location = if system.is_some() {
            IssueLocation::SystemPrompt
        } else {
            IssueLocation::Template
        };
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::RoleConfusion,
            location,
            "No clear role definition found in the prompt",
            "Add 'You are a [role]' to establish context",
        ));
    }

    if in_user && system.is_some() {
        result.role_clarity = result.role_clarity.saturating_sub(ROLE_IN_USER_PENALTY);
        result.add_issue(
            SemanticIssue::info(
                SemanticIssueType::RoleConfusion,
                IssueLocation::UserPrompt,
                "Role definition found in user_prompt, not system_prompt",
                "Move role definition to system_prompt",
            )
            .with_severity(Severity::Warning),
        );
    }
}

fn check_instruction_clarity(
    config: &TemplateConfig,
    content: &str,
    result: &mut SemanticValidationResult,
) {
    let mut score: u32 = 100;

    if !TASK_PATTERNS.is_match(content) {
        score = score.saturating_sub(MISSING_TASK_PENALTY);
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::InstructionClarity,
            IssueLocation::Template,
            "No clear task instructions found",
            "Add 'Your task is to...' or 'Please...'",
        ));
    }

    if !OUTPUT_PATTERNS.is_match(content) {
        score = score.saturating_sub(MISSING_OUTPUT_PENALTY);
        let location = if config.user_prompt().is_some() {
            IssueLocation::UserPrompt
        } else {
            IssueLocation::Template
        };
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::InstructionClarity,
            location,
            "No output format specification found",
            "Consider specifying expected output format",
        ));
    }

    let ambiguous = AMBIGUOUS_PATTERNS.count_matches(content);
    if ambiguous > MAX_AMBIGUOUS_PHRASES {
        score = score.saturating_sub(AMBIGUITY_PENALTY);
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::InstructionClarity,
            IssueLocation::Template,
            format!("Found {} ambiguous phrases", ambiguous),
            "Replace ambiguous language with direct instructions",
        ));
    }

    result.instruction_clarity = score;
}

fn check_context_coherence(config: &TemplateConfig, result: &mut SemanticValidationResult) {
    let (Some(system), Some(user)) = (config.system_prompt(), config.user_prompt()) else {
        return;
    };

    if heuristics::shares_long_sentence(system, user) {
        result.context_coherence = result.context_coherence.saturating_sub(DUPLICATION_PENALTY);
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::ContextCoherence,
            IssueLocation::UserPrompt,
            "Content duplication between prompts",
            "Review and deduplicate repeated content",
        ));
    }
}

fn check_task_alignment(
    config: &TemplateConfig,
    content: &str,
    result: &mut SemanticValidationResult,
) {
    let description = config.description().to_lowercase();
    if description.is_empty() {
        result.task_alignment = result
            .task_alignment
            .saturating_sub(MISSING_DESCRIPTION_PENALTY);
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::TaskAlignment,
            IssueLocation::Description,
            "Template lacks a description",
            "Add a description to clarify the template's purpose",
        ));
        return;
    }

    let terms = key_terms(&description);
    if terms.is_empty() {
        return;
    }

    let content = content.to_lowercase();
    let content_terms = key_terms(&content);
    let shared = terms.intersection(&content_terms).count();
    let overlap = shared as f64 / terms.len() as f64;

    if overlap < MIN_TERM_OVERLAP {
        result.task_alignment = result.task_alignment.saturating_sub(MISALIGNMENT_PENALTY);
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::TaskAlignment,
            IssueLocation::Description,
            "Description may not align with template content",
            "Update description to reflect functionality",
        ));
    }
}

fn key_terms(text: &str) -> HashSet<&str> {
    KEY_TERM.find_iter(text).map(|m| m.as_str()).collect()
}

fn check_placeholder_quality(
    config: &TemplateConfig,
    content: &str,
    result: &mut SemanticValidationResult,
) {
    for name in heuristics::placeholder_names(content) {
        if config.variable(&name).is_none() {
            continue;
        }
        if appears_without_context(content, &name) {
            result.add_issue(SemanticIssue::info(
                SemanticIssueType::PlaceholderQuality,
                IssueLocation::Template,
                format!("Variable '{}' appears without context", name),
                format!("Add context like '{}: {{{{ {} }}}}'", name, name),
            ));
        }
    }
}

/// Whether some occurrence of `{{ name }}` has only whitespace within
/// [`PLACEHOLDER_CONTEXT_CHARS`] characters on either side.
fn appears_without_context(content: &str, name: &str) -> bool {
    let escaped = regex::escape(name);
    let window = PLACEHOLDER_CONTEXT_CHARS;
    let Ok(surrounding) = Regex::new(&format!(
        r"(?s).{{0,{window}}}\{{\{{\s*{escaped}\s*\}}\}}.{{0,{window}}}"
    )) else {
        return false;
    };
    let Ok(standalone) = Regex::new(&format!(r"^\{{\{{\s*{escaped}\s*\}}\}}$")) else {
        return false;
    };

    surrounding
        .find_iter(content)
        .any(|m| standalone.is_match(m.as_str().trim()))
}

fn check_prompt_structure(
    config: &TemplateConfig,
    content: &str,
    result: &mut SemanticValidationResult,
) {
    if config.system_prompt().is_some() && config.user_prompt().is_none() {
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::PromptStructure,
            IssueLocation::UserPrompt,
            "system_prompt defined but user_prompt is empty",
            "Add user_prompt for complete chat structure",
        ));
    }

    if config.system_prompt().is_none()
        && content.chars().count() > UNSTRUCTURED_TEMPLATE_CHARS
        && !heuristics::has_structure_markers(content)
    {
        result.add_issue(SemanticIssue::info(
            SemanticIssueType::PromptStructure,
            IssueLocation::Template,
            "Long template without clear structure",
            "Split into system/user prompts or add sections",
        ));
    }
}
