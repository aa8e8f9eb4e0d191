//! Token, variable and structure analysis of a configuration.

use super::models::{DEFAULT_TARGET_MODELS, context_limit, fits_model};
use super::tokens::TokenCounter;
use super::types::*;
use crate::config::{Bindings, TemplateConfig};
use crate::heuristics;
use std::collections::{BTreeMap, HashSet};

/// Tokens assumed to be taken by each `{{ var }}` placeholder in the static text.
const PLACEHOLDER_TOKENS: usize = 2;

/// Estimated totals above this are flagged as too large.
const LARGE_TEMPLATE_TOKENS: usize = 10_000;

/// Static size above which an unstructured single template is flagged.
const UNSTRUCTURED_TEMPLATE_TOKENS: usize = 500;

const MAX_NESTING_DEPTH: usize = 3;
const MAX_VARIABLE_USAGE: usize = 5;

/// Analyzes templates for tokens, structure and recommendations.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateAnalyzer {
    counter: TokenCounter,
}

impl TemplateAnalyzer {
    pub fn new(counter: TokenCounter) -> Self {
        Self { counter }
    }

    /// Analyze `config`.
    ///
    /// `samples` supplies example values for token estimates. `models` lists the
    /// models to check; when empty, gpt-4, gpt-4-turbo and claude-3-sonnet are used.
    pub fn analyze(
        &self,
        config: &TemplateConfig,
        samples: &Bindings,
        models: &[&str],
    ) -> AnalysisResult {
        let mut token_estimate = self.estimate_tokens(config, samples);
        let variable_analysis = self.analyze_variables(config, samples);
        let structural_analysis = analyze_structure(config);

        let models = if models.is_empty() {
            DEFAULT_TARGET_MODELS
        } else {
            models
        };
        token_estimate.model_fit = models
            .iter()
            .map(|model| ModelFit {
                model: model.to_string(),
                context_limit: context_limit(model),
                fits: fits_model(token_estimate.estimated_total, model),
            })
            .collect();

        let recommendations = recommendations(
            config,
            &token_estimate,
            &variable_analysis,
            &structural_analysis,
        );

        AnalysisResult {
            template_name: config.name().to_string(),
            token_estimate,
            variable_analysis,
            structural_analysis,
            recommendations,
        }
    }

    fn estimate_tokens(&self, config: &TemplateConfig, samples: &Bindings) -> TokenEstimate {
        let system_prompt_tokens = config.system_prompt().map(|s| self.counter.count(s));
        let user_prompt_tokens = config.user_prompt().map(|s| self.counter.count(s));
        let template_tokens = config.template().map_or(0, |s| self.counter.count(s));

        let estimated_variable_tokens: BTreeMap<String, usize> = config
            .variables()
            .iter()
            .map(|var| {
                (
                    var.name.clone(),
                    self.counter.estimate_variable(var, samples),
                )
            })
            .collect();

        let total_static_tokens = system_prompt_tokens.unwrap_or(0)
            + user_prompt_tokens.unwrap_or(0)
            + template_tokens;

        // Counts declarations, not placeholder occurrences.
        let placeholder_tokens = config.variables().len() * PLACEHOLDER_TOKENS;
        let variable_tokens: usize = estimated_variable_tokens.values().sum();
        let estimated_total =
            (total_static_tokens + variable_tokens).saturating_sub(placeholder_tokens);

        TokenEstimate {
            template_tokens,
            system_prompt_tokens,
            user_prompt_tokens,
            estimated_variable_tokens,
            total_static_tokens,
            estimated_total,
            model_fit: Vec::new(),
        }
    }

    fn analyze_variables(
        &self,
        config: &TemplateConfig,
        samples: &Bindings,
    ) -> BTreeMap<String, VariableAnalysis> {
        let content = config.combined_content();
        let system = config.system_prompt().unwrap_or_default();
        let user = config.user_prompt().unwrap_or_default();

        config
            .variables()
            .iter()
            .map(|var| {
                let placeholder = heuristics::placeholder_regex(&var.name);
                let analysis = VariableAnalysis {
                    name: var.name.clone(),
                    var_type: var.var_type,
                    estimated_tokens: self.counter.estimate_variable(var, samples),
                    usage_count: placeholder.find_iter(&content).count(),
                    in_system_prompt: placeholder.is_match(system),
                    in_user_prompt: placeholder.is_match(user),
                    description_quality: DescriptionQuality::of(&var.description),
                };
                (var.name.clone(), analysis)
            })
            .collect()
    }
}

fn analyze_structure(config: &TemplateConfig) -> StructuralAnalysis {
    let content = config.combined_content();
    StructuralAnalysis {
        has_system_prompt: config.system_prompt().is_some(),
        has_user_prompt: config.user_prompt().is_some(),
        has_template: config.template().is_some(),
        uses_conditionals: heuristics::uses_conditionals(&content),
        uses_loops: heuristics::uses_loops(&content),
        nesting_depth: heuristics::nesting_depth(&content),
        section_count: heuristics::structural_element_count(&content),
    }
}

fn recommendations(
    config: &TemplateConfig,
    tokens: &TokenEstimate,
    variables: &BTreeMap<String, VariableAnalysis>,
    structure: &StructuralAnalysis,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if tokens.estimated_total > LARGE_TEMPLATE_TOKENS {
        recommendations.push(
            "Consider breaking this template into smaller, focused templates \
             for better token efficiency."
                .to_string(),
        );
    }

    if !structure.has_system_prompt
        && !structure.has_user_prompt
        && structure.section_count == 0
        && tokens.total_static_tokens > UNSTRUCTURED_TEMPLATE_TOKENS
    {
        recommendations.push(
            "Consider adding structure with system_prompt/user_prompt split \
             or markdown sections for better LLM comprehension."
                .to_string(),
        );
    }

    if structure.nesting_depth > MAX_NESTING_DEPTH {
        recommendations.push(format!(
            "Template has deep nesting (depth: {}). Consider simplifying conditional logic.",
            structure.nesting_depth
        ));
    }

    let mut seen = HashSet::new();
    for var in config.variables() {
        if !seen.insert(var.name.as_str()) {
            continue;
        }
        let Some(analysis) = variables.get(&var.name) else {
            continue;
        };
        if analysis.description_quality == DescriptionQuality::Missing {
            recommendations.push(format!(
                "Variable '{}' lacks a description. Add one for better documentation.",
                var.name
            ));
        }
        if analysis.usage_count > MAX_VARIABLE_USAGE {
            recommendations.push(format!(
                "Variable '{}' is used {} times. Consider if this repetition is necessary.",
                var.name, analysis.usage_count
            ));
        }
    }

    if config.description().is_empty() {
        recommendations.push(
            "Template lacks a description. Add one for better discoverability.".to_string(),
        );
    }

    recommendations
}
